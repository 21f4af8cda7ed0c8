//! Error and result type for the sendmail transport

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    io,
};

/// An enum of all sendmail transport error kinds
#[derive(Debug)]
pub enum Error {
    /// Spawning or talking to the sendmail process failed
    Client(io::Error),
    /// The sendmail process exited unsuccessfully
    Command(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Client(e) => write!(f, "sendmail client error: {e}"),
            Error::Command(output) => write!(f, "sendmail exited with an error: {output}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Client(e) => Some(e),
            Error::Command(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Client(err)
    }
}
