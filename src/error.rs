//! Top-level error type for the mailer

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

use crate::{message::error::ComposeError, transport::sendmail, transport::smtp};

/// Any error that may occur while composing or delivering an email
///
/// Each delivery agent keeps its own error type; this wrapper exists so the
/// [`Transport`](crate::Transport) contract can be used through a trait
/// object. Errors are forwarded unmodified, no variant is added here.
#[derive(Debug)]
pub enum Error {
    /// Message could not be compiled into a MIME payload
    Compose(ComposeError),
    /// SMTP protocol or transport failure
    Smtp(smtp::error::Error),
    /// Local sendmail invocation failure
    Sendmail(sendmail::error::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compose(e) => write!(f, "compose error: {e}"),
            Error::Smtp(e) => write!(f, "smtp error: {e}"),
            Error::Sendmail(e) => write!(f, "sendmail error: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Compose(e) => Some(e),
            Error::Smtp(e) => Some(e),
            Error::Sendmail(e) => Some(e),
        }
    }
}

impl From<ComposeError> for Error {
    fn from(e: ComposeError) -> Self {
        Error::Compose(e)
    }
}

impl From<smtp::error::Error> for Error {
    fn from(e: smtp::error::Error) -> Self {
        Error::Smtp(e)
    }
}

impl From<sendmail::error::Error> for Error {
    fn from(e: sendmail::error::Error) -> Self {
        Error::Sendmail(e)
    }
}
