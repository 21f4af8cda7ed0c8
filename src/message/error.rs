//! Error type for message compilation

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    io,
    path::PathBuf,
};

/// The errors that may occur while compiling a message into MIME
#[derive(Debug)]
pub enum ComposeError {
    /// Caller tried to set a header that the compiler owns
    HeaderConflict(String),
    /// Attachment file missing or unreadable
    ///
    /// Raised both at attachment construction and again at serialization
    /// time, since the file may vanish in between.
    AttachmentUnreadable {
        /// Path of the offending attachment
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::HeaderConflict(key) => {
                write!(f, "header key \"{key}\" is reserved and cannot be set")
            }
            ComposeError::AttachmentUnreadable { path, source } => {
                write!(
                    f,
                    "attachment file \"{}\" is not readable: {source}",
                    path.display()
                )
            }
        }
    }
}

impl StdError for ComposeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ComposeError::HeaderConflict(_) => None,
            ComposeError::AttachmentUnreadable { source, .. } => Some(source),
        }
    }
}
