//! Error and result type for SMTP transport

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    io,
};

/// An enum of all SMTP session error kinds
#[derive(Debug)]
pub enum Error {
    /// Connecting or reconnecting to the server failed
    Connection(io::Error),
    /// Reading from or writing to an established stream failed
    Network(io::Error),
    /// The stream stayed silent past the configured read timeout
    TimedOut,
    /// The server answered a command with an unexpected reply code
    UnexpectedResponse {
        /// Verb of the command that was answered
        command: &'static str,
        /// Reply code required to continue
        expected: u16,
        /// Reply code actually received, `-1` when unparsable
        got: i32,
    },
    /// TLS was required but the server does not advertise STARTTLS
    TlsNotAvailable,
    /// The TLS handshake failed
    TlsNegotiateFailed(String),
    /// Credentials were supplied but the server advertises neither the
    /// LOGIN nor the PLAIN mechanism
    AuthUnavailable,
    /// The server rejected the supplied credentials
    AuthFailed(String),
    /// The server refused a recipient, delivery was aborted
    InvalidRecipient(String),
    /// The compiled message is larger than the server's declared limit
    ExceedsMaximumSize {
        /// Size of the compiled message in bytes
        actual: usize,
        /// Limit declared by the server's SIZE extension
        max: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "connection error: {e}"),
            Error::Network(e) => write!(f, "network error: {e}"),
            Error::TimedOut => f.write_str("read timed out"),
            Error::UnexpectedResponse {
                command,
                expected,
                got,
            } => write!(
                f,
                "unexpected reply to {command}: expected {expected}, got {got}"
            ),
            Error::TlsNotAvailable => {
                f.write_str("encryption required but server does not support STARTTLS")
            }
            Error::TlsNegotiateFailed(e) => write!(f, "TLS negotiation failed: {e}"),
            Error::AuthUnavailable => {
                f.write_str("server offers no supported authentication mechanism")
            }
            Error::AuthFailed(reply) => write!(f, "authentication failed: {reply}"),
            Error::InvalidRecipient(reply) => write!(f, "recipient rejected: {reply}"),
            Error::ExceedsMaximumSize { actual, max } => {
                write!(f, "message is {actual} bytes, server accepts at most {max}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Connection(e) | Error::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::TimedOut || err.kind() == io::ErrorKind::WouldBlock {
            Error::TimedOut
        } else {
            Error::Network(err)
        }
    }
}
