//! SMTP commands

use std::fmt::{self, Display, Formatter};

use email_address::EmailAddress;

use crate::transport::smtp::extension::ClientId;

/// A wire-serializable SMTP command
///
/// `Display` writes the full command including the trailing CRLF; `verb`
/// names the command in errors and logs.
pub trait Command: Display {
    /// Command verb, for error reporting
    fn verb(&self) -> &'static str;
}

/// EHLO command
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Ehlo(pub ClientId);

impl Display for Ehlo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "EHLO {}\r\n", self.0)
    }
}

impl Command for Ehlo {
    fn verb(&self) -> &'static str {
        "EHLO"
    }
}

/// STARTTLS command
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Starttls;

impl Display for Starttls {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("STARTTLS\r\n")
    }
}

impl Command for Starttls {
    fn verb(&self) -> &'static str {
        "STARTTLS"
    }
}

/// MAIL FROM command
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Mail(pub EmailAddress);

impl Display for Mail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MAIL FROM:<{}>\r\n", self.0)
    }
}

impl Command for Mail {
    fn verb(&self) -> &'static str {
        "MAIL FROM"
    }
}

/// RCPT TO command
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Rcpt(pub EmailAddress);

impl Display for Rcpt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RCPT TO:<{}>\r\n", self.0)
    }
}

impl Command for Rcpt {
    fn verb(&self) -> &'static str {
        "RCPT TO"
    }
}

/// DATA command
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Data;

impl Display for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("DATA\r\n")
    }
}

impl Command for Data {
    fn verb(&self) -> &'static str {
        "DATA"
    }
}

/// End-of-data marker, a line holding a single dot
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct EndOfData;

impl Display for EndOfData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(".\r\n")
    }
}

impl Command for EndOfData {
    fn verb(&self) -> &'static str {
        "DATA terminator"
    }
}

/// QUIT command
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Quit;

impl Display for Quit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("QUIT\r\n")
    }
}

impl Command for Quit {
    fn verb(&self) -> &'static str {
        "QUIT"
    }
}

/// NOOP command
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Noop;

impl Display for Noop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("NOOP\r\n")
    }
}

impl Command for Noop {
    fn verb(&self) -> &'static str {
        "NOOP"
    }
}

/// RSET command
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Rset;

impl Display for Rset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("RSET\r\n")
    }
}

impl Command for Rset {
    fn verb(&self) -> &'static str {
        "RSET"
    }
}

/// AUTH command, one step of a mechanism exchange
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Auth(pub String);

impl Display for Auth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.0)
    }
}

impl Command for Auth {
    fn verb(&self) -> &'static str {
        "AUTH"
    }
}
