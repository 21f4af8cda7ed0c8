//! Courriel is a blocking email client written in Rust. It provides a MIME
//! message compiler and several delivery transports.
//!
//! The SMTP transport follows [RFC 5321](https://tools.ietf.org/html/rfc5321)
//! and is designed to send emails from an application to a relay server,
//! relying as much as possible on the relay for sanity and RFC compliance
//! checks.
//!
//! It implements the following extensions:
//!
//! * 8BITMIME ([RFC 6152](https://tools.ietf.org/html/rfc6152))
//! * AUTH ([RFC 4954](https://tools.ietf.org/html/rfc4954)) with LOGIN and PLAIN mechanisms
//! * STARTTLS ([RFC 2487](https://tools.ietf.org/html/rfc2487))
//! * SIZE ([RFC 1870](https://tools.ietf.org/html/rfc1870))
//!
//! ## Example
//!
//! ```rust,no_run
//! use courriel::{
//!     transport::smtp::{authentication::Credentials, SmtpTransport},
//!     Body, Mailbox, Mailer,
//! };
//!
//! # fn main() -> Result<(), courriel::Error> {
//! let sender = Mailbox::new(
//!     "no-reply@example.com".parse().unwrap(),
//!     Some("Example".into()),
//! );
//! let agent = SmtpTransport::builder("smtp.example.com")?
//!     .credentials(Credentials::new("user", "password"))
//!     .build();
//!
//! let mut mailer = Mailer::new(sender, Box::new(agent));
//! let message = mailer.compose("Happy new year", Body::plain("Be happy!"));
//! let sent = mailer.send(&message, &["hei@example.org".parse().unwrap()])?;
//! assert_eq!(sent, 1);
//! # Ok(())
//! # }
//! ```
//!
//! The `SendmailTransport` delivers through a local `sendmail` binary and the
//! `StubTransport` records deliveries for tests; both honour the same
//! [`Transport`] contract as the SMTP client.

#![deny(missing_docs, unsafe_code)]

pub mod error;
pub mod mailer;
pub mod message;
pub mod transport;

pub use email_address::EmailAddress;

pub use crate::{
    error::Error,
    mailer::{ClientConfig, Mailer},
    message::{
        attachment::Attachment, body::Body, compiled::CompiledMessage, mailbox::Mailbox,
        EndOfLine, Message,
    },
    transport::{
        sendmail::SendmailTransport, smtp::SmtpTransport, stub::StubTransport, Transport,
    },
};
