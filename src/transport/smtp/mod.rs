//! The SMTP transport
//!
//! Delivers compiled messages over RFC 5321 SMTP, one blocking session
//! per transport. Typical use goes through the builder:
//!
//! ```rust,no_run
//! use courriel::transport::smtp::{authentication::Credentials, SmtpTransport};
//!
//! # fn main() -> Result<(), courriel::Error> {
//! let transport = SmtpTransport::builder("smtp.example.com")?
//!     .credentials(Credentials::new("user", "password"))
//!     .build();
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use email_address::EmailAddress;

use crate::{
    message::compiled::CompiledMessage,
    transport::{
        smtp::{
            authentication::Credentials,
            extension::ClientId,
            net::{Connector, TcpConnector},
            session::{SmtpInfo, SmtpSession},
            tls::TlsParameters,
        },
        Transport,
    },
};

pub mod authentication;
pub(crate) mod codec;
pub mod commands;
pub mod error;
pub mod extension;
pub mod mock;
pub mod net;
pub mod response;
pub mod session;
pub mod tls;

/// Default SMTP port
pub const SMTP_PORT: u16 = 25;
/// Default submission port
pub const SUBMISSION_PORT: u16 = 587;

/// Default timeout for socket operations
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Encryption policy for the session
#[derive(Clone, Debug, Default)]
pub enum Tls {
    /// Plaintext only, never upgrade
    #[default]
    None,
    /// Start plaintext, upgrade with STARTTLS or fail
    Required(TlsParameters),
}

/// Sends compiled messages over a blocking SMTP session
#[derive(Debug)]
pub struct SmtpTransport {
    session: SmtpSession,
}

impl SmtpTransport {
    /// Creates a builder requiring STARTTLS on the submission port
    pub fn builder<S: Into<String>>(server: S) -> Result<SmtpTransportBuilder, error::Error> {
        let server = server.into();
        let tls = Tls::Required(TlsParameters::new(server.clone())?);
        Ok(Self::builder_dangerous(server).port(SUBMISSION_PORT).tls(tls))
    }

    /// Creates a builder without any encryption
    ///
    /// Credentials travel in the clear; only use this against servers
    /// on a trusted network.
    pub fn builder_dangerous<S: Into<String>>(server: S) -> SmtpTransportBuilder {
        SmtpTransportBuilder {
            info: SmtpInfo {
                server: server.into(),
                port: SMTP_PORT,
                hello_name: ClientId::default(),
                credentials: Credentials::default(),
                tls: Tls::None,
                timeout: Some(DEFAULT_TIMEOUT),
                keep_alive: false,
            },
        }
    }

    /// The underlying session
    pub fn session(&mut self) -> &mut SmtpSession {
        &mut self.session
    }
}

impl Transport for SmtpTransport {
    fn send_compiled(
        &mut self,
        message: &CompiledMessage,
        recipients: &[EmailAddress],
    ) -> Result<usize, crate::Error> {
        self.session.send(message, recipients).map_err(crate::Error::from)
    }
}

/// Contains client configuration for the SMTP transport
#[derive(Debug, Clone)]
pub struct SmtpTransportBuilder {
    info: SmtpInfo,
}

impl SmtpTransportBuilder {
    /// Server port
    pub fn port(mut self, port: u16) -> Self {
        self.info.port = port;
        self
    }

    /// Name sent during EHLO
    pub fn hello_name(mut self, name: ClientId) -> Self {
        self.info.hello_name = name;
        self
    }

    /// Credentials for the AUTH exchange
    ///
    /// The exchange runs on every connection; when this is never called
    /// it runs with empty credentials, which real servers reject.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.info.credentials = credentials;
        self
    }

    /// Encryption policy
    pub fn tls(mut self, tls: Tls) -> Self {
        self.info.tls = tls;
        self
    }

    /// Timeout for connects, reads and writes, `None` to block forever
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.info.timeout = timeout;
        self
    }

    /// Keep the connection open between deliveries
    ///
    /// A kept connection is probed with NOOP before each reuse and
    /// reconnected transparently when dead.
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.info.keep_alive = keep_alive;
        self
    }

    /// Builds the transport on plain TCP
    pub fn build(self) -> SmtpTransport {
        self.build_with_connector(Box::new(TcpConnector))
    }

    /// Builds the transport on a custom connector
    pub fn build_with_connector(self, connector: Box<dyn Connector + Send>) -> SmtpTransport {
        SmtpTransport {
            session: SmtpSession::new(self.info, connector),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = SmtpTransport::builder_dangerous("localhost");
        assert_eq!(builder.info.port, SMTP_PORT);
        assert_eq!(builder.info.credentials, Credentials::default());
        assert!(matches!(builder.info.tls, Tls::None));
        assert_eq!(builder.info.timeout, Some(DEFAULT_TIMEOUT));
        assert!(!builder.info.keep_alive);
    }

    #[test]
    fn secure_builder_requires_tls_on_submission_port() {
        let builder = SmtpTransport::builder("smtp.example.com").unwrap();
        assert_eq!(builder.info.port, SUBMISSION_PORT);
        assert!(matches!(builder.info.tls, Tls::Required(_)));
    }
}
