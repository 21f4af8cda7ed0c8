//! TLS configuration for STARTTLS upgrades

use native_tls::TlsConnector;

use crate::transport::smtp::error::Error;

/// Parameters for a STARTTLS handshake
#[derive(Clone)]
pub struct TlsParameters {
    pub(crate) connector: TlsConnector,
    domain: String,
}

impl std::fmt::Debug for TlsParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsParameters")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl TlsParameters {
    /// Creates parameters verifying certificates against `domain`
    pub fn new<S: Into<String>>(domain: S) -> Result<TlsParameters, Error> {
        let connector = TlsConnector::new().map_err(|e| Error::TlsNegotiateFailed(e.to_string()))?;
        Ok(TlsParameters::new_with_connector(domain, connector))
    }

    /// Creates parameters from a preconfigured connector
    pub fn new_with_connector<S: Into<String>>(domain: S, connector: TlsConnector) -> TlsParameters {
        TlsParameters {
            connector,
            domain: domain.into(),
        }
    }

    /// Domain name the server certificate must match
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
