//! ESMTP capability handling

use std::fmt::{self, Display, Formatter};

use crate::transport::smtp::response::Response;

/// Client identifier, the parameter to `EHLO`
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ClientId {
    /// A fully-qualified domain name
    Domain(String),
}

impl Default for ClientId {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|s| s.into_string().ok())
            .filter(|s| !s.is_empty());
        match hostname {
            Some(name) => Self::Domain(name),
            None => Self::Domain("localhost".to_owned()),
        }
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(value) => f.write_str(value),
        }
    }
}

impl ClientId {
    /// Creates a new `ClientId` from a fully qualified domain name
    pub fn new(domain: String) -> Self {
        Self::Domain(domain)
    }
}

/// Capabilities advertised by the server in its `EHLO` reply
///
/// Parsed again after a successful STARTTLS upgrade, since servers may
/// advertise a different set over the encrypted channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerCapabilities {
    /// Server advertises STARTTLS
    pub starttls: bool,
    /// Server accepts 8-bit body octets
    pub eight_bit_mime: bool,
    /// Maximum accepted message size in bytes; `None` when the server
    /// declares none or declares zero (unbounded)
    pub size: Option<usize>,
    /// Server offers the LOGIN authentication mechanism
    pub auth_login: bool,
    /// Server offers the PLAIN authentication mechanism
    pub auth_plain: bool,
}

impl ServerCapabilities {
    /// Extracts capabilities from an `EHLO` reply
    ///
    /// Only lines carrying code 220 or 250 are inspected; unknown
    /// keywords are ignored.
    pub fn from_response(response: &Response) -> ServerCapabilities {
        let mut caps = ServerCapabilities::default();
        let lines = response
            .lines_with_code(220)
            .chain(response.lines_with_code(250));
        for line in lines {
            let mut words = line.split_whitespace();
            let Some(keyword) = words.next() else {
                continue;
            };
            match keyword.to_ascii_uppercase().as_str() {
                "STARTTLS" => caps.starttls = true,
                "8BITMIME" => caps.eight_bit_mime = true,
                "SIZE" => {
                    // SIZE 0 declares no fixed limit, per RFC 1870
                    caps.size = words
                        .next()
                        .and_then(|arg| arg.parse().ok())
                        .filter(|&n: &usize| n > 0);
                }
                "AUTH" => {
                    for mechanism in words {
                        match mechanism.to_ascii_uppercase().as_str() {
                            "LOGIN" => caps.auth_login = true,
                            "PLAIN" => caps.auth_plain = true,
                            _ => (),
                        }
                    }
                }
                _ => (),
            }
        }
        caps
    }

    /// Whether any supported authentication mechanism is offered
    pub fn supports_auth(&self) -> bool {
        self.auth_login || self.auth_plain
    }
}
