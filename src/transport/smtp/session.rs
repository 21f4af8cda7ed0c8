//! The SMTP session state machine
//!
//! [`SmtpSession`] owns one server conversation end to end: connect,
//! capability negotiation, optional STARTTLS upgrade and authentication,
//! then any number of deliveries. A session that is reused after an idle
//! period probes the stream with NOOP first and transparently reconnects
//! once if the probe fails.

use std::{
    io::{self, BufRead, BufReader, Write},
    time::Duration,
};

use email_address::EmailAddress;
use tracing::debug;

use crate::{
    message::compiled::CompiledMessage,
    transport::smtp::{
        authentication::Credentials,
        codec::encode_body,
        commands::{Auth, Command, Data, Ehlo, EndOfData, Mail, Noop, Quit, Rcpt, Rset, Starttls},
        error::Error,
        extension::{ClientId, ServerCapabilities},
        net::{Connector, NetworkStream},
        response::{is_final_line, parse_line, Response},
        Tls,
    },
};

/// Where the session currently stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No open stream
    Disconnected,
    /// Stream open, greeting accepted
    Connected,
    /// EHLO exchanged, capabilities parsed
    CapabilitiesKnown,
    /// Credentials accepted
    Authenticated,
    /// Ready to accept deliveries
    Ready,
}

/// Connection settings for a session
#[derive(Debug, Clone)]
pub struct SmtpInfo {
    /// Server hostname or address
    pub server: String,
    /// Server port
    pub port: u16,
    /// Name sent with EHLO
    pub hello_name: ClientId,
    /// Credentials for the mandatory AUTH exchange
    ///
    /// There is no anonymous-relay path: the server must offer a
    /// mechanism and the exchange always runs, with empty credentials
    /// when none were configured.
    pub credentials: Credentials,
    /// Encryption policy
    pub tls: Tls,
    /// Socket timeout for connects, reads and writes
    pub timeout: Option<Duration>,
    /// Keep the connection open after a delivery
    pub keep_alive: bool,
}

/// A blocking SMTP client session
pub struct SmtpSession {
    info: SmtpInfo,
    connector: Box<dyn Connector + Send>,
    stream: Option<BufReader<NetworkStream>>,
    state: SessionState,
    capabilities: ServerCapabilities,
    last_response: String,
}

impl std::fmt::Debug for SmtpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSession")
            .field("info", &self.info)
            .field("state", &self.state)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl SmtpSession {
    /// Creates a session that connects through the given connector
    ///
    /// Nothing touches the network until the first delivery or an
    /// explicit [`connect`](SmtpSession::connect).
    pub fn new(info: SmtpInfo, connector: Box<dyn Connector + Send>) -> SmtpSession {
        SmtpSession {
            info,
            connector,
            stream: None,
            state: SessionState::Disconnected,
            capabilities: ServerCapabilities::default(),
            last_response: String::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Capabilities the server advertised, empty while disconnected
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// Ensures a live, fully negotiated connection
    ///
    /// An existing stream is probed with NOOP; if the probe fails the dead
    /// stream is discarded and one reconnect is attempted. Establishment
    /// errors always leave the session disconnected.
    pub fn connect(&mut self) -> Result<(), Error> {
        if self.stream.is_some() {
            match self.command(Noop, 250) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    debug!("liveness probe failed ({e}), reconnecting");
                    self.drop_stream();
                }
            }
        }
        match self.establish() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.drop_stream();
                Err(e)
            }
        }
    }

    /// Delivers an already compiled message to the given recipients
    ///
    /// Returns the number of recipients the server accepted. The first
    /// rejected recipient aborts the whole delivery before DATA.
    pub fn send(
        &mut self,
        message: &CompiledMessage,
        recipients: &[EmailAddress],
    ) -> Result<usize, Error> {
        self.connect()?;

        // Clear any state a previous delivery may have left behind. The
        // reply code is not checked, some servers answer RSET oddly.
        self.command(Rset, 0)?;

        self.command(Mail(message.sender().email.clone()), 250)?;

        let mut accepted = 0;
        for recipient in recipients {
            match self.command(Rcpt(recipient.clone()), 250) {
                Ok(_) => accepted += 1,
                Err(Error::UnexpectedResponse { .. }) => {
                    return Err(Error::InvalidRecipient(format!(
                        "{recipient}: {}",
                        self.last_response
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        let payload = encode_body(message.body());
        if let Some(max) = self.capabilities.size {
            if payload.len() > max {
                return Err(Error::ExceedsMaximumSize {
                    actual: payload.len(),
                    max,
                });
            }
        }

        self.command(Data, 354)?;
        self.write_payload(&payload)?;
        self.command(EndOfData, 250)?;
        debug!(
            "delivered {} bytes to {} recipient(s)",
            payload.len(),
            accepted
        );

        if !self.info.keep_alive {
            self.quit();
        }
        Ok(accepted)
    }

    /// Sends QUIT as a courtesy and closes the stream
    ///
    /// A server that answers QUIT badly or not at all is ignored; the
    /// stream is dropped either way.
    pub fn quit(&mut self) {
        if self.stream.is_some() {
            if let Err(e) = self.command(Quit, 221) {
                debug!("QUIT not acknowledged ({e})");
            }
        }
        self.drop_stream();
    }

    fn establish(&mut self) -> Result<(), Error> {
        debug!("connecting to {}:{}", self.info.server, self.info.port);
        let stream = self
            .connector
            .open(&self.info.server, self.info.port, self.info.timeout)
            .map_err(Error::Connection)?;
        stream.set_read_timeout(self.info.timeout)?;
        stream.set_write_timeout(self.info.timeout)?;
        self.stream = Some(BufReader::new(stream));
        self.state = SessionState::Connected;

        let greeting = self.read_response()?;
        if !greeting.is(220) {
            return Err(Error::UnexpectedResponse {
                command: "CONNECT",
                expected: 220,
                got: greeting.code(),
            });
        }

        self.ehlo()?;

        if let Tls::Required(tls) = self.info.tls.clone() {
            if !self.capabilities.starttls {
                return Err(Error::TlsNotAvailable);
            }
            self.command(Starttls, 220)?;
            let reader = self.stream.take().ok_or_else(not_connected)?;
            let upgraded = reader.into_inner().upgrade_tls(&tls)?;
            self.stream = Some(BufReader::new(upgraded));
            debug!("TLS established, renegotiating capabilities");
            // The capability set may differ on the encrypted channel
            self.ehlo()?;
        }

        let credentials = self.info.credentials.clone();
        self.authenticate(&credentials)?;
        self.state = SessionState::Authenticated;

        self.state = SessionState::Ready;
        Ok(())
    }

    fn ehlo(&mut self) -> Result<(), Error> {
        let response = self.command(Ehlo(self.info.hello_name.clone()), 250)?;
        self.capabilities = ServerCapabilities::from_response(&response);
        self.state = SessionState::CapabilitiesKnown;
        Ok(())
    }

    fn authenticate(&mut self, credentials: &Credentials) -> Result<(), Error> {
        if self.capabilities.auth_login {
            self.auth_step(Auth("AUTH LOGIN".to_owned()), 334)?;
            self.auth_step(Auth(credentials.encoded_username()), 334)?;
            self.auth_step(Auth(credentials.encoded_password()), 235)?;
        } else if self.capabilities.auth_plain {
            self.auth_step(
                Auth(format!("AUTH PLAIN {}", credentials.plain_token())),
                235,
            )?;
        } else {
            return Err(Error::AuthUnavailable);
        }
        debug!("authenticated as {}", credentials.username());
        Ok(())
    }

    fn auth_step(&mut self, step: Auth, expected: u16) -> Result<(), Error> {
        match self.command(step, expected) {
            Ok(_) => Ok(()),
            Err(Error::UnexpectedResponse { .. }) => {
                Err(Error::AuthFailed(self.last_response.clone()))
            }
            Err(e) => Err(e),
        }
    }

    /// Sends one command and reads the reply
    ///
    /// `expected == 0` skips the reply code check.
    fn command<C: Command>(&mut self, command: C, expected: u16) -> Result<Response, Error> {
        let wire = command.to_string();
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        stream.get_mut().write_all(wire.as_bytes())?;
        stream.get_mut().flush()?;
        debug!(">> {}", escape_crlf(&wire));

        let response = self.read_response()?;
        self.last_response = response.first_line().to_owned();
        if expected != 0 && !response.is(expected) {
            return Err(Error::UnexpectedResponse {
                command: command.verb(),
                expected,
                got: response.code(),
            });
        }
        Ok(response)
    }

    /// Reads one complete, possibly multi-line reply
    fn read_response(&mut self) -> Result<Response, Error> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if stream.read_line(&mut line)? == 0 {
                return Err(Error::Network(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                )));
            }
            debug!("<< {}", line.trim_end());
            let done = is_final_line(&line);
            lines.push(parse_line(&line));
            if done {
                return Ok(Response::new(lines));
            }
        }
    }

    fn write_payload(&mut self, payload: &[u8]) -> Result<(), Error> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        stream.get_mut().write_all(payload)?;
        if !payload.ends_with(b"\r\n") {
            stream.get_mut().write_all(b"\r\n")?;
        }
        stream.get_mut().flush()?;
        Ok(())
    }

    fn drop_stream(&mut self) {
        self.stream = None;
        self.state = SessionState::Disconnected;
        self.capabilities = ServerCapabilities::default();
    }
}

fn not_connected() -> Error {
    Error::Network(io::Error::new(io::ErrorKind::NotConnected, "not connected"))
}

fn escape_crlf(string: &str) -> String {
    string.replace("\r\n", "<CRLF>")
}
