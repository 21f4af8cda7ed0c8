//! TCP and TLS stream plumbing

use std::{
    io::{self, Read, Write},
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use native_tls::TlsStream;

use crate::transport::smtp::{error::Error, mock::MockStream, tls::TlsParameters};

/// A stream carrying an SMTP conversation
#[allow(missing_debug_implementations)]
pub enum NetworkStream {
    /// Plain TCP
    Tcp(TcpStream),
    /// Encrypted TCP
    Tls(Box<TlsStream<TcpStream>>),
    /// Scripted in-memory stream, for tests
    Mock(MockStream),
}

impl NetworkStream {
    /// Performs the TLS handshake, replacing the plain stream
    ///
    /// A mock stream is returned unchanged so scripted sessions can
    /// exercise the upgrade path; a stream that is already encrypted is
    /// returned unchanged as well.
    pub fn upgrade_tls(self, tls: &TlsParameters) -> Result<NetworkStream, Error> {
        match self {
            NetworkStream::Tcp(stream) => {
                let encrypted = tls
                    .connector
                    .connect(tls.domain(), stream)
                    .map_err(|e| Error::TlsNegotiateFailed(e.to_string()))?;
                Ok(NetworkStream::Tls(Box::new(encrypted)))
            }
            other => Ok(other),
        }
    }

    /// Sets the timeout for subsequent reads
    pub fn set_read_timeout(&self, duration: Option<Duration>) -> io::Result<()> {
        match self {
            NetworkStream::Tcp(stream) => stream.set_read_timeout(duration),
            NetworkStream::Tls(stream) => stream.get_ref().set_read_timeout(duration),
            NetworkStream::Mock(_) => Ok(()),
        }
    }

    /// Sets the timeout for subsequent writes
    pub fn set_write_timeout(&self, duration: Option<Duration>) -> io::Result<()> {
        match self {
            NetworkStream::Tcp(stream) => stream.set_write_timeout(duration),
            NetworkStream::Tls(stream) => stream.get_ref().set_write_timeout(duration),
            NetworkStream::Mock(_) => Ok(()),
        }
    }
}

impl Read for NetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            NetworkStream::Tcp(stream) => stream.read(buf),
            NetworkStream::Tls(stream) => stream.read(buf),
            NetworkStream::Mock(stream) => stream.read(buf),
        }
    }
}

impl Write for NetworkStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            NetworkStream::Tcp(stream) => stream.write(buf),
            NetworkStream::Tls(stream) => stream.write(buf),
            NetworkStream::Mock(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            NetworkStream::Tcp(stream) => stream.flush(),
            NetworkStream::Tls(stream) => stream.flush(),
            NetworkStream::Mock(stream) => stream.flush(),
        }
    }
}

/// Opens streams to the server
///
/// The session goes through this seam for both the initial connection and
/// transparent reconnects, which lets tests substitute scripted streams.
pub trait Connector {
    /// Opens a fresh stream to `server:port`
    fn open(&mut self, server: &str, port: u16, timeout: Option<Duration>)
        -> io::Result<NetworkStream>;
}

/// Production connector backed by `TcpStream`
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    fn open(
        &mut self,
        server: &str,
        port: u16,
        timeout: Option<Duration>,
    ) -> io::Result<NetworkStream> {
        let stream = match timeout {
            Some(duration) => {
                let mut last_err = io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "could not resolve any address",
                );
                let mut stream = None;
                for addr in (server, port).to_socket_addrs()? {
                    match TcpStream::connect_timeout(&addr, duration) {
                        Ok(s) => {
                            stream = Some(s);
                            break;
                        }
                        Err(e) => last_err = e,
                    }
                }
                match stream {
                    Some(s) => s,
                    None => return Err(last_err),
                }
            }
            None => TcpStream::connect((server, port))?,
        };
        Ok(NetworkStream::Tcp(stream))
    }
}
