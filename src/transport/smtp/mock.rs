//! Scripted in-memory stream for session tests

use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use crate::transport::smtp::net::{Connector, NetworkStream};

/// One scripted server action
#[derive(Debug, Clone)]
pub enum ScriptEntry {
    /// Serve these bytes to the next reads
    Reply(String),
    /// Fail the next read as if the socket timed out
    Timeout,
}

#[derive(Debug, Default)]
struct Shared {
    script: VecDeque<ScriptEntry>,
    wrote: Vec<u8>,
}

/// A stream that serves scripted replies and records written bytes
///
/// Clones share state, so a stream handed to a session stays observable
/// from the test.
#[derive(Debug, Clone, Default)]
pub struct MockStream {
    shared: Arc<Mutex<Shared>>,
    pending: Vec<u8>,
}

impl MockStream {
    /// Creates a stream that will serve the given replies in order
    pub fn new<I: IntoIterator<Item = ScriptEntry>>(script: I) -> MockStream {
        MockStream {
            shared: Arc::new(Mutex::new(Shared {
                script: script.into_iter().collect(),
                wrote: Vec::new(),
            })),
            pending: Vec::new(),
        }
    }

    /// Everything written to the stream so far
    pub fn written(&self) -> Vec<u8> {
        match self.shared.lock() {
            Ok(shared) => shared.wrote.clone(),
            Err(poisoned) => poisoned.into_inner().wrote.clone(),
        }
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            let entry = match self.shared.lock() {
                Ok(mut shared) => shared.script.pop_front(),
                Err(poisoned) => poisoned.into_inner().script.pop_front(),
            };
            match entry {
                Some(ScriptEntry::Reply(text)) => self.pending = text.into_bytes(),
                Some(ScriptEntry::Timeout) => {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "scripted timeout"));
                }
                None => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.shared.lock() {
            Ok(mut shared) => shared.wrote.extend_from_slice(buf),
            Err(poisoned) => poisoned.into_inner().wrote.extend_from_slice(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Connector serving one scripted stream per open call
///
/// Counts how many streams were opened through a shared handle, which
/// lets tests assert on reconnect behavior after the connector has been
/// handed to a session.
#[derive(Debug, Default)]
pub struct MockConnector {
    streams: VecDeque<MockStream>,
    opened: Arc<AtomicUsize>,
}

impl MockConnector {
    /// Creates a connector serving the given streams in order
    pub fn new<I: IntoIterator<Item = MockStream>>(streams: I) -> MockConnector {
        MockConnector {
            streams: streams.into_iter().collect(),
            opened: Arc::default(),
        }
    }

    /// Shared counter of streams handed out so far
    pub fn opened(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.opened)
    }
}

impl Connector for MockConnector {
    fn open(
        &mut self,
        _server: &str,
        _port: u16,
        _timeout: Option<Duration>,
    ) -> io::Result<NetworkStream> {
        self.opened.fetch_add(1, Ordering::Relaxed);
        match self.streams.pop_front() {
            Some(stream) => Ok(NetworkStream::Mock(stream)),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no more scripted streams",
            )),
        }
    }
}
