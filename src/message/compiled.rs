//! Compiled MIME artifact

use crate::message::mailbox::Mailbox;

/// A message compiled into a single MIME byte sequence
///
/// Produced once by [`Message::compile`](crate::Message::compile) and
/// consumed as-is by delivery agents; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    subject: String,
    body: Vec<u8>,
    sender: Mailbox,
}

impl CompiledMessage {
    pub(crate) fn new(subject: String, body: Vec<u8>, sender: Mailbox) -> CompiledMessage {
        CompiledMessage {
            subject,
            body,
            sender,
        }
    }

    /// Message subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Full MIME payload, headers included
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Envelope sender
    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }
}
