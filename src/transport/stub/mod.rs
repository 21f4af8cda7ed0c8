//! A transport that keeps messages in memory, for testing

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;

use crate::{
    message::compiled::CompiledMessage,
    transport::Transport,
};

/// A delivery recorded by a [`StubTransport`]
#[derive(Debug, Clone)]
pub struct StubDelivery {
    /// The compiled message
    pub message: CompiledMessage,
    /// Recipients it was addressed to
    pub recipients: Vec<EmailAddress>,
}

/// Accepts every message and records it instead of delivering
///
/// Clones share the record, so a handle kept by the test keeps seeing
/// deliveries after the transport has been handed to a dispatcher.
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    deliveries: Arc<Mutex<Vec<StubDelivery>>>,
}

impl StubTransport {
    /// Creates an empty stub
    pub fn new() -> StubTransport {
        StubTransport::default()
    }

    /// Everything sent through this stub so far
    pub fn deliveries(&self) -> Vec<StubDelivery> {
        match self.deliveries.lock() {
            Ok(deliveries) => deliveries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Transport for StubTransport {
    fn send_compiled(
        &mut self,
        message: &CompiledMessage,
        recipients: &[EmailAddress],
    ) -> Result<usize, crate::Error> {
        let delivery = StubDelivery {
            message: message.clone(),
            recipients: recipients.to_vec(),
        };
        match self.deliveries.lock() {
            Ok(mut deliveries) => deliveries.push(delivery),
            Err(poisoned) => poisoned.into_inner().push(delivery),
        }
        Ok(recipients.len())
    }
}
