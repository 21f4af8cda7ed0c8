//! Delivery agents for compiled messages

use email_address::EmailAddress;

use crate::{
    error::Error,
    message::{compiled::CompiledMessage, Message},
};

pub mod sendmail;
pub mod smtp;
pub mod stub;

/// A delivery agent
///
/// Implementations hand a compiled message to some mail infrastructure:
/// an SMTP server, a local sendmail binary, or a sink for tests. The
/// trait is object safe so a dispatcher can hold any agent behind
/// `Box<dyn Transport>`.
pub trait Transport {
    /// Delivers an already compiled message
    ///
    /// Returns the number of recipients accepted by the agent.
    fn send_compiled(
        &mut self,
        message: &CompiledMessage,
        recipients: &[EmailAddress],
    ) -> Result<usize, Error>;

    /// Compiles and delivers a message
    fn send(&mut self, message: &Message, recipients: &[EmailAddress]) -> Result<usize, Error> {
        let compiled = message.compile()?;
        self.send_compiled(&compiled, recipients)
    }
}
