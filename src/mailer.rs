//! Message dispatch
//!
//! [`Mailer`] ties a sender identity and a [`ClientConfig`] to one
//! delivery agent. It composes messages carrying that identity and hands
//! them to the agent, which may be any [`Transport`] implementation.

use email_address::EmailAddress;
use tracing::debug;

use crate::{
    error::Error,
    message::{body::Body, mailbox::Mailbox, EndOfLine, Message},
    transport::Transport,
};

/// Shared composition settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Value of the `X-Mailer` header
    pub name: String,
    /// Line terminator for compiled output
    pub eol: EndOfLine,
    /// Prefixes for the three generated MIME boundaries
    pub boundary_prefixes: [String; 3],
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            name: concat!("Courriel ", env!("CARGO_PKG_VERSION")).to_owned(),
            eol: EndOfLine::default(),
            boundary_prefixes: [
                "Courriel_B1_".to_owned(),
                "Courriel_B2_".to_owned(),
                "Courriel_B3_".to_owned(),
            ],
        }
    }
}

impl ClientConfig {
    /// Derives the three message boundaries from a unique token
    ///
    /// The first two delimit the mixed and alternative parts; the third
    /// is reserved for a future related part and never emitted today.
    pub fn mime_boundaries(&self, token: &str) -> [String; 3] {
        [
            format!("{}{token}", self.boundary_prefixes[0]),
            format!("{}{token}", self.boundary_prefixes[1]),
            format!("{}{token}", self.boundary_prefixes[2]),
        ]
    }
}

/// Composes messages for one sender and dispatches them to an agent
pub struct Mailer {
    sender: Mailbox,
    config: ClientConfig,
    agent: Box<dyn Transport + Send>,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("sender", &self.sender)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    /// Creates a mailer with the default configuration
    pub fn new(sender: Mailbox, agent: Box<dyn Transport + Send>) -> Mailer {
        Mailer::with_config(sender, ClientConfig::default(), agent)
    }

    /// Creates a mailer with an explicit configuration
    pub fn with_config(
        sender: Mailbox,
        config: ClientConfig,
        agent: Box<dyn Transport + Send>,
    ) -> Mailer {
        Mailer {
            sender,
            config,
            agent,
        }
    }

    /// Identity stamped on composed messages
    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }

    /// Composition settings
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Starts a message from this mailer's identity and configuration
    pub fn compose<S: Into<String>>(&self, subject: S, body: Body) -> Message {
        Message::with_config(subject, body, self.sender.clone(), self.config.clone())
    }

    /// Compiles a message and hands it to the delivery agent
    ///
    /// Returns the number of recipients the agent accepted. An empty
    /// recipient list is a no-op.
    pub fn send(&mut self, message: &Message, recipients: &[EmailAddress]) -> Result<usize, Error> {
        if recipients.is_empty() {
            debug!("no recipients, skipping dispatch");
            return Ok(0);
        }
        self.agent.send(message, recipients)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::transport::stub::StubTransport;

    fn mailer_with_stub() -> (Mailer, StubTransport) {
        let stub = StubTransport::new();
        let mailer = Mailer::new(
            Mailbox::new(
                "no-reply@example.com".parse().unwrap(),
                Some("Example".into()),
            ),
            Box::new(stub.clone()),
        );
        (mailer, stub)
    }

    #[test]
    fn composed_messages_carry_the_mailer_identity() {
        let (mailer, _) = mailer_with_stub();
        let compiled = mailer.compose("hi", Body::plain("hello")).compile().unwrap();
        let text = String::from_utf8(compiled.body().to_vec()).unwrap();
        assert!(text.contains("From: Example <no-reply@example.com>"));
        assert!(text.contains(&format!("X-Mailer: {}", mailer.config().name)));
    }

    #[test]
    fn send_goes_through_the_agent() {
        let (mut mailer, stub) = mailer_with_stub();
        let message = mailer.compose("hi", Body::plain("hello"));
        let recipients: Vec<EmailAddress> = vec!["to@example.com".parse().unwrap()];

        assert_eq!(mailer.send(&message, &recipients).unwrap(), 1);

        let deliveries = stub.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].recipients, recipients);
        assert_eq!(deliveries[0].message.subject(), "hi");
    }

    #[test]
    fn empty_recipient_list_is_a_no_op() {
        let (mut mailer, stub) = mailer_with_stub();
        let message = mailer.compose("hi", Body::plain("hello"));

        assert_eq!(mailer.send(&message, &[]).unwrap(), 0);
        assert!(stub.deliveries().is_empty());
    }

    #[test]
    fn boundary_prefixes_are_applied_in_order() {
        let boundaries = ClientConfig::default().mime_boundaries("abc123");
        assert_eq!(boundaries[0], "Courriel_B1_abc123");
        assert_eq!(boundaries[1], "Courriel_B2_abc123");
        assert_eq!(boundaries[2], "Courriel_B3_abc123");
    }
}
