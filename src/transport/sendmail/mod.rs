//! The sendmail transport
//!
//! Hands compiled messages to a local `sendmail` binary. Useful on hosts
//! with a configured MTA, and as a fallback when no SMTP relay is
//! reachable.

use std::{
    io::Write,
    process::{Command, Stdio},
};

use email_address::EmailAddress;
use tracing::debug;

use crate::{
    message::compiled::CompiledMessage,
    transport::Transport,
};

pub mod error;

const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";

/// Sends messages through a local `sendmail` command
#[derive(Debug, Clone)]
pub struct SendmailTransport {
    command: String,
}

impl SendmailTransport {
    /// Creates a transport using the conventional `/usr/sbin/sendmail`
    pub fn new() -> SendmailTransport {
        SendmailTransport {
            command: DEFAULT_SENDMAIL.to_owned(),
        }
    }

    /// Creates a transport using the given command
    pub fn new_with_command<S: Into<String>>(command: S) -> SendmailTransport {
        SendmailTransport {
            command: command.into(),
        }
    }

    fn deliver(
        &self,
        message: &CompiledMessage,
        recipients: &[EmailAddress],
    ) -> Result<usize, error::Error> {
        // -i keeps a lone dot line from ending the message early
        let mut command = Command::new(&self.command);
        command
            .arg("-i")
            .arg("-f")
            .arg(message.sender().email.to_string());
        for recipient in recipients {
            command.arg(recipient.to_string());
        }

        let mut process = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        match process.stdin.take() {
            Some(mut stdin) => stdin.write_all(message.body())?,
            None => {
                return Err(error::Error::Client(std::io::Error::other(
                    "sendmail stdin unavailable",
                )))
            }
        }

        let output = process.wait_with_output()?;
        if !output.status.success() {
            return Err(error::Error::Command(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        debug!("message delivered to the sendmail command");
        Ok(recipients.len())
    }
}

impl Default for SendmailTransport {
    fn default() -> Self {
        SendmailTransport::new()
    }
}

impl Transport for SendmailTransport {
    fn send_compiled(
        &mut self,
        message: &CompiledMessage,
        recipients: &[EmailAddress],
    ) -> Result<usize, crate::Error> {
        self.deliver(message, recipients).map_err(crate::Error::from)
    }
}
