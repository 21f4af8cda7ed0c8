//! Message composition and MIME compilation
//!
//! A [`Message`] collects everything a logical email is made of: subject,
//! sender, bodies, caller headers and attachments. [`Message::compile`]
//! deterministically serializes it into a single
//! [`CompiledMessage`](compiled::CompiledMessage) suitable for any delivery
//! agent: an outer `multipart/mixed` (attachments) wrapping a
//! `multipart/alternative` (plaintext/HTML), per RFC 2045/2046.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    mailer::ClientConfig,
    message::{
        attachment::Attachment, body::Body, compiled::CompiledMessage, error::ComposeError,
        mailbox::Mailbox,
    },
};

pub mod attachment;
pub mod body;
pub mod compiled;
pub mod error;
pub mod mailbox;

/// Header keys owned by the compiler; callers may not override them
const RESERVED_HEADERS: &[&str] = &["from", "subject", "content-type", "x-mailer"];

/// Line terminator used when joining the compiled MIME output
///
/// This only affects the compiled artifact; SMTP transmission normalizes to
/// CRLF regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfLine {
    /// `\r\n`
    CrLf,
    /// `\n`
    Lf,
    /// `\r`
    Cr,
}

impl EndOfLine {
    /// The literal terminator bytes
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::CrLf => "\r\n",
            EndOfLine::Lf => "\n",
            EndOfLine::Cr => "\r",
        }
    }
}

impl Default for EndOfLine {
    /// Platform line terminator
    fn default() -> Self {
        #[cfg(windows)]
        return EndOfLine::CrLf;
        #[cfg(not(windows))]
        EndOfLine::Lf
    }
}

/// A logical email message, not yet serialized
#[derive(Debug, Clone)]
pub struct Message {
    subject: String,
    body: Body,
    sender: Mailbox,
    config: ClientConfig,
    headers: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl Message {
    /// Creates a message with the default [`ClientConfig`]
    pub fn new<S: Into<String>>(subject: S, body: Body, sender: Mailbox) -> Message {
        Message::with_config(subject, body, sender, ClientConfig::default())
    }

    /// Creates a message carrying an explicit client configuration
    pub fn with_config<S: Into<String>>(
        subject: S,
        body: Body,
        sender: Mailbox,
        config: ClientConfig,
    ) -> Message {
        Message {
            subject: subject.into(),
            body,
            sender,
            config,
            headers: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Sets a custom header
    ///
    /// Setting the same key twice replaces the previous value. The keys
    /// `from`, `subject`, `content-type` and `x-mailer` (case-insensitive)
    /// belong to the compiler and are rejected with
    /// [`ComposeError::HeaderConflict`].
    pub fn header<K: Into<String>, V: Into<String>>(
        mut self,
        key: K,
        value: V,
    ) -> Result<Message, ComposeError> {
        let key = key.into();
        if RESERVED_HEADERS.contains(&key.to_lowercase().as_str()) {
            return Err(ComposeError::HeaderConflict(key));
        }

        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value.into(),
            None => self.headers.push((key, value.into())),
        }
        Ok(self)
    }

    /// Adds an attachment
    pub fn attachment(mut self, attachment: Attachment) -> Message {
        self.attachments.push(attachment);
        self
    }

    /// Message subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Envelope sender
    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }

    /// Attached files
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Serializes the message into a MIME byte sequence
    ///
    /// Boundaries are derived from a token unique to this call, so two
    /// compilations of the same message never share boundaries.
    pub fn compile(&self) -> Result<CompiledMessage, ComposeError> {
        let [outer, inner, _related] = self.config.mime_boundaries(&unique_token(&self.subject));
        let mut lines: Vec<String> = Vec::new();

        // Headers owned by the compiler, then the caller's
        lines.push(match &self.sender.name {
            Some(name) => format!("From: {} <{}>", name, self.sender.email),
            None => format!("From:<{}>", self.sender.email),
        });
        lines.push(format!("Subject: {}", self.subject));
        lines.push("MIME-Version: 1.0".to_owned());
        lines.push(format!("X-Mailer: {}", self.config.name));
        lines.push(format!(
            "Content-Type: multipart/mixed; boundary=\"{outer}\""
        ));
        for (key, value) in &self.headers {
            lines.push(format!("{key}: {value}"));
        }
        lines.push(String::new());

        lines.push("This is a multi-part message in MIME format.".to_owned());
        lines.push(format!("--{outer}"));
        lines.push(format!(
            "Content-Type: multipart/alternative; boundary=\"{inner}\""
        ));
        lines.push(String::new());

        // Least faithful variant first
        if let Some(plain) = self.body.plain_part() {
            push_body_part(&mut lines, &inner, "text/plain", plain);
        }
        if let Some(html) = self.body.html_part() {
            push_body_part(&mut lines, &inner, "text/html", html);
        }
        lines.push(format!("--{inner}--"));

        for attachment in &self.attachments {
            lines.push(format!("--{outer}"));
            lines.extend(attachment.mime_lines()?);
        }
        lines.push(format!("--{outer}--"));

        let body = lines.join(self.config.eol.as_str()).into_bytes();
        Ok(CompiledMessage::new(
            self.subject.clone(),
            body,
            self.sender.clone(),
        ))
    }
}

fn push_body_part(lines: &mut Vec<String>, boundary: &str, content_type: &str, text: &str) {
    let (charset, encoding) = charset_for(text);
    lines.push(format!("--{boundary}"));
    lines.push(format!("Content-Type: {content_type}; charset={charset}"));
    lines.push(format!("Content-Transfer-Encoding: {encoding}"));
    lines.push(String::new());
    lines.push(text.to_owned());
}

/// Charset and transfer encoding for a body part
///
/// Any byte >= 0x80 selects UTF-8 with 8-bit transfer encoding, otherwise
/// the part is plain US-ASCII.
fn charset_for(text: &str) -> (&'static str, &'static str) {
    if text.bytes().any(|b| b >= 0x80) {
        ("utf-8", "8Bit")
    } else {
        ("us-ascii", "7Bit")
    }
}

/// Creates a boundary token unique to this compile call
///
/// Practically unique, not cryptographically: a hash of the subject, the
/// wall clock and a process-wide counter.
fn unique_token(subject: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut hasher = DefaultHasher::new();
    subject.hash(&mut hasher);
    if let Ok(elapsed) = SystemTime::now().duration_since(UNIX_EPOCH) {
        elapsed.as_nanos().hash(&mut hasher);
    }
    COUNTER.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sender() -> Mailbox {
        Mailbox::new("no-reply@example.com".parse().unwrap(), None)
    }

    fn compiled_text(message: &Message) -> String {
        String::from_utf8(message.compile().unwrap().body().to_vec()).unwrap()
    }

    #[test]
    fn reserved_headers_are_rejected_case_insensitively() {
        for key in ["from", "From", "SUBJECT", "Content-Type", "x-MAILER"] {
            let result =
                Message::new("hello", Body::plain("hi"), sender()).header(key, "oops");
            assert!(
                matches!(result, Err(ComposeError::HeaderConflict(_))),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn custom_header_appears_once() {
        let message = Message::new("hello", Body::plain("hi"), sender())
            .header("X-Campaign", "a")
            .unwrap()
            .header("X-Campaign", "b")
            .unwrap();
        let text = compiled_text(&message);
        assert_eq!(text.matches("X-Campaign:").count(), 1);
        assert!(text.contains("X-Campaign: b"));
    }

    #[test]
    fn ascii_body_is_seven_bit() {
        let message = Message::new("hello", Body::plain("plain ascii"), sender());
        let text = compiled_text(&message);
        assert!(text.contains("Content-Type: text/plain; charset=us-ascii"));
        assert!(text.contains("Content-Transfer-Encoding: 7Bit"));
    }

    #[test]
    fn non_ascii_body_is_eight_bit() {
        let message = Message::new("hello", Body::html("<p>héhé</p>"), sender());
        let text = compiled_text(&message);
        assert!(text.contains("Content-Type: text/html; charset=utf-8"));
        assert!(text.contains("Content-Transfer-Encoding: 8Bit"));
    }

    #[test]
    fn outer_boundary_opened_and_closed_exactly_once() {
        let message = Message::new(
            "hello",
            Body::alternative("<p>hi</p>", "hi"),
            sender(),
        );
        let compiled = message.compile().unwrap();
        let text = String::from_utf8(compiled.body().to_vec()).unwrap();

        let content_type_line = text
            .lines()
            .find(|l| l.starts_with("Content-Type: multipart/mixed; boundary="))
            .expect("outer content type present");
        let boundary = content_type_line
            .split('"')
            .nth(1)
            .expect("quoted boundary");

        let opens = text
            .lines()
            .filter(|l| *l == format!("--{boundary}"))
            .count();
        let closes = text
            .lines()
            .filter(|l| *l == format!("--{boundary}--"))
            .count();
        assert_eq!(opens, 1);
        assert_eq!(closes, 1);
    }

    #[test]
    fn alternative_carries_both_parts_plain_first() {
        let message = Message::new(
            "hello",
            Body::alternative("<p>hi</p>", "hi"),
            sender(),
        );
        let text = compiled_text(&message);
        let plain = text.find("Content-Type: text/plain").unwrap();
        let html = text.find("Content-Type: text/html").unwrap();
        assert!(plain < html);
    }

    #[test]
    fn boundaries_differ_between_compiles() {
        let message = Message::new("hello", Body::plain("hi"), sender());
        let first = compiled_text(&message);
        let second = compiled_text(&message);

        let boundary = |text: &str| {
            text.lines()
                .find(|l| l.starts_with("Content-Type: multipart/mixed"))
                .and_then(|l| l.split('"').nth(1).map(str::to_owned))
                .unwrap()
        };
        assert_ne!(boundary(&first), boundary(&second));
    }

    #[test]
    fn sender_with_name_in_from_header() {
        let named = Mailbox::new(
            "no-reply@example.com".parse().unwrap(),
            Some("No Reply".into()),
        );
        let message = Message::new("hello", Body::plain("hi"), named);
        assert!(compiled_text(&message).contains("From: No Reply <no-reply@example.com>"));
    }
}
