//! Sender identity

use std::fmt::{self, Display, Formatter};

use email_address::EmailAddress;

/// A sender address with an optional display name
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Mailbox {
    /// Validated email address
    pub email: EmailAddress,
    /// Display name, used in the `From` header when present
    pub name: Option<String>,
}

impl Mailbox {
    /// Creates a new `Mailbox`
    pub fn new(email: EmailAddress, name: Option<String>) -> Mailbox {
        Mailbox { email, name }
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "<{}>", self.email),
        }
    }
}

impl From<EmailAddress> for Mailbox {
    fn from(email: EmailAddress) -> Self {
        Mailbox { email, name: None }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mailbox_fmt() {
        let bare: Mailbox = "hei@example.org".parse::<EmailAddress>().unwrap().into();
        assert_eq!(bare.to_string(), "<hei@example.org>");

        let named = Mailbox::new(
            "hei@example.org".parse().unwrap(),
            Some("Hei Example".into()),
        );
        assert_eq!(named.to_string(), "Hei Example <hei@example.org>");
    }
}
