//! SMTP authentication

use base64::{engine::general_purpose::STANDARD, Engine};

/// Contains user credentials
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new set of credentials
    pub fn new<S: Into<String>, T: Into<String>>(username: S, password: T) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    /// Base64-encoded username, the first LOGIN exchange step
    pub(crate) fn encoded_username(&self) -> String {
        STANDARD.encode(&self.username)
    }

    /// Base64-encoded password, the second LOGIN exchange step
    pub(crate) fn encoded_password(&self) -> String {
        STANDARD.encode(&self.password)
    }

    /// The PLAIN initial response, `base64("\0user\0password")`
    pub(crate) fn plain_token(&self) -> String {
        STANDARD.encode(format!("\u{0}{}\u{0}{}", self.username, self.password))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn login_steps_are_plain_base64() {
        let credentials = Credentials::new("user", "password");
        assert_eq!(credentials.encoded_username(), "dXNlcg==");
        assert_eq!(credentials.encoded_password(), "cGFzc3dvcmQ=");
    }

    #[test]
    fn plain_token_packs_both_fields() {
        let credentials = Credentials::new("user", "password");
        assert_eq!(credentials.plain_token(), "AHVzZXIAcGFzc3dvcmQ=");
    }
}
