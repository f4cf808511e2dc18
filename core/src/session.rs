//! Bearer credential handed to us by whatever owns authentication.

use std::fmt;

/// Opaque, non-empty bearer token.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty token: an empty credential means "no
    /// session" and must not trigger any request.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the `authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_no_credential() {
        assert!(Credential::new("").is_none());
    }

    #[test]
    fn authorization_uses_bearer_scheme() {
        let credential = Credential::new("T").unwrap();
        assert_eq!(credential.authorization(), "Bearer T");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
    }
}
