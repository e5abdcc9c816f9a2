use std::fmt;

use crate::domain::DomainError;

/// An opaque API token.
///
/// The token never appears in `Debug` output so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token, trimming surrounding whitespace. Blank tokens are rejected.
    pub fn new(token: impl Into<String>) -> Result<Self, DomainError> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_input("API key must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
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
    fn test_credential_trims_token() {
        let credential = Credential::new("  abc123\n").expect("valid token");
        assert_eq!(credential.expose(), "abc123");
    }

    #[test]
    fn test_blank_credential_rejected() {
        assert!(Credential::new("").is_err());
        assert!(Credential::new("   ").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("secret-key").expect("valid token");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("secret-key"));
    }
}
