//! Secret handling for credentials
//!
//! Tokens are wrapped so they never show up in `Debug` or `Display` output,
//! which keeps them out of logs and error messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A wrapper type for sensitive strings like API tokens
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the actual value (use with caution)
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    /// Check if the secret is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Get a partially redacted version for debugging
    pub fn partial_redact(&self) -> String {
        if self.value.is_empty() {
            return "[EMPTY]".to_string();
        }

        let chars: Vec<char> = self.value.chars().collect();
        let len = chars.len();
        if len <= 8 {
            "[REDACTED]".to_string()
        } else if self.value.starts_with("ghp_") || self.value.starts_with("gho_") {
            // GitHub tokens keep their type prefix
            let tail: String = chars[len - 4..].iter().collect();
            format!("{}...{}", &self.value[..4], tail)
        } else {
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[len - 2..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted_in_output() {
        let secret = SecretString::new("ghp_abcdefghijklmnop");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "ghp_abcdefghijklmnop");
    }

    #[test]
    fn test_partial_redact() {
        assert_eq!(SecretString::new("").partial_redact(), "[EMPTY]");
        assert_eq!(SecretString::new("short").partial_redact(), "[REDACTED]");
        assert_eq!(
            SecretString::new("ghp_abcdefghijklmnop").partial_redact(),
            "ghp_...mnop"
        );
        assert_eq!(
            SecretString::new("token-1234567890").partial_redact(),
            "to...90"
        );
    }

    #[test]
    fn test_serializes_transparently() {
        let secret = SecretString::new("value");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"value\"");
        let back: SecretString = serde_json::from_str("\"value\"").unwrap();
        assert_eq!(back, secret);
        assert!(SecretString::new("  ").is_blank());
    }
}
