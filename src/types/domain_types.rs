// src/types/domain_types.rs
use super::ValidationError;
use std::fmt;

/// A validated Notion integration token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        write!(f, "{}...", &self.0[..10])
    }
}

// Never leak the token through `{:?}` in logs either.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_validation() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("sk_live_0123456789abcdef").is_err());
        assert!(ApiKey::new("ntn_short").is_err());
        assert!(ApiKey::new("ntn_0123456789abcdefghij").is_ok());
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("secret_0123456789abcdefghij").unwrap();
        assert_eq!(key.to_string(), "secret_012...");
        assert!(!format!("{:?}", key).contains("abcdef"));
    }
}
