//! LLM provider model
//!
//! A provider record holds at most one credential envelope. The plaintext
//! API key never appears on this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ProviderId;

/// Maximum length of a provider name
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a provider display name
pub const MAX_DISPLAY_NAME_LEN: usize = 255;

/// An LLM provider (e.g. "openai")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier
    pub id: ProviderId,

    /// Machine name, lower-cased and unique
    pub name: String,

    /// Human-readable name
    pub display_name: String,

    /// Optional logo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// Serialized credential envelope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_api_key: Option<String>,

    /// When the provider was created
    pub created_at: DateTime<Utc>,

    /// When the provider was last modified
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Create a new provider without a credential
    pub fn new(name: &str, display_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ProviderId::new(),
            name: Self::normalize_name(name),
            display_name: display_name.trim().to_string(),
            logo_url: None,
            encrypted_api_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a credential envelope is stored
    pub fn has_api_key(&self) -> bool {
        self.encrypted_api_key
            .as_deref()
            .is_some_and(|envelope| !envelope.is_empty())
    }

    /// Replace or clear the stored envelope
    pub fn set_envelope(&mut self, envelope: Option<String>) {
        self.encrypted_api_key = envelope.filter(|e| !e.is_empty());
        self.updated_at = Utc::now();
    }

    /// Normalize a provider name for storage and matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Case-insensitive substring match on name or display name
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.display_name.to_lowercase().contains(&query)
    }

    /// Validate the provider
    pub fn validate(&self) -> Result<(), ProviderValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProviderValidationError::EmptyName);
        }

        if self.name.len() > MAX_NAME_LEN {
            return Err(ProviderValidationError::NameTooLong(self.name.len()));
        }

        if self.display_name.trim().is_empty() {
            return Err(ProviderValidationError::EmptyDisplayName);
        }

        if self.display_name.len() > MAX_DISPLAY_NAME_LEN {
            return Err(ProviderValidationError::DisplayNameTooLong(
                self.display_name.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.name)
    }
}

/// Validation errors for providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyDisplayName,
    DisplayNameTooLong(usize),
}

impl fmt::Display for ProviderValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::NameTooLong(len) => {
                write!(f, "Name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::EmptyDisplayName => write!(f, "Display name is required"),
            Self::DisplayNameTooLong(len) => write!(
                f,
                "Display name too long ({} chars, max {})",
                len, MAX_DISPLAY_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for ProviderValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_provider_normalizes_name() {
        let provider = Provider::new("  OpenAI ", " OpenAI ");
        assert_eq!(provider.name, "openai");
        assert_eq!(provider.display_name, "OpenAI");
        assert!(!provider.has_api_key());
    }

    #[test]
    fn test_set_envelope() {
        let mut provider = Provider::new("openai", "OpenAI");
        provider.set_envelope(Some("a:b:c:d".into()));
        assert!(provider.has_api_key());

        provider.set_envelope(Some(String::new()));
        assert!(!provider.has_api_key());
        assert!(provider.encrypted_api_key.is_none());
    }

    #[test]
    fn test_matches_search() {
        let provider = Provider::new("google", "Google AI");
        assert!(provider.matches_search("GOO"));
        assert!(provider.matches_search("ai"));
        assert!(provider.matches_search(""));
        assert!(!provider.matches_search("anthropic"));
    }

    #[test]
    fn test_validation() {
        let provider = Provider::new("openai", "OpenAI");
        assert!(provider.validate().is_ok());

        let empty = Provider::new("   ", "OpenAI");
        assert_eq!(empty.validate(), Err(ProviderValidationError::EmptyName));

        let no_display = Provider::new("openai", "");
        assert_eq!(
            no_display.validate(),
            Err(ProviderValidationError::EmptyDisplayName)
        );

        let long = Provider::new(&"a".repeat(101), "Long");
        assert!(matches!(
            long.validate(),
            Err(ProviderValidationError::NameTooLong(101))
        ));
    }

    #[test]
    fn test_serialization_skips_missing_envelope() {
        let provider = Provider::new("openai", "OpenAI");
        let json = serde_json::to_string(&provider).unwrap();
        assert!(!json.contains("encrypted_api_key"));
    }
}
