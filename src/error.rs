//! Custom error types for provider-vault
//!
//! This module defines the error hierarchy for the vault using thiserror.
//! Cipher-level variants (`MalformedEnvelope`, `AuthenticationFailed`) are
//! internal: the service layer converts them to `RevealFailed` before they
//! reach a caller.

use thiserror::Error;

/// Message returned to callers when a stored credential cannot be opened
pub const REVEAL_FAILED_MESSAGE: &str = "Failed to reveal API key";

/// The main error type for provider-vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Configuration-related errors (including a missing master secret)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The acting session is not allowed to perform the operation
    #[error("Unauthorized")]
    Unauthorized,

    /// The provider exists but has no stored credential
    #[error("No API key configured")]
    NoSecretConfigured,

    /// A stored credential could not be revealed
    #[error("{}", REVEAL_FAILED_MESSAGE)]
    RevealFailed,

    /// Encryption failed before producing an envelope
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Stored envelope does not have the expected shape
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Authentication tag did not verify
    #[error("Decryption failed: invalid key or corrupted data")]
    AuthenticationFailed,

    /// A business rule refused the operation
    #[error("{0}")]
    Forbidden(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VaultError {
    /// Create a "not found" error for providers
    pub fn provider_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Provider",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for LLM models
    pub fn model_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Model",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for admin users
    pub fn admin_user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Admin user",
            identifier: identifier.into(),
        }
    }

    /// Error raised when no master secret was configured
    pub fn secret_not_set() -> Self {
        Self::Config("encryption secret not set".into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an access-gate denial
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this error came out of the envelope cipher
    pub fn is_cipher_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedEnvelope(_) | Self::AuthenticationFailed | Self::Encryption(_)
        )
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for provider-vault operations
pub type VaultResult<T> = Result<T, VaultError>;
