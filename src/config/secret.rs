//! Master secret configuration
//!
//! The master secret is supplied out-of-band through the `ENCRYPTION_SECRET`
//! environment variable. It is read once at startup and handed to the
//! envelope cipher; nothing deeper in the call graph reads the environment.

use std::fmt;

use crate::crypto::SecretString;
use crate::error::{VaultError, VaultResult};

/// Environment variable holding the master secret
pub const ENCRYPTION_SECRET_ENV: &str = "ENCRYPTION_SECRET";

/// Secrets shorter than this are accepted with a warning
pub const RECOMMENDED_MIN_LEN: usize = 16;

/// Process-wide secret every envelope key is derived from
#[derive(Clone)]
pub struct MasterSecret {
    value: SecretString,
}

impl MasterSecret {
    /// Wrap a configured secret value
    ///
    /// # Errors
    ///
    /// Returns `Config("encryption secret not set")` for an empty value.
    pub fn new(value: impl Into<String>) -> VaultResult<Self> {
        let value = SecretString::new(value);
        if value.as_str().trim().is_empty() {
            return Err(VaultError::secret_not_set());
        }

        if value.char_count() < RECOMMENDED_MIN_LEN {
            tracing::warn!(
                min_len = RECOMMENDED_MIN_LEN,
                "Encryption secret is shorter than recommended"
            );
        }

        Ok(Self { value })
    }

    /// Load the secret from `ENCRYPTION_SECRET`
    pub fn from_env() -> VaultResult<Self> {
        match std::env::var(ENCRYPTION_SECRET_ENV) {
            Ok(value) => Self::new(value),
            Err(_) => Err(VaultError::secret_not_set()),
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.value.as_str().as_bytes()
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret([REDACTED])")
    }
}
