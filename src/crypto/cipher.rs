//! Envelope cipher bound to the process master secret
//!
//! `EnvelopeCipher` is built once at startup and shared by reference. It
//! holds no derived keys and no plaintext between calls.

use crate::config::MasterSecret;
use crate::error::{VaultError, VaultResult};

use super::envelope::{open, seal, Envelope};
use super::key_derivation::KdfParams;
use super::secure_memory::SecretString;

/// Seals and opens serialized envelopes
#[derive(Debug, Clone)]
pub struct EnvelopeCipher {
    secret: Option<MasterSecret>,
    params: KdfParams,
}

impl EnvelopeCipher {
    /// Create a cipher for the given master secret
    pub fn new(secret: MasterSecret) -> Self {
        Self {
            secret: Some(secret),
            params: KdfParams::default(),
        }
    }

    /// Create a cipher with no master secret
    ///
    /// Every encrypt and decrypt call on it fails with a configuration error.
    pub fn unconfigured() -> Self {
        Self {
            secret: None,
            params: KdfParams::default(),
        }
    }

    /// Build a cipher from `ENCRYPTION_SECRET`, unconfigured if unset
    pub fn from_env() -> Self {
        match MasterSecret::from_env() {
            Ok(secret) => Self::new(secret),
            Err(err) => {
                tracing::warn!(error = %err, "Envelope cipher has no master secret");
                Self::unconfigured()
            }
        }
    }

    /// Override the key-derivation parameters
    pub fn with_params(mut self, params: KdfParams) -> Self {
        self.params = params;
        self
    }

    /// Whether a master secret is available
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Fail fast when no master secret is configured
    pub fn ensure_configured(&self) -> VaultResult<()> {
        self.master().map(|_| ())
    }

    fn master(&self) -> VaultResult<&MasterSecret> {
        self.secret.as_ref().ok_or_else(VaultError::secret_not_set)
    }

    /// Encrypt a plaintext secret into its serialized envelope
    pub fn encrypt(&self, plaintext: &str) -> VaultResult<String> {
        let secret = self.master()?;
        let envelope = seal(plaintext, secret.as_bytes(), &self.params)?;
        Ok(envelope.to_string())
    }

    /// Decrypt a serialized envelope
    pub fn decrypt(&self, serialized: &str) -> VaultResult<SecretString> {
        let secret = self.master()?;
        let envelope: Envelope = serialized.parse()?;
        open(&envelope, secret.as_bytes(), &self.params)
    }
}

#[cfg(test)]
pub(crate) fn test_cipher(secret: &str) -> EnvelopeCipher {
    EnvelopeCipher::new(MasterSecret::new(secret).unwrap())
        .with_params(KdfParams::with_values(1024, 1, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cipher = test_cipher("master-secret-for-tests");
        let envelope = cipher.encrypt("sk-test-ABCDEFGH").unwrap();
        assert_eq!(envelope.split(':').count(), 4);
        assert_eq!(cipher.decrypt(&envelope).unwrap().as_str(), "sk-test-ABCDEFGH");
    }

    #[test]
    fn test_non_deterministic() {
        let cipher = test_cipher("master-secret-for-tests");
        let a = cipher.encrypt("sk-test").unwrap();
        let b = cipher.encrypt("sk-test").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_master_secret() {
        let sealed_by = test_cipher("master-secret-one");
        let opened_by = test_cipher("master-secret-two");
        let envelope = sealed_by.encrypt("sk-test").unwrap();
        let result = opened_by.decrypt(&envelope);
        assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
    }

    #[test]
    fn test_unconfigured_fails_before_crypto() {
        let cipher = EnvelopeCipher::unconfigured();
        assert!(!cipher.is_configured());
        assert!(matches!(cipher.encrypt("sk-test"), Err(VaultError::Config(_))));
        // Even garbage input reports the configuration problem first
        assert!(matches!(cipher.decrypt("garbage"), Err(VaultError::Config(_))));
    }

    #[test]
    fn test_malformed_envelope() {
        let cipher = test_cipher("master-secret-for-tests");
        let result = cipher.decrypt("a:b:c");
        assert!(matches!(result, Err(VaultError::MalformedEnvelope(_))));
    }
}
