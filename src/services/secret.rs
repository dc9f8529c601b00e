//! Secret service
//!
//! Store, clear, reveal and mask provider API keys. Every operation passes
//! the access gate before it touches the credential store or the cipher,
//! and cipher failures are collapsed into one generic reveal error.

use crate::auth::{require_admin, SessionSource};
use crate::crypto::{EnvelopeCipher, SecretString};
use crate::error::{VaultError, VaultResult};
use crate::models::ProviderId;
use crate::storage::CredentialStore;

use super::masking::MaskedView;

/// Service for provider credentials
pub struct SecretService<'a, C: CredentialStore + ?Sized> {
    store: &'a C,
    session: &'a dyn SessionSource,
    cipher: &'a EnvelopeCipher,
}

impl<'a, C: CredentialStore + ?Sized> SecretService<'a, C> {
    /// Create a new secret service
    pub fn new(store: &'a C, session: &'a dyn SessionSource, cipher: &'a EnvelopeCipher) -> Self {
        Self {
            store,
            session,
            cipher,
        }
    }

    /// Encrypt and store an API key, replacing any existing one
    pub fn store_secret(&self, provider_id: ProviderId, plaintext: &str) -> VaultResult<()> {
        let actor = require_admin(self.session)?;

        if plaintext.trim().is_empty() {
            return Err(VaultError::Validation("API key cannot be empty".into()));
        }

        let envelope = self.cipher.encrypt(plaintext)?;
        self.store.set_credential_envelope(provider_id, Some(envelope))?;

        tracing::info!(provider = %provider_id, actor = %actor.email, "API key stored");
        Ok(())
    }

    /// Remove the stored API key
    pub fn clear_secret(&self, provider_id: ProviderId) -> VaultResult<()> {
        let actor = require_admin(self.session)?;

        self.store.set_credential_envelope(provider_id, None)?;

        tracing::info!(provider = %provider_id, actor = %actor.email, "API key cleared");
        Ok(())
    }

    /// Decrypt the stored API key
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when the session fails the gate
    /// - `NotFound` when the provider does not exist
    /// - `NoSecretConfigured` when it has no key
    /// - `RevealFailed` when the envelope does not open
    /// - `Config` when no master secret is configured
    pub fn reveal_secret(&self, provider_id: ProviderId) -> VaultResult<SecretString> {
        let actor = require_admin(self.session)?;

        let envelope = self
            .store
            .credential_envelope(provider_id)?
            .ok_or_else(|| VaultError::provider_not_found(provider_id.to_string()))?
            .filter(|e| !e.is_empty())
            .ok_or(VaultError::NoSecretConfigured)?;

        match self.cipher.decrypt(&envelope) {
            Ok(secret) => {
                tracing::debug!(provider = %provider_id, actor = %actor.email, "API key revealed");
                Ok(secret)
            }
            Err(err) if err.is_cipher_failure() => {
                tracing::error!(provider = %provider_id, "Failed to reveal API key");
                Err(VaultError::RevealFailed)
            }
            Err(err) => Err(err),
        }
    }

    /// Masked display form of the stored API key
    ///
    /// Decryption failures degrade to the placeholder mask.
    pub fn masked_view(&self, provider_id: ProviderId) -> VaultResult<MaskedView> {
        require_admin(self.session)?;

        let envelope = self
            .store
            .credential_envelope(provider_id)?
            .ok_or_else(|| VaultError::provider_not_found(provider_id.to_string()))?;

        Ok(MaskedView::for_envelope(self.cipher, envelope.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionActor, StaticSession};
    use crate::crypto::cipher::test_cipher;
    use crate::services::masking::PLACEHOLDER_MASK;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// In-memory store that counts every call
    #[derive(Default)]
    struct RecordingStore {
        envelopes: RefCell<HashMap<ProviderId, Option<String>>>,
        reads: Cell<usize>,
        writes: Cell<usize>,
    }

    impl RecordingStore {
        fn with_provider(id: ProviderId) -> Self {
            let store = Self::default();
            store.envelopes.borrow_mut().insert(id, None);
            store
        }

        fn calls(&self) -> usize {
            self.reads.get() + self.writes.get()
        }

        fn raw(&self, id: ProviderId) -> Option<String> {
            self.envelopes.borrow().get(&id).cloned().flatten()
        }
    }

    impl CredentialStore for RecordingStore {
        fn credential_envelope(&self, id: ProviderId) -> VaultResult<Option<Option<String>>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.envelopes.borrow().get(&id).cloned())
        }

        fn set_credential_envelope(
            &self,
            id: ProviderId,
            envelope: Option<String>,
        ) -> VaultResult<()> {
            self.writes.set(self.writes.get() + 1);
            let mut envelopes = self.envelopes.borrow_mut();
            let slot = envelopes
                .get_mut(&id)
                .ok_or_else(|| VaultError::provider_not_found(id.to_string()))?;
            *slot = envelope;
            Ok(())
        }
    }

    fn admin() -> StaticSession {
        StaticSession::new(SessionActor::new("1", "ada@example.com", Some("super_admin")))
    }

    fn viewer() -> StaticSession {
        StaticSession::new(SessionActor::new("2", "eve@example.com", Some("viewer")))
    }

    #[test]
    fn test_end_to_end() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        service.store_secret(id, "sk-test-ABCDEFGH").unwrap();

        let stored = store.raw(id).unwrap();
        assert_eq!(stored.split(':').count(), 4);
        assert!(!stored.contains("sk-test"));

        let view = service.masked_view(id).unwrap();
        assert!(view.has_secret);
        assert_eq!(view.masked.as_deref(), Some("sk-t********EFGH"));

        let revealed = service.reveal_secret(id).unwrap();
        assert_eq!(revealed.as_str(), "sk-test-ABCDEFGH");

        let viewer = viewer();
        let denied = SecretService::new(&store, &viewer, &cipher);
        let calls_before = store.calls();
        assert!(denied.reveal_secret(id).unwrap_err().is_unauthorized());
        assert_eq!(store.calls(), calls_before);
    }

    #[test]
    fn test_denied_actor_causes_no_persistence_calls() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = test_cipher("master-secret-for-tests");

        for session in [viewer(), StaticSession::anonymous()] {
            let service = SecretService::new(&store, &session, &cipher);
            assert!(service.store_secret(id, "sk-test").unwrap_err().is_unauthorized());
            assert!(service.clear_secret(id).unwrap_err().is_unauthorized());
            assert!(service.reveal_secret(id).unwrap_err().is_unauthorized());
            assert!(service.masked_view(id).unwrap_err().is_unauthorized());
        }

        assert_eq!(store.calls(), 0);
        assert!(store.raw(id).is_none());
    }

    #[test]
    fn test_rotation_replaces_envelope() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        service.store_secret(id, "sk-first-key-0001").unwrap();
        let first = store.raw(id).unwrap();
        service.store_secret(id, "sk-second-key-0002").unwrap();
        let second = store.raw(id).unwrap();

        assert_ne!(first, second);
        assert_eq!(service.reveal_secret(id).unwrap().as_str(), "sk-second-key-0002");
    }

    #[test]
    fn test_same_key_stored_twice_differs() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        service.store_secret(id, "sk-same").unwrap();
        let first = store.raw(id).unwrap();
        service.store_secret(id, "sk-same").unwrap();
        assert_ne!(first, store.raw(id).unwrap());
    }

    #[test]
    fn test_clear_then_reveal() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        service.store_secret(id, "sk-test-ABCDEFGH").unwrap();
        service.clear_secret(id).unwrap();

        assert!(matches!(
            service.reveal_secret(id),
            Err(VaultError::NoSecretConfigured)
        ));
        assert_eq!(service.masked_view(id).unwrap(), MaskedView::empty());
    }

    #[test]
    fn test_missing_provider() {
        let store = RecordingStore::default();
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);
        let id = ProviderId::new();

        assert!(service.reveal_secret(id).unwrap_err().is_not_found());
        assert!(service.clear_secret(id).unwrap_err().is_not_found());
        assert!(service.masked_view(id).unwrap_err().is_not_found());
        assert!(service.store_secret(id, "sk-test").unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_envelope_reveal_is_generic() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        store
            .envelopes
            .borrow_mut()
            .insert(id, Some("not:an:envelope".into()));
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        let err = service.reveal_secret(id).unwrap_err();
        assert!(matches!(err, VaultError::RevealFailed));
        assert_eq!(err.to_string(), "Failed to reveal API key");

        let view = service.masked_view(id).unwrap();
        assert_eq!(view.masked.as_deref(), Some(PLACEHOLDER_MASK));
    }

    #[test]
    fn test_wrong_master_secret_reveal_is_generic() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let admin = admin();

        let old = test_cipher("master-secret-old");
        SecretService::new(&store, &admin, &old)
            .store_secret(id, "sk-test-ABCDEFGH")
            .unwrap();

        let new = test_cipher("master-secret-new");
        let service = SecretService::new(&store, &admin, &new);
        assert!(matches!(
            service.reveal_secret(id),
            Err(VaultError::RevealFailed)
        ));
    }

    #[test]
    fn test_unconfigured_cipher() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = EnvelopeCipher::unconfigured();
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        let err = service.store_secret(id, "sk-test").unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn test_empty_key_rejected() {
        let id = ProviderId::new();
        let store = RecordingStore::with_provider(id);
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let service = SecretService::new(&store, &admin, &cipher);

        assert!(service.store_secret(id, "   ").unwrap_err().is_validation());
        assert_eq!(store.calls(), 0);
    }
}
