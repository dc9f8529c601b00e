//! Provider service
//!
//! Business logic for the provider catalog. API keys are encrypted before a
//! record is written and only ever leave this service masked, except through
//! the explicit reveal path.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{require_admin, SessionSource};
use crate::crypto::{EnvelopeCipher, SecretString};
use crate::error::{VaultError, VaultResult};
use crate::models::{ListQuery, LlmModel, Page, Provider, ProviderId};
use crate::storage::{ProviderRepository, Storage};

use super::masking::MaskedView;
use super::secret::SecretService;

/// Input for creating a provider
#[derive(Debug, Clone, Default)]
pub struct NewProvider {
    pub name: String,
    pub display_name: String,
    pub logo_url: Option<String>,
    pub api_key: Option<SecretString>,
}

/// What to do with the stored API key on update
#[derive(Debug, Clone, Default)]
pub enum KeyChange {
    /// Leave the stored key as is
    #[default]
    Keep,
    /// Encrypt and store a new key
    Replace(SecretString),
    /// Remove the stored key
    Clear,
}

impl KeyChange {
    /// Build from update form fields; clearing wins over a supplied key
    pub fn from_fields(api_key: Option<SecretString>, clear: bool) -> Self {
        if clear {
            Self::Clear
        } else {
            match api_key {
                Some(key) if !key.is_empty() => Self::Replace(key),
                _ => Self::Keep,
            }
        }
    }
}

/// Input for updating a provider
#[derive(Debug, Clone, Default)]
pub struct ProviderUpdate {
    pub display_name: String,
    pub logo_url: Option<String>,
    pub api_key: KeyChange,
}

/// Provider as shown to operators, with a masked key and its models
#[derive(Debug, Clone, Serialize)]
pub struct ProviderView {
    pub id: ProviderId,
    pub name: String,
    pub display_name: String,
    pub logo_url: Option<String>,
    pub has_api_key: bool,
    pub masked_api_key: Option<String>,
    /// Models offered by the provider, newest first
    pub models: Vec<LlmModel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderView {
    fn build(provider: Provider, models: Vec<LlmModel>, cipher: &EnvelopeCipher) -> Self {
        let MaskedView { has_secret, masked } =
            MaskedView::for_envelope(cipher, provider.encrypted_api_key.as_deref());
        Self {
            id: provider.id,
            name: provider.name,
            display_name: provider.display_name,
            logo_url: provider.logo_url,
            has_api_key: has_secret,
            masked_api_key: masked,
            models,
            created_at: provider.created_at,
            updated_at: provider.updated_at,
        }
    }

    /// The model currently marked active, if any
    pub fn active_model(&self) -> Option<&LlmModel> {
        self.models.iter().find(|m| m.is_active)
    }
}

fn clean_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Service for provider management
pub struct ProviderService<'a> {
    storage: &'a Storage,
    session: &'a dyn SessionSource,
    cipher: &'a EnvelopeCipher,
}

impl<'a> ProviderService<'a> {
    /// Create a new provider service
    pub fn new(
        storage: &'a Storage,
        session: &'a dyn SessionSource,
        cipher: &'a EnvelopeCipher,
    ) -> Self {
        Self {
            storage,
            session,
            cipher,
        }
    }

    /// Credential operations backed by the provider repository
    pub fn secrets(&self) -> SecretService<'a, ProviderRepository> {
        SecretService::new(&self.storage.providers, self.session, self.cipher)
    }

    /// Create a new provider, encrypting its API key if one is given
    pub fn create(&self, input: NewProvider) -> VaultResult<Provider> {
        let actor = require_admin(self.session)?;

        let mut provider = Provider::new(&input.name, &input.display_name);
        provider.logo_url = clean_url(input.logo_url);
        provider
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        if self.storage.providers.get_by_name(&provider.name)?.is_some() {
            return Err(VaultError::Duplicate {
                entity_type: "Provider",
                identifier: provider.name,
            });
        }

        if let Some(key) = input.api_key.filter(|k| !k.is_empty()) {
            provider.set_envelope(Some(self.cipher.encrypt(key.as_str())?));
        }

        self.storage.providers.persist(provider.clone())?;

        tracing::info!(
            provider = %provider.id,
            name = %provider.name,
            actor = %actor.email,
            has_api_key = provider.has_api_key(),
            "Provider created"
        );

        Ok(provider)
    }

    /// Update display fields and optionally rotate or clear the API key
    pub fn update(&self, id: ProviderId, input: ProviderUpdate) -> VaultResult<Provider> {
        let actor = require_admin(self.session)?;

        let mut provider = self
            .storage
            .providers
            .get(id)?
            .ok_or_else(|| VaultError::provider_not_found(id.to_string()))?;

        provider.display_name = input.display_name.trim().to_string();
        provider.logo_url = clean_url(input.logo_url);
        provider
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        match input.api_key {
            KeyChange::Keep => provider.updated_at = Utc::now(),
            KeyChange::Replace(key) => {
                provider.set_envelope(Some(self.cipher.encrypt(key.as_str())?))
            }
            KeyChange::Clear => provider.set_envelope(None),
        }

        self.storage.providers.persist(provider.clone())?;

        tracing::info!(provider = %provider.id, actor = %actor.email, "Provider updated");

        Ok(provider)
    }

    /// Delete a provider together with its stored key and its models
    pub fn delete(&self, id: ProviderId) -> VaultResult<Provider> {
        let actor = require_admin(self.session)?;

        let provider = self
            .storage
            .providers
            .get(id)?
            .ok_or_else(|| VaultError::provider_not_found(id.to_string()))?;

        // models first, so a failed write never leaves models without a provider
        let models = self.storage.models.remove_for_provider(id)?;
        self.storage.providers.remove(id)?;

        tracing::info!(
            provider = %id,
            name = %provider.name,
            models,
            actor = %actor.email,
            "Provider deleted"
        );

        Ok(provider)
    }

    /// Find a provider by name or ID
    pub fn find(&self, identifier: &str) -> VaultResult<Option<Provider>> {
        require_admin(self.session)?;

        if let Some(provider) = self.storage.providers.get_by_name(identifier)? {
            return Ok(Some(provider));
        }

        if let Ok(id) = identifier.parse::<ProviderId>() {
            return self.storage.providers.get(id);
        }

        Ok(None)
    }

    /// Resolve a provider by name or ID, failing when absent
    pub fn resolve(&self, identifier: &str) -> VaultResult<Provider> {
        self.find(identifier)?
            .ok_or_else(|| VaultError::provider_not_found(identifier))
    }

    /// Masked view of one provider
    pub fn view(&self, id: ProviderId) -> VaultResult<ProviderView> {
        require_admin(self.session)?;

        let provider = self
            .storage
            .providers
            .get(id)?
            .ok_or_else(|| VaultError::provider_not_found(id.to_string()))?;

        let models = self.storage.models.get_for_provider(id)?;
        Ok(ProviderView::build(provider, models, self.cipher))
    }

    /// One page of providers, newest first, with masked keys
    pub fn list(&self, query: &ListQuery) -> VaultResult<Page<ProviderView>> {
        require_admin(self.session)?;

        let providers: Vec<Provider> = match query.search_term() {
            Some(term) => self
                .storage
                .providers
                .get_all()?
                .into_iter()
                .filter(|p| p.matches_search(term))
                .collect(),
            None => self.storage.providers.get_all()?,
        };

        query.paginate(providers).try_map(|provider| {
            let models = self.storage.models.get_for_provider(provider.id)?;
            Ok(ProviderView::build(provider, models, self.cipher))
        })
    }

    /// Store or rotate a provider's API key
    pub fn set_api_key(&self, id: ProviderId, api_key: &SecretString) -> VaultResult<()> {
        self.secrets().store_secret(id, api_key.as_str())
    }

    /// Remove a provider's API key
    pub fn clear_api_key(&self, id: ProviderId) -> VaultResult<()> {
        self.secrets().clear_secret(id)
    }

    /// Decrypt a provider's API key
    pub fn reveal_api_key(&self, id: ProviderId) -> VaultResult<SecretString> {
        self.secrets().reveal_secret(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionActor, StaticSession};
    use crate::config::paths::VaultPaths;
    use crate::crypto::cipher::test_cipher;
    use crate::services::masking::PLACEHOLDER_MASK;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn admin() -> StaticSession {
        StaticSession::new(SessionActor::new("1", "ada@example.com", Some("super_admin")))
    }

    fn new_provider(name: &str, key: Option<&str>) -> NewProvider {
        NewProvider {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            logo_url: None,
            api_key: key.map(SecretString::from),
        }
    }

    #[test]
    fn test_create_with_key() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let provider = service
            .create(new_provider(" OpenAI ", Some("sk-test-ABCDEFGH")))
            .unwrap();

        assert_eq!(provider.name, "openai");
        assert!(provider.has_api_key());
        let envelope = provider.encrypted_api_key.as_deref().unwrap();
        assert!(!envelope.contains("sk-test"));
        assert_eq!(
            service.reveal_api_key(provider.id).unwrap().as_str(),
            "sk-test-ABCDEFGH"
        );
    }

    #[test]
    fn test_create_without_key() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = EnvelopeCipher::unconfigured();
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let provider = service.create(new_provider("openai", None)).unwrap();
        assert!(!provider.has_api_key());

        let view = service.view(provider.id).unwrap();
        assert!(!view.has_api_key);
        assert!(view.masked_api_key.is_none());
    }

    #[test]
    fn test_create_requires_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let mut input = new_provider("openai", None);
        input.display_name = "  ".into();
        assert!(service.create(input).unwrap_err().is_validation());
        assert!(service.create(new_provider("", None)).unwrap_err().is_validation());
    }

    #[test]
    fn test_duplicate_name() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        service.create(new_provider("openai", None)).unwrap();
        let result = service.create(new_provider("OPENAI", None));
        assert!(matches!(result, Err(VaultError::Duplicate { .. })));
    }

    #[test]
    fn test_update_key_changes() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let provider = service
            .create(new_provider("openai", Some("sk-old-key-12345")))
            .unwrap();

        let kept = service
            .update(
                provider.id,
                ProviderUpdate {
                    display_name: "OpenAI".into(),
                    logo_url: Some("  ".into()),
                    api_key: KeyChange::Keep,
                },
            )
            .unwrap();
        assert_eq!(kept.encrypted_api_key, provider.encrypted_api_key);
        assert!(kept.logo_url.is_none());

        service
            .update(
                provider.id,
                ProviderUpdate {
                    display_name: "OpenAI".into(),
                    logo_url: None,
                    api_key: KeyChange::Replace("sk-new-key-67890".into()),
                },
            )
            .unwrap();
        assert_eq!(
            service.reveal_api_key(provider.id).unwrap().as_str(),
            "sk-new-key-67890"
        );

        let cleared = service
            .update(
                provider.id,
                ProviderUpdate {
                    display_name: "OpenAI".into(),
                    logo_url: None,
                    api_key: KeyChange::from_fields(Some("ignored".into()), true),
                },
            )
            .unwrap();
        assert!(!cleared.has_api_key());
    }

    #[test]
    fn test_update_missing_provider() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let result = service.update(
            ProviderId::new(),
            ProviderUpdate {
                display_name: "X".into(),
                ..ProviderUpdate::default()
            },
        );
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_removes_key() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let provider = service
            .create(new_provider("openai", Some("sk-test-ABCDEFGH")))
            .unwrap();
        service.delete(provider.id).unwrap();

        assert!(service.reveal_api_key(provider.id).unwrap_err().is_not_found());
        assert_eq!(storage.providers.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_removes_models() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let openai = service.create(new_provider("openai", None)).unwrap();
        let google = service.create(new_provider("google", None)).unwrap();
        storage
            .models
            .persist_all(vec![
                LlmModel::new(openai.id, "gpt-4o", "GPT-4o"),
                LlmModel::new(openai.id, "gpt-4", "GPT-4"),
                LlmModel::new(google.id, "gemini", "Gemini"),
            ])
            .unwrap();

        service.delete(openai.id).unwrap();

        assert!(storage.models.get_for_provider(openai.id).unwrap().is_empty());
        assert_eq!(storage.models.count().unwrap(), 1);
    }

    #[test]
    fn test_view_includes_models() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let openai = service.create(new_provider("openai", None)).unwrap();
        let mut active = LlmModel::new(openai.id, "gpt-4o", "GPT-4o");
        active.is_active = true;
        storage
            .models
            .persist_all(vec![active, LlmModel::new(openai.id, "gpt-4", "GPT-4")])
            .unwrap();

        let view = service.view(openai.id).unwrap();
        assert_eq!(view.models.len(), 2);
        assert_eq!(view.active_model().unwrap().model_id, "gpt-4o");

        let page = service.list(&ListQuery::page(1)).unwrap();
        assert_eq!(page.items[0].models.len(), 2);
    }

    #[test]
    fn test_list_masks_and_degrades() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let good = service
            .create(new_provider("openai", Some("sk-test-ABCDEFGH")))
            .unwrap();
        let bad = service.create(new_provider("google", None)).unwrap();
        let mut corrupted = storage.providers.get(bad.id).unwrap().unwrap();
        corrupted.encrypted_api_key = Some("corrupted".into());
        storage.providers.upsert(corrupted).unwrap();
        service.create(new_provider("mistral", None)).unwrap();

        let page = service.list(&ListQuery::page(1)).unwrap();
        assert_eq!(page.total, 3);

        let find = |id: ProviderId| page.items.iter().find(|v| v.id == id).unwrap();
        assert_eq!(find(good.id).masked_api_key.as_deref(), Some("sk-t********EFGH"));
        assert!(find(bad.id).has_api_key);
        assert_eq!(find(bad.id).masked_api_key.as_deref(), Some(PLACEHOLDER_MASK));
    }

    #[test]
    fn test_list_search_and_paging() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        for i in 0..12 {
            service
                .create(new_provider(&format!("provider-{:02}", i), None))
                .unwrap();
        }
        service.create(new_provider("openai", None)).unwrap();

        let first = service.list(&ListQuery::page(1)).unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 2);

        let search = service
            .list(&ListQuery::page(1).with_search("OPEN"))
            .unwrap();
        assert_eq!(search.total, 1);
        assert_eq!(search.items[0].name, "openai");
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let session = admin();
        let service = ProviderService::new(&storage, &session, &cipher);

        let provider = service.create(new_provider("openai", None)).unwrap();
        assert!(service.find("OpenAI").unwrap().is_some());
        assert!(service
            .find(&provider.id.as_uuid().to_string())
            .unwrap()
            .is_some());
        assert!(service.resolve("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unauthorized_cannot_touch_catalog() {
        let (_temp_dir, storage) = create_test_storage();
        let cipher = test_cipher("master-secret-for-tests");
        let admin = admin();
        let provider = ProviderService::new(&storage, &admin, &cipher)
            .create(new_provider("openai", Some("sk-test-ABCDEFGH")))
            .unwrap();

        let anonymous = StaticSession::anonymous();
        let service = ProviderService::new(&storage, &anonymous, &cipher);

        assert!(service.create(new_provider("google", None)).unwrap_err().is_unauthorized());
        assert!(service.list(&ListQuery::page(1)).unwrap_err().is_unauthorized());
        assert!(service.delete(provider.id).unwrap_err().is_unauthorized());
        assert!(service.reveal_api_key(provider.id).unwrap_err().is_unauthorized());
        assert!(service.clear_api_key(provider.id).unwrap_err().is_unauthorized());
        assert_eq!(storage.providers.count().unwrap(), 1);
        assert!(storage.providers.get(provider.id).unwrap().unwrap().has_api_key());
    }
}
