//! Provider repository for JSON storage
//!
//! Manages loading and saving providers to providers.json and serves as the
//! credential store for the secret service. Changes are written to disk
//! before they become visible in memory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VaultError;
use crate::models::{Provider, ProviderId};

use super::credentials::CredentialStore;
use super::file_io::{read_json, write_json_atomic};

/// Serializable provider data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ProviderData {
    providers: Vec<Provider>,
}

type ProviderMap = HashMap<ProviderId, Provider>;

/// Newest first, ties broken by name
fn sorted(data: &ProviderMap) -> Vec<Provider> {
    let mut providers: Vec<_> = data.values().cloned().collect();
    providers.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    providers
}

/// Repository for provider persistence
pub struct ProviderRepository {
    path: PathBuf,
    data: RwLock<ProviderMap>,
}

impl ProviderRepository {
    /// Create a new provider repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load providers from disk
    pub fn load(&self) -> Result<(), VaultError> {
        let file_data: ProviderData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for provider in file_data.providers {
            data.insert(provider.id, provider);
        }

        Ok(())
    }

    /// Save providers to disk
    pub fn save(&self) -> Result<(), VaultError> {
        let providers = self.get_all()?;
        write_json_atomic(&self.path, &ProviderData { providers })
    }

    /// Apply a change to a staged copy, write it, then swap it in
    ///
    /// When the change or the write fails, memory keeps its previous state.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut ProviderMap) -> Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut staged = data.clone();
        let result = change(&mut staged)?;
        write_json_atomic(
            &self.path,
            &ProviderData {
                providers: sorted(&staged),
            },
        )?;

        *data = staged;
        Ok(result)
    }

    /// Get a provider by ID
    pub fn get(&self, id: ProviderId) -> Result<Option<Provider>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all providers, newest first
    pub fn get_all(&self) -> Result<Vec<Provider>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(&data))
    }

    /// Get a provider by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Provider>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let normalized = Provider::normalize_name(name);
        Ok(data.values().find(|p| p.name == normalized).cloned())
    }

    /// Insert or update a provider in memory only
    pub fn upsert(&self, provider: Provider) -> Result<(), VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(provider.id, provider);
        Ok(())
    }

    /// Insert or update a provider and write it to disk
    pub fn persist(&self, provider: Provider) -> Result<(), VaultError> {
        self.commit(|data| {
            data.insert(provider.id, provider);
            Ok(())
        })
    }

    /// Delete a provider on disk and in memory, returning the removed record
    pub fn remove(&self, id: ProviderId) -> Result<Option<Provider>, VaultError> {
        self.commit(|data| Ok(data.remove(&id)))
    }

    /// Count providers
    pub fn count(&self) -> Result<usize, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

impl CredentialStore for ProviderRepository {
    fn credential_envelope(&self, id: ProviderId) -> Result<Option<Option<String>>, VaultError> {
        Ok(self.get(id)?.map(|p| p.encrypted_api_key))
    }

    fn set_credential_envelope(
        &self,
        id: ProviderId,
        envelope: Option<String>,
    ) -> Result<(), VaultError> {
        self.commit(|data| {
            let provider = data
                .get_mut(&id)
                .ok_or_else(|| VaultError::provider_not_found(id.to_string()))?;
            provider.set_envelope(envelope);
            Ok(())
        })
    }
}
