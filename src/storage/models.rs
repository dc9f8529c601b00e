//! LLM model repository for JSON storage
//!
//! Manages loading and saving models to models.json. Like the provider
//! repository, changes reach disk before they become visible in memory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VaultError;
use crate::models::{LlmModel, ModelId, ProviderId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable model data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ModelData {
    models: Vec<LlmModel>,
}

type ModelMap = HashMap<ModelId, LlmModel>;

/// Newest first, ties broken by model ID
fn sorted(models: impl Iterator<Item = LlmModel>) -> Vec<LlmModel> {
    let mut models: Vec<_> = models.collect();
    models.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.model_id.cmp(&b.model_id))
    });
    models
}

/// Repository for LLM model persistence
pub struct ModelRepository {
    path: PathBuf,
    data: RwLock<ModelMap>,
}

impl ModelRepository {
    /// Create a new model repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load models from disk
    pub fn load(&self) -> Result<(), VaultError> {
        let file_data: ModelData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = file_data
            .models
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        Ok(())
    }

    /// Save models to disk
    pub fn save(&self) -> Result<(), VaultError> {
        let models = self.get_all()?;
        write_json_atomic(&self.path, &ModelData { models })
    }

    /// Apply a change to a staged copy, write it, then swap it in
    fn commit<T>(&self, change: impl FnOnce(&mut ModelMap) -> T) -> Result<T, VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut staged = data.clone();
        let result = change(&mut staged);
        write_json_atomic(
            &self.path,
            &ModelData {
                models: sorted(staged.values().cloned()),
            },
        )?;

        *data = staged;
        Ok(result)
    }

    /// Get a model by ID
    pub fn get(&self, id: ModelId) -> Result<Option<LlmModel>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all models, newest first
    pub fn get_all(&self) -> Result<Vec<LlmModel>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(data.values().cloned()))
    }

    /// Models offered by one provider, newest first
    pub fn get_for_provider(&self, provider_id: ProviderId) -> Result<Vec<LlmModel>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(
            data.values()
                .filter(|m| m.provider_id == provider_id)
                .cloned(),
        ))
    }

    /// Look up a provider's model by its provider-side identifier
    pub fn get_by_model_id(
        &self,
        provider_id: ProviderId,
        model_id: &str,
    ) -> Result<Option<LlmModel>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let model_id = model_id.trim();
        Ok(data
            .values()
            .find(|m| m.provider_id == provider_id && m.model_id == model_id)
            .cloned())
    }

    /// Insert or update a model and write it to disk
    pub fn persist(&self, model: LlmModel) -> Result<(), VaultError> {
        self.persist_all(vec![model])
    }

    /// Insert or update several models in a single write
    pub fn persist_all(&self, models: Vec<LlmModel>) -> Result<(), VaultError> {
        self.commit(|data| {
            for model in models {
                data.insert(model.id, model);
            }
        })
    }

    /// Delete a model on disk and in memory, returning the removed record
    pub fn remove(&self, id: ModelId) -> Result<Option<LlmModel>, VaultError> {
        self.commit(|data| data.remove(&id))
    }

    /// Delete every model of a provider, returning how many were removed
    pub fn remove_for_provider(&self, provider_id: ProviderId) -> Result<usize, VaultError> {
        self.commit(|data| {
            let before = data.len();
            data.retain(|_, m| m.provider_id != provider_id);
            before - data.len()
        })
    }

    /// Count models
    pub fn count(&self) -> Result<usize, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
