//! LLM model service
//!
//! Business logic for the models offered by each provider. A provider has
//! at most one active model; activating one deactivates the others.

use chrono::Utc;

use crate::auth::{require_admin, SessionSource};
use crate::error::{VaultError, VaultResult};
use crate::models::{CostPer1k, LlmModel, ModelId, Provider, ProviderId};
use crate::storage::Storage;

/// Input for creating a model
#[derive(Debug, Clone, Default)]
pub struct NewModel {
    pub provider_id: ProviderId,
    pub model_id: String,
    pub display_name: String,
    /// Decimal price per 1000 input tokens; blank means none
    pub input_cost: Option<String>,
    /// Decimal price per 1000 output tokens; blank means none
    pub output_cost: Option<String>,
}

/// Input for editing a model
///
/// Costs are replaced as given, so `None` or a blank string clears them.
#[derive(Debug, Clone, Default)]
pub struct ModelUpdate {
    pub display_name: String,
    pub input_cost: Option<String>,
    pub output_cost: Option<String>,
}

fn parse_cost(input: Option<&str>) -> VaultResult<Option<CostPer1k>> {
    CostPer1k::parse_optional(input).map_err(|e| VaultError::Validation(e.to_string()))
}

/// Service for LLM model management
pub struct ModelService<'a> {
    storage: &'a Storage,
    session: &'a dyn SessionSource,
}

impl<'a> ModelService<'a> {
    /// Create a new model service
    pub fn new(storage: &'a Storage, session: &'a dyn SessionSource) -> Self {
        Self { storage, session }
    }

    /// Add a model to a provider; new models start inactive
    pub fn create(&self, input: NewModel) -> VaultResult<LlmModel> {
        let actor = require_admin(self.session)?;

        let provider = self
            .storage
            .providers
            .get(input.provider_id)?
            .ok_or_else(|| VaultError::provider_not_found(input.provider_id.to_string()))?;

        let mut model = LlmModel::new(provider.id, &input.model_id, &input.display_name);
        model
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;
        model.input_cost_per_1k = parse_cost(input.input_cost.as_deref())?;
        model.output_cost_per_1k = parse_cost(input.output_cost.as_deref())?;

        if self
            .storage
            .models
            .get_by_model_id(provider.id, &model.model_id)?
            .is_some()
        {
            return Err(VaultError::Duplicate {
                entity_type: "Model",
                identifier: format!("{} for provider {}", model.model_id, provider.name),
            });
        }

        self.storage.models.persist(model.clone())?;

        tracing::info!(
            model = %model.id,
            model_id = %model.model_id,
            provider = %provider.id,
            actor = %actor.email,
            "Model created"
        );

        Ok(model)
    }

    /// Update display name and costs
    pub fn update(&self, id: ModelId, input: ModelUpdate) -> VaultResult<LlmModel> {
        let actor = require_admin(self.session)?;

        let mut model = self.get(id)?;
        model.display_name = input.display_name.trim().to_string();
        model
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;
        model.input_cost_per_1k = parse_cost(input.input_cost.as_deref())?;
        model.output_cost_per_1k = parse_cost(input.output_cost.as_deref())?;
        model.updated_at = Utc::now();

        self.storage.models.persist(model.clone())?;

        tracing::info!(model = %model.id, actor = %actor.email, "Model updated");
        Ok(model)
    }

    /// Delete a model
    pub fn delete(&self, id: ModelId) -> VaultResult<LlmModel> {
        let actor = require_admin(self.session)?;

        let model = self
            .storage
            .models
            .remove(id)?
            .ok_or_else(|| VaultError::model_not_found(id.to_string()))?;

        tracing::info!(model = %id, model_id = %model.model_id, actor = %actor.email, "Model deleted");
        Ok(model)
    }

    /// Flip a model's active flag
    ///
    /// Activating a model deactivates every other model of the same provider
    /// in the same write.
    pub fn toggle_active(&self, id: ModelId) -> VaultResult<LlmModel> {
        let actor = require_admin(self.session)?;

        let mut model = self.get(id)?;
        let now = Utc::now();
        let mut changed = Vec::new();

        if !model.is_active {
            for mut sibling in self.storage.models.get_for_provider(model.provider_id)? {
                if sibling.id != model.id && sibling.is_active {
                    sibling.is_active = false;
                    sibling.updated_at = now;
                    changed.push(sibling);
                }
            }
        }

        model.is_active = !model.is_active;
        model.updated_at = now;
        changed.push(model.clone());

        self.storage.models.persist_all(changed)?;

        tracing::info!(
            model = %model.id,
            provider = %model.provider_id,
            active = model.is_active,
            actor = %actor.email,
            "Model active flag toggled"
        );
        Ok(model)
    }

    /// Models offered by a provider, newest first
    pub fn list_for_provider(&self, provider_id: ProviderId) -> VaultResult<Vec<LlmModel>> {
        require_admin(self.session)?;

        if self.storage.providers.get(provider_id)?.is_none() {
            return Err(VaultError::provider_not_found(provider_id.to_string()));
        }

        self.storage.models.get_for_provider(provider_id)
    }

    /// Find a provider's model by its model ID or record ID
    pub fn find(&self, provider_id: ProviderId, identifier: &str) -> VaultResult<Option<LlmModel>> {
        require_admin(self.session)?;

        if let Some(model) = self.storage.models.get_by_model_id(provider_id, identifier)? {
            return Ok(Some(model));
        }

        if let Ok(id) = identifier.parse::<ModelId>() {
            return Ok(self
                .storage
                .models
                .get(id)?
                .filter(|m| m.provider_id == provider_id));
        }

        Ok(None)
    }

    /// Resolve a provider's model, failing when absent
    pub fn resolve(&self, provider_id: ProviderId, identifier: &str) -> VaultResult<LlmModel> {
        self.find(provider_id, identifier)?
            .ok_or_else(|| VaultError::model_not_found(identifier))
    }

    /// Resolve the owning provider by name or ID
    pub fn resolve_provider(&self, identifier: &str) -> VaultResult<Provider> {
        require_admin(self.session)?;

        if let Some(provider) = self.storage.providers.get_by_name(identifier)? {
            return Ok(provider);
        }

        identifier
            .parse::<ProviderId>()
            .ok()
            .map(|id| self.storage.providers.get(id))
            .transpose()?
            .flatten()
            .ok_or_else(|| VaultError::provider_not_found(identifier))
    }

    fn get(&self, id: ModelId) -> VaultResult<LlmModel> {
        self.storage
            .models
            .get(id)?
            .ok_or_else(|| VaultError::model_not_found(id.to_string()))
    }
}
