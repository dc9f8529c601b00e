//! Core data models for provider-vault

pub mod admin_user;
pub mod ids;
pub mod llm_model;
pub mod page;
pub mod provider;

pub use admin_user::AdminUser;
pub use ids::{AdminUserId, ModelId, ProviderId};
pub use llm_model::{CostPer1k, LlmModel};
pub use page::{ListQuery, Page};
pub use provider::Provider;
