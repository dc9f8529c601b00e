//! Service layer for provider-vault
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, the access gate, and the encryption of API keys.

pub mod admin_user;
pub mod masking;
pub mod model;
pub mod provider;
pub mod secret;

pub use admin_user::{AdminUserInput, AdminUserService};
pub use masking::{mask_secret, MaskResult, MaskedView, PLACEHOLDER_MASK};
pub use model::{ModelService, ModelUpdate, NewModel};
pub use provider::{KeyChange, NewProvider, ProviderService, ProviderUpdate, ProviderView};
pub use secret::SecretService;
