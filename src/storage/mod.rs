//! Storage layer for provider-vault
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod admin_users;
pub mod credentials;
pub mod file_io;
pub mod models;
pub mod providers;

pub use admin_users::AdminUserRepository;
pub use credentials::CredentialStore;
pub use file_io::{read_json, write_json_atomic};
pub use models::ModelRepository;
pub use providers::ProviderRepository;

use crate::config::paths::VaultPaths;
use crate::error::VaultError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: VaultPaths,
    pub providers: ProviderRepository,
    pub models: ModelRepository,
    pub admin_users: AdminUserRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: VaultPaths) -> Result<Self, VaultError> {
        paths.ensure_directories()?;

        Ok(Self {
            providers: ProviderRepository::new(paths.providers_file()),
            models: ModelRepository::new(paths.models_file()),
            admin_users: AdminUserRepository::new(paths.admin_users_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), VaultError> {
        self.providers.load()?;
        self.models.load()?;
        self.admin_users.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), VaultError> {
        self.providers.save()?;
        self.models.save()?;
        self.admin_users.save()?;
        Ok(())
    }
}
