//! Where provider-vault keeps its files
//!
//! ```text
//! <base>/config.json             settings
//! <base>/data/providers.json     provider catalog with sealed API keys
//! <base>/data/models.json        LLM models offered by each provider
//! <base>/data/admin_users.json   admin user directory
//! ```
//!
//! `<base>` is `PROVIDER_VAULT_DATA_DIR` when set, otherwise
//! `$XDG_CONFIG_HOME/provider-vault`, `~/.config/provider-vault`, or
//! `%APPDATA%\provider-vault` on Windows.

use std::path::{Path, PathBuf};

use crate::error::VaultError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PROVIDER_VAULT_DATA_DIR";

const APP_DIR: &str = "provider-vault";

/// File locations for one vault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve the base directory from the process environment
    pub fn new() -> Result<Self, VaultError> {
        Self::resolve(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Resolve the base directory with a custom variable lookup
    pub fn resolve(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self, VaultError> {
        let non_empty = |key: &str| lookup(key).filter(|p| !p.as_os_str().is_empty());

        if let Some(dir) = non_empty(DATA_DIR_ENV) {
            return Ok(Self::with_base_dir(dir));
        }

        let config_home = if cfg!(windows) {
            non_empty("APPDATA").ok_or_else(|| {
                VaultError::Config("Could not determine APPDATA directory".into())
            })?
        } else {
            match non_empty("XDG_CONFIG_HOME") {
                Some(dir) => dir,
                None => non_empty("HOME")
                    .map(|home| home.join(".config"))
                    .ok_or_else(|| {
                        VaultError::Config("HOME environment variable not set".into())
                    })?,
            }
        };

        Ok(Self::with_base_dir(config_home.join(APP_DIR)))
    }

    /// Paths rooted at an explicit directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn providers_file(&self) -> PathBuf {
        self.data_dir().join("providers.json")
    }

    pub fn models_file(&self) -> PathBuf {
        self.data_dir().join("models.json")
    }

    pub fn admin_users_file(&self) -> PathBuf {
        self.data_dir().join("admin_users.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            VaultError::Io(format!("Failed to create {}: {}", data_dir.display(), e))
        })
    }

    /// Whether `vault init` has written the settings file
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
