//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod admin;
pub mod model;
pub mod provider;

pub use admin::{handle_admin_command, AdminCommands};
pub use model::{handle_model_command, ModelCommands};
pub use provider::{handle_provider_command, ProviderCommands};

use crate::crypto::SecretString;
use crate::error::{VaultError, VaultResult};

/// Prompt for a secret with hidden input
fn prompt_secret(prompt: &str) -> VaultResult<SecretString> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(|e| VaultError::Io(format!("Failed to read API key: {}", e)))
}
