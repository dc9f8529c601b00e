//! Configuration module for provider-vault
//!
//! - XDG-compliant path resolution
//! - Settings persistence
//! - The master secret used for envelope encryption

pub mod paths;
pub mod secret;
pub mod settings;

pub use paths::VaultPaths;
pub use secret::MasterSecret;
pub use settings::Settings;
