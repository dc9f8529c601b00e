//! provider-vault - encrypted storage and controlled disclosure of LLM
//! provider API keys
//!
//! API keys are sealed with AES-256-GCM under a key derived from a master
//! secret, shown masked in listings, and revealed only to sessions that pass
//! the access gate.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `auth`: Roles, the access gate and session sources
//! - `config`: Configuration, paths and the master secret
//! - `crypto`: Envelope cipher and key derivation
//! - `error`: Custom error types
//! - `models`: Providers, admin users and paging
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use provider_vault::config::MasterSecret;
//! use provider_vault::crypto::EnvelopeCipher;
//!
//! let cipher = EnvelopeCipher::new(MasterSecret::from_env()?);
//! let envelope = cipher.encrypt("sk-test-ABCDEFGH")?;
//! assert_eq!(cipher.decrypt(&envelope)?.as_str(), "sk-test-ABCDEFGH");
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
