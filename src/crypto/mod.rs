//! Cryptographic functions for provider-vault
//!
//! Provides AES-256-GCM envelopes with Argon2id key derivation for
//! third-party API keys at rest.

pub mod cipher;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use cipher::EnvelopeCipher;
pub use envelope::{open, seal, Envelope};
pub use key_derivation::{derive_key, DerivedKey, KdfParams};
pub use secure_memory::SecretString;
