//! Credential persistence seam
//!
//! The secret service only needs to read and replace one envelope column per
//! provider. Keeping that behind a trait lets the service run against any
//! store and lets tests observe exactly which persistence calls happen.

use crate::error::VaultResult;
use crate::models::ProviderId;

/// Reads and writes the stored envelope of a provider
pub trait CredentialStore {
    /// The stored envelope for a provider
    ///
    /// `None` when the provider does not exist, `Some(None)` when it exists
    /// without a credential.
    fn credential_envelope(&self, id: ProviderId) -> VaultResult<Option<Option<String>>>;

    /// Replace the stored envelope wholesale, or clear it with `None`
    ///
    /// Returns `NotFound` when the provider does not exist.
    fn set_credential_envelope(&self, id: ProviderId, envelope: Option<String>) -> VaultResult<()>;
}
