//! Access gate
//!
//! Every operation that touches a provider, a credential or an admin user
//! calls `require_admin` before any storage or cipher work.

use super::role::Role;
use super::session::{SessionActor, SessionSource};
use crate::error::{VaultError, VaultResult};

/// An actor that passed the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedActor {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Decide on a raw role claim
///
/// Only a privileged role is allowed; unknown claims and missing sessions
/// are denied with `Unauthorized`.
pub fn authorize(role_claim: Option<&str>) -> VaultResult<Role> {
    role_claim
        .and_then(|claim| claim.parse::<Role>().ok())
        .filter(Role::is_privileged)
        .ok_or(VaultError::Unauthorized)
}

/// Resolve the current session and run it through the gate
pub fn require_admin(session: &dyn SessionSource) -> VaultResult<AuthorizedActor> {
    let actor = session.current_actor()?;
    let role = authorize(actor.as_ref().and_then(|a| a.role.as_deref())).map_err(|err| {
        tracing::warn!(
            email = actor.as_ref().map(|a| a.email.as_str()).unwrap_or("<none>"),
            "Access denied"
        );
        err
    })?;

    // authorize() only succeeds when an actor with a claim exists
    let SessionActor { id, email, .. } = actor.ok_or(VaultError::Unauthorized)?;
    Ok(AuthorizedActor { id, email, role })
}
