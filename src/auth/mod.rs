//! Authorization for provider-vault
//!
//! Roles, the access gate, and the session collaborators the gate reads
//! from.

pub mod gate;
pub mod role;
pub mod session;

pub use gate::{authorize, require_admin, AuthorizedActor};
pub use role::Role;
pub use session::{DirectorySession, SessionActor, SessionSource, StaticSession};
