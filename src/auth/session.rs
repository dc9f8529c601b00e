//! Session collaborators
//!
//! A `SessionSource` answers "who is acting in this request". The gate only
//! looks at the raw role claim, so sources stay free to carry whatever role
//! strings their identity provider hands out.

use crate::error::VaultResult;
use crate::models::AdminUser;
use crate::storage::AdminUserRepository;

/// Identity attached to the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionActor {
    /// Stable user identifier
    pub id: String,
    /// Sign-in email
    pub email: String,
    /// Raw role claim, if the session carries one
    pub role: Option<String>,
}

impl SessionActor {
    /// Create an actor with a role claim
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role: role.map(str::to_string),
        }
    }

    fn from_admin_user(user: &AdminUser) -> Self {
        Self {
            id: user.id.as_uuid().to_string(),
            email: user.email.clone(),
            role: Some(user.role.as_str().to_string()),
        }
    }
}

/// Provides the acting identity for the current request
pub trait SessionSource {
    /// The current actor, or `None` when there is no session
    fn current_actor(&self) -> VaultResult<Option<SessionActor>>;
}

/// A fixed session, used by embedders that resolve identity themselves
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    actor: Option<SessionActor>,
}

impl StaticSession {
    /// A session for the given actor
    pub fn new(actor: SessionActor) -> Self {
        Self { actor: Some(actor) }
    }

    /// No session at all
    pub fn anonymous() -> Self {
        Self { actor: None }
    }
}

impl SessionSource for StaticSession {
    fn current_actor(&self) -> VaultResult<Option<SessionActor>> {
        Ok(self.actor.clone())
    }
}

/// Resolves an email against the admin user directory
///
/// Only emails present in the directory get a session; the role claim is
/// whatever role the directory stores for that user.
pub struct DirectorySession<'a> {
    users: &'a AdminUserRepository,
    email: Option<String>,
}

impl<'a> DirectorySession<'a> {
    /// Create a directory-backed session for an optional sign-in email
    pub fn new(users: &'a AdminUserRepository, email: Option<&str>) -> Self {
        Self {
            users,
            email: email.map(AdminUser::normalize_email).filter(|e| !e.is_empty()),
        }
    }
}

impl SessionSource for DirectorySession<'_> {
    fn current_actor(&self) -> VaultResult<Option<SessionActor>> {
        let Some(email) = self.email.as_deref() else {
            return Ok(None);
        };

        match self.users.get_by_email(email)? {
            Some(user) => Ok(Some(SessionActor::from_admin_user(&user))),
            None => {
                tracing::warn!(email = %email, "Sign-in denied: not an admin user");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository() -> (TempDir, AdminUserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AdminUserRepository::new(temp_dir.path().join("admin_users.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_static_session() {
        let actor = SessionActor::new("1", "ada@example.com", Some("super_admin"));
        let session = StaticSession::new(actor.clone());
        assert_eq!(session.current_actor().unwrap(), Some(actor));
        assert_eq!(StaticSession::anonymous().current_actor().unwrap(), None);
    }

    #[test]
    fn test_directory_session_known_user() {
        let (_temp_dir, repo) = repository();
        let user = AdminUser::new("Ada", "ada@example.com");
        repo.upsert(user.clone()).unwrap();

        let session = DirectorySession::new(&repo, Some("ADA@example.com"));
        let actor = session.current_actor().unwrap().unwrap();
        assert_eq!(actor.email, "ada@example.com");
        assert_eq!(actor.id, user.id.as_uuid().to_string());
        assert_eq!(actor.role.as_deref(), Some("super_admin"));
    }

    #[test]
    fn test_directory_session_unknown_user() {
        let (_temp_dir, repo) = repository();
        let session = DirectorySession::new(&repo, Some("mallory@example.com"));
        assert_eq!(session.current_actor().unwrap(), None);
    }

    #[test]
    fn test_directory_session_without_email() {
        let (_temp_dir, repo) = repository();
        assert_eq!(DirectorySession::new(&repo, None).current_actor().unwrap(), None);
        assert_eq!(
            DirectorySession::new(&repo, Some("  ")).current_actor().unwrap(),
            None
        );
    }
}
