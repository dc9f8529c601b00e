//! Admin user service
//!
//! Manages the directory of operators allowed to sign in. Every account in
//! the directory carries the super-admin role.

use chrono::Utc;

use crate::auth::{require_admin, SessionSource};
use crate::error::{VaultError, VaultResult};
use crate::models::{AdminUser, AdminUserId, ListQuery, Page};
use crate::storage::Storage;

/// Input for creating or editing an admin user
#[derive(Debug, Clone, Default)]
pub struct AdminUserInput {
    pub name: String,
    pub email: String,
}

/// Service for admin user management
pub struct AdminUserService<'a> {
    storage: &'a Storage,
    session: &'a dyn SessionSource,
}

impl<'a> AdminUserService<'a> {
    /// Create a new admin user service
    pub fn new(storage: &'a Storage, session: &'a dyn SessionSource) -> Self {
        Self { storage, session }
    }

    /// Seed the first admin user
    ///
    /// Only allowed while the directory is empty; no session is required
    /// because nobody can sign in yet.
    pub fn bootstrap(storage: &Storage, input: AdminUserInput) -> VaultResult<AdminUser> {
        if storage.admin_users.count()? > 0 {
            return Err(VaultError::Forbidden(
                "Admin users already exist; sign in as one to add more".into(),
            ));
        }

        let user = Self::build(input)?;
        storage.admin_users.persist(user.clone())?;

        tracing::info!(user = %user.id, email = %user.email, "First admin user created");
        Ok(user)
    }

    /// Create an admin user
    pub fn create(&self, input: AdminUserInput) -> VaultResult<AdminUser> {
        let actor = require_admin(self.session)?;

        let user = Self::build(input)?;
        self.ensure_email_free(&user.email, None)?;

        self.storage.admin_users.persist(user.clone())?;

        tracing::info!(user = %user.id, email = %user.email, actor = %actor.email, "Admin user created");
        Ok(user)
    }

    /// Update name and email of an admin user
    pub fn update(&self, id: AdminUserId, input: AdminUserInput) -> VaultResult<AdminUser> {
        let actor = require_admin(self.session)?;

        let mut user = self
            .storage
            .admin_users
            .get(id)?
            .ok_or_else(|| VaultError::admin_user_not_found(id.to_string()))?;

        user.name = input.name.trim().to_string();
        user.email = AdminUser::normalize_email(&input.email);
        user.validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;
        self.ensure_email_free(&user.email, Some(id))?;
        user.updated_at = Utc::now();

        self.storage.admin_users.persist(user.clone())?;

        tracing::info!(user = %user.id, actor = %actor.email, "Admin user updated");
        Ok(user)
    }

    /// Delete an admin user
    ///
    /// Refuses to delete the acting user or the last remaining admin.
    pub fn delete(&self, id: AdminUserId) -> VaultResult<AdminUser> {
        let actor = require_admin(self.session)?;

        let user = self
            .storage
            .admin_users
            .get(id)?
            .ok_or_else(|| VaultError::admin_user_not_found(id.to_string()))?;

        if user.id.as_uuid().to_string() == actor.id || user.email == actor.email {
            return Err(VaultError::Forbidden(
                "You cannot delete your own account".into(),
            ));
        }

        if self.storage.admin_users.count()? <= 1 {
            return Err(VaultError::Forbidden(
                "Cannot delete the last admin user".into(),
            ));
        }

        self.storage.admin_users.remove(id)?;

        tracing::info!(user = %id, email = %user.email, actor = %actor.email, "Admin user deleted");
        Ok(user)
    }

    /// Find an admin user by email or ID
    pub fn find(&self, identifier: &str) -> VaultResult<Option<AdminUser>> {
        require_admin(self.session)?;

        if let Some(user) = self.storage.admin_users.get_by_email(identifier)? {
            return Ok(Some(user));
        }

        if let Ok(id) = identifier.parse::<AdminUserId>() {
            return self.storage.admin_users.get(id);
        }

        Ok(None)
    }

    /// Resolve an admin user by email or ID, failing when absent
    pub fn resolve(&self, identifier: &str) -> VaultResult<AdminUser> {
        self.find(identifier)?
            .ok_or_else(|| VaultError::admin_user_not_found(identifier))
    }

    /// One page of admin users, newest first
    pub fn list(&self, query: &ListQuery) -> VaultResult<Page<AdminUser>> {
        require_admin(self.session)?;

        let mut users = self.storage.admin_users.get_all()?;
        if let Some(term) = query.search_term() {
            users.retain(|u| u.matches_search(term));
        }

        Ok(query.paginate(users))
    }

    fn build(input: AdminUserInput) -> VaultResult<AdminUser> {
        let user = AdminUser::new(&input.name, &input.email);
        user.validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;
        Ok(user)
    }

    fn ensure_email_free(&self, email: &str, current: Option<AdminUserId>) -> VaultResult<()> {
        match self.storage.admin_users.get_by_email(email)? {
            Some(existing) if Some(existing.id) != current => Err(VaultError::Duplicate {
                entity_type: "Admin user",
                identifier: email.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
