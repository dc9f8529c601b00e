//! Admin user repository for JSON storage
//!
//! Manages loading and saving admin users to admin_users.json. Changes are
//! written to disk before they become visible in memory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VaultError;
use crate::models::{AdminUser, AdminUserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable admin user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AdminUserData {
    admin_users: Vec<AdminUser>,
}

type AdminUserMap = HashMap<AdminUserId, AdminUser>;

/// Newest first, ties broken by email
fn sorted(data: &AdminUserMap) -> Vec<AdminUser> {
    let mut users: Vec<_> = data.values().cloned().collect();
    users.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.email.cmp(&b.email))
    });
    users
}

fn email_index(data: &AdminUserMap) -> HashMap<String, AdminUserId> {
    data.values()
        .map(|user| (AdminUser::normalize_email(&user.email), user.id))
        .collect()
}

/// Repository for admin user persistence
pub struct AdminUserRepository {
    path: PathBuf,
    data: RwLock<AdminUserMap>,
    /// Index: normalized email -> user id
    by_email: RwLock<HashMap<String, AdminUserId>>,
}

impl AdminUserRepository {
    /// Create a new admin user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_email: RwLock::new(HashMap::new()),
        }
    }

    /// Load admin users from disk
    pub fn load(&self) -> Result<(), VaultError> {
        let file_data: AdminUserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = file_data
            .admin_users
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        *by_email = email_index(&data);

        Ok(())
    }

    /// Save admin users to disk
    pub fn save(&self) -> Result<(), VaultError> {
        let admin_users = self.get_all()?;
        write_json_atomic(&self.path, &AdminUserData { admin_users })
    }

    /// Apply a change to a staged copy, write it, then swap it in
    ///
    /// When the change or the write fails, memory and the email index keep
    /// their previous state.
    fn commit<T>(&self, change: impl FnOnce(&mut AdminUserMap) -> T) -> Result<T, VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut staged = data.clone();
        let result = change(&mut staged);
        write_json_atomic(
            &self.path,
            &AdminUserData {
                admin_users: sorted(&staged),
            },
        )?;

        *by_email = email_index(&staged);
        *data = staged;
        Ok(result)
    }

    /// Get an admin user by ID
    pub fn get(&self, id: AdminUserId) -> Result<Option<AdminUser>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all admin users, newest first
    pub fn get_all(&self) -> Result<Vec<AdminUser>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(&data))
    }

    /// Get an admin user by email (case-insensitive)
    pub fn get_by_email(&self, email: &str) -> Result<Option<AdminUser>, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_email = self
            .by_email
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_email
            .get(&AdminUser::normalize_email(email))
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Insert or update an admin user in memory only
    pub fn upsert(&self, user: AdminUser) -> Result<(), VaultError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&user.id) {
            by_email.remove(&AdminUser::normalize_email(&old.email));
        }
        by_email.insert(AdminUser::normalize_email(&user.email), user.id);

        data.insert(user.id, user);
        Ok(())
    }

    /// Insert or update an admin user and write it to disk
    pub fn persist(&self, user: AdminUser) -> Result<(), VaultError> {
        self.commit(|data| {
            data.insert(user.id, user);
        })
    }

    /// Delete an admin user on disk and in memory, returning the removed record
    pub fn remove(&self, id: AdminUserId) -> Result<Option<AdminUser>, VaultError> {
        self.commit(|data| data.remove(&id))
    }

    /// Count admin users
    pub fn count(&self) -> Result<usize, VaultError> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
