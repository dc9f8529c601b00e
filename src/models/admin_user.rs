//! Admin user model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AdminUserId;
use crate::auth::Role;

/// Maximum length of names and emails
pub const MAX_FIELD_LEN: usize = 255;

/// A back-office operator allowed to sign in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    /// Unique identifier
    pub id: AdminUserId,

    /// Display name
    pub name: String,

    /// Sign-in email, lower-cased and unique
    pub email: String,

    /// Role granted to the user's sessions
    #[serde(default)]
    pub role: Role,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last modified
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    /// Create a new admin user
    pub fn new(name: &str, email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: AdminUserId::new(),
            name: name.trim().to_string(),
            email: Self::normalize_email(email),
            role: Role::SuperAdmin,
            created_at: now,
            updated_at: now,
        }
    }

    /// Normalize an email for storage and matching
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Case-insensitive substring match on name or email
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.email.contains(&query)
    }

    /// Validate the admin user
    pub fn validate(&self) -> Result<(), AdminUserValidationError> {
        if self.name.trim().is_empty() {
            return Err(AdminUserValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(AdminUserValidationError::EmptyEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(AdminUserValidationError::InvalidEmail);
        }
        if self.name.len() > MAX_FIELD_LEN || self.email.len() > MAX_FIELD_LEN {
            return Err(AdminUserValidationError::TooLong);
        }
        Ok(())
    }
}

impl fmt::Display for AdminUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validation errors for admin users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminUserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    TooLong,
}

impl fmt::Display for AdminUserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::EmptyEmail => write!(f, "Email is required"),
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::TooLong => write!(f, "Name and email must be at most {} chars", MAX_FIELD_LEN),
        }
    }
}

impl std::error::Error for AdminUserValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin_user() {
        let user = AdminUser::new(" Ada ", " Ada@Example.COM ");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::SuperAdmin);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.io"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("ada@.com"));
    }

    #[test]
    fn test_validation() {
        assert!(AdminUser::new("Ada", "ada@example.com").validate().is_ok());
        assert_eq!(
            AdminUser::new("", "ada@example.com").validate(),
            Err(AdminUserValidationError::EmptyName)
        );
        assert_eq!(
            AdminUser::new("Ada", "  ").validate(),
            Err(AdminUserValidationError::EmptyEmail)
        );
        assert_eq!(
            AdminUser::new("Ada", "not-an-email").validate(),
            Err(AdminUserValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_matches_search() {
        let user = AdminUser::new("Ada Lovelace", "ada@example.com");
        assert!(user.matches_search("love"));
        assert!(user.matches_search("EXAMPLE"));
        assert!(!user.matches_search("grace"));
    }

    #[test]
    fn test_role_defaults_when_missing() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Ada",
            "email": "ada@example.com",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#;
        let user: AdminUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
    }
}
