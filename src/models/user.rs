//! User model
//!
//! Defines the User entity for registration, login, and profile lookup.
//! Passwords are stored as argon2 hashes and never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (optional)
    pub email: Option<String>,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()`.
    pub fn new(username: String, email: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "testuser".to_string(),
            Some("test@example.com".to_string()),
            "hashed_password".to_string(),
        );

        assert_eq!(user.id, 0);
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("testuser".to_string(), None, "secret_hash".to_string());
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("secret_hash"));
        assert!(json.contains("testuser"));
    }
}
