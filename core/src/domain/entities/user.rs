//! User entity representing a registered renter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered renter account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across users
    pub email: String,

    /// Bcrypt hash of the password, never serialized in responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Contact phone number
    pub phone: String,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User with a fresh id and timestamps
    pub fn new(name: String, email: String, password_hash: String, phone: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Updates the last login timestamp
    pub fn touch_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "$2b$10$hash".to_string(),
            "+2348012345678".to_string(),
        );
        assert_eq!(user.email, "ada@example.com");
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn test_touch_login() {
        let mut user = User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
        );
        user.touch_login();
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "secret-hash".to_string(),
            "0800".to_string(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
