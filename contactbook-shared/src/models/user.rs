/// User model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id VARCHAR(100) PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     password VARCHAR(255) NOT NULL,
///     token VARCHAR(64),
///     refresh_token VARCHAR(64),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `token` and `refresh_token` hold SHA-256 digests of the tokens handed to
/// the client, never the tokens themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// User-chosen identifier (unique)
    pub id: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password: String,

    /// Digest of the current session token (None when logged out)
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Digest of the current refresh token (None when logged out)
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password: String,
}

/// Input for updating an existing user
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,

    /// New password hash
    pub password: Option<String>,
}

impl UpdateUser {
    /// True when nothing would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_default_is_empty() {
        assert!(UpdateUser::default().is_empty());

        let update = UpdateUser {
            name: Some("Jane".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_user_serialization_hides_secrets() {
        let now = Utc::now();
        let user = User {
            id: "jane".to_string(),
            name: "Jane".to_string(),
            password: "$argon2id$...".to_string(),
            token: Some("digest".to_string()),
            refresh_token: Some("digest".to_string()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"id\":\"jane\""));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("digest"));
    }
}
