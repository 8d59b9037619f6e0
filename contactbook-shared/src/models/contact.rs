/// Contact model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE contacts (
///     id UUID PRIMARY KEY,
///     user_id VARCHAR(100) NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100),
///     email VARCHAR(200),
///     phone VARCHAR(20),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// Contacts are soft-deleted: rows with `deleted_at` set are invisible to
/// every repository read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a contact
#[derive(Debug, Clone)]
pub struct NewContact {
    pub user_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Partial contact update, only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateContact {
    /// Applies the supplied fields to `contact` in place
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(first_name) = &self.first_name {
            contact.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            contact.last_name = Some(last_name.clone());
        }
        if let Some(email) = &self.email {
            contact.email = Some(email.clone());
        }
        if let Some(phone) = &self.phone {
            contact.phone = Some(phone.clone());
        }
    }
}

/// Contact search filters
///
/// All present filters are AND-combined. Each is a case-insensitive
/// substring match; `name` matches either the first or the last name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactFilter {
    /// Builds a filter, treating blank strings as "no filter"
    pub fn new(name: Option<String>, email: Option<String>, phone: Option<String>) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: clean(name),
            email: clean(email),
            phone: clean(phone),
        }
    }

    /// In-process evaluation of the filter, mirroring the SQL `ILIKE` clauses
    pub fn matches(&self, contact: &Contact) -> bool {
        fn contains(haystack: Option<&str>, needle: &str) -> bool {
            haystack
                .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        }

        if let Some(name) = &self.name {
            if !contains(Some(&contact.first_name), name)
                && !contains(contact.last_name.as_deref(), name)
            {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !contains(contact.email.as_deref(), email) {
                return false;
            }
        }
        if let Some(phone) = &self.phone {
            if !contains(contact.phone.as_deref(), phone) {
                return false;
            }
        }

        true
    }
}
