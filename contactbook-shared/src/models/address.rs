/// Address model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE addresses (
///     id UUID PRIMARY KEY,
///     contact_id UUID NOT NULL REFERENCES contacts (id) ON DELETE CASCADE,
///     street VARCHAR(255),
///     city VARCHAR(255),
///     province VARCHAR(255),
///     postal_code VARCHAR(10),
///     country VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Postal address attached to a contact
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: Uuid,

    /// Owning contact
    pub contact_id: Uuid,

    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating an address
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub contact_id: Uuid,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

/// Partial address update, only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl UpdateAddress {
    /// Applies the supplied fields to `address` in place
    pub fn apply_to(&self, address: &mut Address) {
        if let Some(street) = &self.street {
            address.street = Some(street.clone());
        }
        if let Some(city) = &self.city {
            address.city = Some(city.clone());
        }
        if let Some(province) = &self.province {
            address.province = Some(province.clone());
        }
        if let Some(postal_code) = &self.postal_code {
            address.postal_code = Some(postal_code.clone());
        }
        if let Some(country) = &self.country {
            address.country = country.clone();
        }
    }
}
