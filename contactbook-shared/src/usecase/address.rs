/// Addresses of a contact
///
/// Ownership runs through the parent contact: every operation first checks
/// that `contact_id` is a live contact of the caller, then scopes the
/// address lookup by that contact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{UseCaseError, UseCaseResult};
use crate::auth::authenticator::AuthContext;
use crate::models::address::{Address, NewAddress, UpdateAddress};
use crate::repository::{AddressRepository, ContactRepository};

/// Create request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateAddressRequest {
    #[validate(length(max = 255))]
    pub street: Option<String>,

    #[validate(length(max = 255))]
    pub city: Option<String>,

    #[validate(length(max = 255))]
    pub province: Option<String>,

    #[validate(length(max = 10))]
    pub postal_code: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(length(max = 255))]
    pub street: Option<String>,

    #[validate(length(max = 255))]
    pub city: Option<String>,

    #[validate(length(max = 255))]
    pub province: Option<String>,

    #[validate(length(max = 10))]
    pub postal_code: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
}

/// Address as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: Uuid,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            street: address.street,
            city: address.city,
            province: address.province,
            postal_code: address.postal_code,
            country: address.country,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

fn address_not_found() -> UseCaseError {
    UseCaseError::NotFound("Address is not found".to_string())
}

/// Address operations
#[derive(Clone)]
pub struct AddressUseCase {
    contacts: Arc<dyn ContactRepository>,
    addresses: Arc<dyn AddressRepository>,
}

impl AddressUseCase {
    pub fn new(contacts: Arc<dyn ContactRepository>, addresses: Arc<dyn AddressRepository>) -> Self {
        Self {
            contacts,
            addresses,
        }
    }

    async fn ensure_contact(&self, auth: &AuthContext, contact_id: Uuid) -> UseCaseResult<()> {
        self.contacts
            .find_by_id_and_user(contact_id, &auth.user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| UseCaseError::NotFound("Contact is not found".to_string()))
    }

    pub async fn create(
        &self,
        auth: &AuthContext,
        contact_id: Uuid,
        request: CreateAddressRequest,
    ) -> UseCaseResult<AddressResponse> {
        request.validate()?;
        self.ensure_contact(auth, contact_id).await?;

        let address = self
            .addresses
            .create(NewAddress {
                contact_id,
                street: request.street,
                city: request.city,
                province: request.province,
                postal_code: request.postal_code,
                country: request.country,
            })
            .await?;

        info!(contact_id = %contact_id, address_id = %address.id, "Address created");
        Ok(address.into())
    }

    /// All live addresses of the contact, in creation order
    pub async fn list(
        &self,
        auth: &AuthContext,
        contact_id: Uuid,
    ) -> UseCaseResult<Vec<AddressResponse>> {
        self.ensure_contact(auth, contact_id).await?;

        let addresses = self.addresses.list_by_contact(contact_id).await?;
        Ok(addresses.into_iter().map(AddressResponse::from).collect())
    }

    pub async fn get(
        &self,
        auth: &AuthContext,
        contact_id: Uuid,
        address_id: Uuid,
    ) -> UseCaseResult<AddressResponse> {
        self.ensure_contact(auth, contact_id).await?;

        let address = self
            .addresses
            .find_by_id_and_contact(address_id, contact_id)
            .await?
            .ok_or_else(address_not_found)?;

        Ok(address.into())
    }

    pub async fn update(
        &self,
        auth: &AuthContext,
        contact_id: Uuid,
        address_id: Uuid,
        request: UpdateAddressRequest,
    ) -> UseCaseResult<AddressResponse> {
        request.validate()?;
        self.ensure_contact(auth, contact_id).await?;

        let address = self
            .addresses
            .update(
                address_id,
                contact_id,
                UpdateAddress {
                    street: request.street,
                    city: request.city,
                    province: request.province,
                    postal_code: request.postal_code,
                    country: request.country,
                },
            )
            .await?
            .ok_or_else(address_not_found)?;

        info!(contact_id = %contact_id, address_id = %address.id, "Address updated");
        Ok(address.into())
    }

    pub async fn delete(
        &self,
        auth: &AuthContext,
        contact_id: Uuid,
        address_id: Uuid,
    ) -> UseCaseResult<bool> {
        self.ensure_contact(auth, contact_id).await?;

        if !self.addresses.delete(address_id, contact_id).await? {
            return Err(address_not_found());
        }

        info!(contact_id = %contact_id, address_id = %address_id, "Address deleted");
        Ok(true)
    }
}
