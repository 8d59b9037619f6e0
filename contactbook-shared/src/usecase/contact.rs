/// Contacts owned by the authenticated user
///
/// Every operation is scoped by `AuthContext::user_id`; a contact that
/// belongs to someone else is reported exactly like a missing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::{UseCaseError, UseCaseResult};
use crate::auth::authenticator::AuthContext;
use crate::models::contact::{Contact, ContactFilter, NewContact, UpdateContact};
use crate::models::paging::{lenient_page_value, PageMetadata, PageRequest};
use crate::repository::ContactRepository;

/// Create request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,

    #[validate(email, length(max = 200))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,

    #[validate(email, length(max = 200))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// Search query
///
/// Blank or non-numeric `page`/`size` fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_page_value")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_page_value")]
    pub size: Option<i64>,
}

/// Contact as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

fn not_found() -> UseCaseError {
    UseCaseError::NotFound("Contact is not found".to_string())
}

/// Contact operations
#[derive(Clone)]
pub struct ContactUseCase {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactUseCase {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    pub async fn create(
        &self,
        auth: &AuthContext,
        request: CreateContactRequest,
    ) -> UseCaseResult<ContactResponse> {
        request.validate()?;

        let contact = self
            .contacts
            .create(NewContact {
                user_id: auth.user_id.clone(),
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
            })
            .await?;

        info!(user_id = %auth.user_id, contact_id = %contact.id, "Contact created");
        Ok(contact.into())
    }

    pub async fn get(&self, auth: &AuthContext, contact_id: Uuid) -> UseCaseResult<ContactResponse> {
        let contact = self
            .contacts
            .find_by_id_and_user(contact_id, &auth.user_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(contact.into())
    }

    pub async fn update(
        &self,
        auth: &AuthContext,
        contact_id: Uuid,
        request: UpdateContactRequest,
    ) -> UseCaseResult<ContactResponse> {
        request.validate()?;

        let contact = self
            .contacts
            .update(
                contact_id,
                &auth.user_id,
                UpdateContact {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    email: request.email,
                    phone: request.phone,
                },
            )
            .await?
            .ok_or_else(not_found)?;

        info!(user_id = %auth.user_id, contact_id = %contact.id, "Contact updated");
        Ok(contact.into())
    }

    /// Soft-deletes the contact together with its addresses
    pub async fn delete(&self, auth: &AuthContext, contact_id: Uuid) -> UseCaseResult<bool> {
        if !self.contacts.delete(contact_id, &auth.user_id).await? {
            return Err(not_found());
        }

        info!(user_id = %auth.user_id, contact_id = %contact_id, "Contact deleted");
        Ok(true)
    }

    /// One page of the caller's contacts matching the filters, in creation order
    pub async fn search(
        &self,
        auth: &AuthContext,
        request: SearchContactRequest,
    ) -> UseCaseResult<(Vec<ContactResponse>, PageMetadata)> {
        let filter = ContactFilter::new(request.name, request.email, request.phone);
        let page = PageRequest::new(request.page, request.size);

        let (contacts, total) = self.contacts.search(&auth.user_id, &filter, page).await?;
        debug!(
            user_id = %auth.user_id,
            page = page.page(),
            size = page.size(),
            total,
            "Contact search"
        );

        Ok((
            contacts.into_iter().map(ContactResponse::from).collect(),
            page.metadata(total),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NewUser;
    use crate::repository::{MemoryStore, UserRepository};

    async fn setup() -> (ContactUseCase, AuthContext) {
        let store = Arc::new(MemoryStore::new());
        UserRepository::create(
            &*store,
            NewUser {
                id: "jane".to_string(),
                name: "Jane".to_string(),
                password: "hash".to_string(),
            },
        )
        .await
        .unwrap();

        (ContactUseCase::new(store), AuthContext::new("jane"))
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let (contacts, auth) = setup().await;
        let err = contacts
            .create(
                &auth,
                CreateContactRequest {
                    first_name: "Ann".to_string(),
                    email: Some("not-an-email".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Validation(m) if m == "email must be a valid email"));
    }

    #[tokio::test]
    async fn test_search_uses_default_paging() {
        let (contacts, auth) = setup().await;
        contacts
            .create(
                &auth,
                CreateContactRequest {
                    first_name: "Ann".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let (items, paging) = contacts
            .search(
                &auth,
                SearchContactRequest {
                    page: Some(0),
                    size: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(paging.page, 1);
        assert_eq!(paging.size, 10);
        assert_eq!(paging.total_item, 1);
        assert_eq!(paging.total_page, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_contact() {
        let (contacts, auth) = setup().await;
        assert!(matches!(
            contacts.get(&auth, Uuid::new_v4()).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
