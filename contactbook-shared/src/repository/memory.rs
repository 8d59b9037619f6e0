/// In-memory store for tests and database-less runs
///
/// Implements all three repository traits over a single lock-protected
/// state so that cross-entity behavior (contact deletion cascading to its
/// addresses) matches the PostgreSQL implementation.
///
/// Rows live in insertion-ordered vectors, which gives the same "creation
/// order" the SQL queries produce with `ORDER BY created_at, id`.
///
/// # Example
///
/// ```
/// use contactbook_shared::repository::{MemoryStore, UserRepository};
/// use contactbook_shared::models::user::NewUser;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// store
///     .create(NewUser {
///         id: "jane".to_string(),
///         name: "Jane".to_string(),
///         password: "$argon2id$...".to_string(),
///     })
///     .await?;
///
/// assert!(store.find_by_id("jane").await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AddressRepository, ContactRepository, RepositoryError, RepositoryResult, UserRepository,
};
use crate::models::{
    address::{Address, NewAddress, UpdateAddress},
    contact::{Contact, ContactFilter, NewContact, UpdateContact},
    paging::PageRequest,
    user::{NewUser, UpdateUser, User},
};

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    contacts: Vec<Contact>,
    addresses: Vec<Address>,
}

/// Lock-protected in-process implementation of every repository trait
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, data: NewUser) -> RepositoryResult<User> {
        let mut state = self.state.write().await;

        if state.users.contains_key(&data.id) {
            return Err(RepositoryError::Conflict("users_pkey".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: data.id,
            name: data.name,
            password: data.password,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_token(&self, token_digest: &str) -> RepositoryResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.token.as_deref() == Some(token_digest))
            .cloned())
    }

    async fn update(&self, id: &str, data: UpdateUser) -> RepositoryResult<Option<User>> {
        let mut state = self.state.write().await;

        let Some(user) = state.users.get_mut(id) else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(password) = data.password {
            user.password = password;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn set_tokens(
        &self,
        id: &str,
        token_digest: Option<String>,
        refresh_digest: Option<String>,
    ) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;

        match state.users.get_mut(id) {
            Some(user) => {
                user.token = token_digest;
                user.refresh_token = refresh_digest;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rotate_tokens(
        &self,
        old_refresh_digest: &str,
        token_digest: String,
        refresh_digest: String,
    ) -> RepositoryResult<Option<User>> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .values_mut()
            .find(|u| u.refresh_token.as_deref() == Some(old_refresh_digest));

        Ok(user.map(|user| {
            user.token = Some(token_digest);
            user.refresh_token = Some(refresh_digest);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, data: NewContact) -> RepositoryResult<Contact> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&data.user_id) {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(format!(
                "contacts.user_id references unknown user {}",
                data.user_id
            ))));
        }

        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.contacts.push(contact.clone());

        Ok(contact)
    }

    async fn find_by_id_and_user(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> RepositoryResult<Option<Contact>> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .iter()
            .find(|c| c.id == id && c.user_id == user_id && c.deleted_at.is_none())
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: &str,
        data: UpdateContact,
    ) -> RepositoryResult<Option<Contact>> {
        let mut state = self.state.write().await;

        let contact = state
            .contacts
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id && c.deleted_at.is_none());

        Ok(contact.map(|contact| {
            data.apply_to(contact);
            contact.updated_at = Utc::now();
            contact.clone()
        }))
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let Some(contact) = state
            .contacts
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id && c.deleted_at.is_none())
        else {
            return Ok(false);
        };
        contact.deleted_at = Some(now);
        contact.updated_at = now;

        for address in state
            .addresses
            .iter_mut()
            .filter(|a| a.contact_id == id && a.deleted_at.is_none())
        {
            address.deleted_at = Some(now);
            address.updated_at = now;
        }

        Ok(true)
    }

    async fn search(
        &self,
        user_id: &str,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> RepositoryResult<(Vec<Contact>, i64)> {
        let state = self.state.read().await;

        let matching: Vec<&Contact> = state
            .contacts
            .iter()
            .filter(|c| c.user_id == user_id && c.deleted_at.is_none() && filter.matches(c))
            .collect();

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn create(&self, data: NewAddress) -> RepositoryResult<Address> {
        let mut state = self.state.write().await;

        if !state.contacts.iter().any(|c| c.id == data.contact_id) {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(format!(
                "addresses.contact_id references unknown contact {}",
                data.contact_id
            ))));
        }

        let now = Utc::now();
        let address = Address {
            id: Uuid::new_v4(),
            contact_id: data.contact_id,
            street: data.street,
            city: data.city,
            province: data.province,
            postal_code: data.postal_code,
            country: data.country,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.addresses.push(address.clone());

        Ok(address)
    }

    async fn find_by_id_and_contact(
        &self,
        id: Uuid,
        contact_id: Uuid,
    ) -> RepositoryResult<Option<Address>> {
        let state = self.state.read().await;
        Ok(state
            .addresses
            .iter()
            .find(|a| a.id == id && a.contact_id == contact_id && a.deleted_at.is_none())
            .cloned())
    }

    async fn list_by_contact(&self, contact_id: Uuid) -> RepositoryResult<Vec<Address>> {
        let state = self.state.read().await;
        Ok(state
            .addresses
            .iter()
            .filter(|a| a.contact_id == contact_id && a.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        contact_id: Uuid,
        data: UpdateAddress,
    ) -> RepositoryResult<Option<Address>> {
        let mut state = self.state.write().await;

        let address = state
            .addresses
            .iter_mut()
            .find(|a| a.id == id && a.contact_id == contact_id && a.deleted_at.is_none());

        Ok(address.map(|address| {
            data.apply_to(address);
            address.updated_at = Utc::now();
            address.clone()
        }))
    }

    async fn delete(&self, id: Uuid, contact_id: Uuid) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;

        match state
            .addresses
            .iter_mut()
            .find(|a| a.id == id && a.contact_id == contact_id && a.deleted_at.is_none())
        {
            Some(address) => {
                let now = Utc::now();
                address.deleted_at = Some(now);
                address.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
