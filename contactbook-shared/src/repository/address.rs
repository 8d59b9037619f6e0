/// Address persistence
///
/// Queries are scoped by `contact_id` only. Whether the contact belongs to
/// the caller is checked by the use case before any of these run.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryResult;
use crate::models::address::{Address, NewAddress, UpdateAddress};

const ADDRESS_COLUMNS: &str = "id, contact_id, street, city, province, postal_code, country, created_at, updated_at, deleted_at";

/// Port for address persistence
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn create(&self, data: NewAddress) -> RepositoryResult<Address>;

    async fn find_by_id_and_contact(
        &self,
        id: Uuid,
        contact_id: Uuid,
    ) -> RepositoryResult<Option<Address>>;

    /// All live addresses of a contact in creation order
    async fn list_by_contact(&self, contact_id: Uuid) -> RepositoryResult<Vec<Address>>;

    async fn update(
        &self,
        id: Uuid,
        contact_id: Uuid,
        data: UpdateAddress,
    ) -> RepositoryResult<Option<Address>>;

    /// Soft-deletes a live address; false when there was nothing to delete
    async fn delete(&self, id: Uuid, contact_id: Uuid) -> RepositoryResult<bool>;
}

/// PostgreSQL implementation of [`AddressRepository`]
#[derive(Clone)]
pub struct PgAddressRepository {
    pool: PgPool,
}

impl PgAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn create(&self, data: NewAddress) -> RepositoryResult<Address> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            INSERT INTO addresses (id, contact_id, street, city, province, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(data.contact_id)
        .bind(data.street)
        .bind(data.city)
        .bind(data.province)
        .bind(data.postal_code)
        .bind(data.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(address)
    }

    async fn find_by_id_and_contact(
        &self,
        id: Uuid,
        contact_id: Uuid,
    ) -> RepositoryResult<Option<Address>> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            SELECT {ADDRESS_COLUMNS}
            FROM addresses
            WHERE id = $1 AND contact_id = $2 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    async fn list_by_contact(&self, contact_id: Uuid) -> RepositoryResult<Vec<Address>> {
        let addresses = sqlx::query_as::<_, Address>(&format!(
            r#"
            SELECT {ADDRESS_COLUMNS}
            FROM addresses
            WHERE contact_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addresses)
    }

    async fn update(
        &self,
        id: Uuid,
        contact_id: Uuid,
        data: UpdateAddress,
    ) -> RepositoryResult<Option<Address>> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            UPDATE addresses
            SET street = COALESCE($3, street),
                city = COALESCE($4, city),
                province = COALESCE($5, province),
                postal_code = COALESCE($6, postal_code),
                country = COALESCE($7, country),
                updated_at = NOW()
            WHERE id = $1 AND contact_id = $2 AND deleted_at IS NULL
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(contact_id)
        .bind(data.street)
        .bind(data.city)
        .bind(data.province)
        .bind(data.postal_code)
        .bind(data.country)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    async fn delete(&self, id: Uuid, contact_id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE addresses
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND contact_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(contact_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
