/// Contact persistence
///
/// Every query is scoped by `user_id` and filters out soft-deleted rows, so a
/// contact owned by someone else is indistinguishable from a missing one.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{like_pattern, RepositoryResult};
use crate::models::{
    contact::{Contact, ContactFilter, NewContact, UpdateContact},
    paging::PageRequest,
};

const CONTACT_COLUMNS: &str =
    "id, user_id, first_name, last_name, email, phone, created_at, updated_at, deleted_at";

/// Port for contact persistence
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, data: NewContact) -> RepositoryResult<Contact>;

    /// Finds a live contact owned by `user_id`
    async fn find_by_id_and_user(&self, id: Uuid, user_id: &str)
        -> RepositoryResult<Option<Contact>>;

    /// Partially updates a live contact owned by `user_id`
    async fn update(
        &self,
        id: Uuid,
        user_id: &str,
        data: UpdateContact,
    ) -> RepositoryResult<Option<Contact>>;

    /// Soft-deletes a live contact owned by `user_id` together with its
    /// addresses. Returns false when there was nothing to delete.
    async fn delete(&self, id: Uuid, user_id: &str) -> RepositoryResult<bool>;

    /// Returns one page of matching contacts in creation order, plus the
    /// total number of matches across all pages
    async fn search(
        &self,
        user_id: &str,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> RepositoryResult<(Vec<Contact>, i64)>;
}

/// PostgreSQL implementation of [`ContactRepository`]
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the ownership, liveness and filter predicates shared by the page
/// query and the count query
fn push_search_predicates(qb: &mut QueryBuilder<'_, Postgres>, user_id: &str, filter: &ContactFilter) {
    qb.push(" WHERE deleted_at IS NULL AND user_id = ")
        .push_bind(user_id.to_string());

    if let Some(name) = &filter.name {
        let pattern = like_pattern(name);
        qb.push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(email) = &filter.email {
        qb.push(" AND email ILIKE ").push_bind(like_pattern(email));
    }
    if let Some(phone) = &filter.phone {
        qb.push(" AND phone ILIKE ").push_bind(like_pattern(phone));
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, data: NewContact) -> RepositoryResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (id, user_id, first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn find_by_id_and_user(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> RepositoryResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: &str,
        data: UpdateContact,
    ) -> RepositoryResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> RepositoryResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE contacts
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let addresses = sqlx::query(
            r#"
            UPDATE addresses
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE contact_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            contact_id = %id,
            addresses = addresses.rows_affected(),
            "Soft-deleted contact and its addresses"
        );

        Ok(true)
    }

    async fn search(
        &self,
        user_id: &str,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> RepositoryResult<(Vec<Contact>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        push_search_predicates(&mut count_query, user_id, filter);
        let (total,): (i64,) = count_query.build_query_as().fetch_one(&self.pool).await?;

        let mut page_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts"));
        push_search_predicates(&mut page_query, user_id, filter);
        page_query
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let contacts = page_query
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;

        Ok((contacts, total))
    }
}
