/// User persistence
///
/// Besides plain CRUD the user repository owns the token columns: session
/// and refresh token digests are written here and looked up here by the
/// authenticator.

use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryResult;
use crate::models::user::{NewUser, UpdateUser, User};

const USER_COLUMNS: &str = "id, name, password, token, refresh_token, created_at, updated_at";

/// Port for user persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; fails with `Conflict` when the id is taken
    async fn create(&self, data: NewUser) -> RepositoryResult<User>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;

    /// Finds the user whose session token digest equals `token_digest`
    async fn find_by_token(&self, token_digest: &str) -> RepositoryResult<Option<User>>;

    /// Applies a partial update, bumping `updated_at`
    ///
    /// Returns None if the user doesn't exist.
    async fn update(&self, id: &str, data: UpdateUser) -> RepositoryResult<Option<User>>;

    /// Overwrites both token digests (None clears them)
    ///
    /// Returns false if the user doesn't exist.
    async fn set_tokens(
        &self,
        id: &str,
        token_digest: Option<String>,
        refresh_digest: Option<String>,
    ) -> RepositoryResult<bool>;

    /// Atomically swaps the token pair of the user holding `old_refresh_digest`
    ///
    /// Returns None when no user holds that refresh token, which includes the
    /// loser of two concurrent refreshes.
    async fn rotate_tokens(
        &self,
        old_refresh_digest: &str,
        token_digest: String,
        refresh_digest: String,
    ) -> RepositoryResult<Option<User>>;

    /// Cheap liveness probe of the backing store
    async fn ping(&self) -> RepositoryResult<()>;
}

/// PostgreSQL implementation of [`UserRepository`]
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: NewUser) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(data.id)
        .bind(data.name)
        .bind(data.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_token(&self, token_digest: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token = $1"
        ))
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: &str, data: UpdateUser) -> RepositoryResult<Option<User>> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.password.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {USER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(password) = data.password {
            q = q.bind(password);
        }

        let user = q.fetch_optional(&self.pool).await?;

        Ok(user)
    }

    async fn set_tokens(
        &self,
        id: &str,
        token_digest: Option<String>,
        refresh_digest: Option<String>,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET token = $2, refresh_token = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_digest)
        .bind(refresh_digest)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn rotate_tokens(
        &self,
        old_refresh_digest: &str,
        token_digest: String,
        refresh_digest: String,
    ) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET token = $2, refresh_token = $3, updated_at = NOW()
            WHERE refresh_token = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(old_refresh_digest)
        .bind(token_digest)
        .bind(refresh_digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
