/// Persistence ports and their implementations
///
/// Each entity gets a narrow async trait. Use cases hold the traits as
/// `Arc<dyn ...>` so the same business logic runs against PostgreSQL in
/// production and against [`MemoryStore`] in tests.
///
/// # Implementations
///
/// - [`PgUserRepository`], [`PgContactRepository`], [`PgAddressRepository`]:
///   sqlx over a shared `PgPool`
/// - [`MemoryStore`]: all three traits over in-process maps
///
/// # Example
///
/// ```no_run
/// use contactbook_shared::repository::Repositories;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) {
/// let repos = Repositories::postgres(pool);
/// let user = repos.users.find_by_id("jane").await;
/// # }
/// ```

pub mod address;
pub mod contact;
pub mod memory;
pub mod user;

use sqlx::PgPool;
use std::sync::Arc;

pub use address::{AddressRepository, PgAddressRepository};
pub use contact::{ContactRepository, PgContactRepository};
pub use memory::MemoryStore;
pub use user::{PgUserRepository, UserRepository};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return RepositoryError::Conflict(constraint);
            }
        }

        RepositoryError::Database(err)
    }
}

/// The full set of repositories a server needs
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub addresses: Arc<dyn AddressRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            contacts: Arc::new(PgContactRepository::new(pool.clone())),
            addresses: Arc::new(PgAddressRepository::new(pool)),
        }
    }

    /// Repositories backed by a fresh, empty [`MemoryStore`]
    pub fn memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Repositories backed by an existing [`MemoryStore`]
    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            contacts: store.clone(),
            addresses: store,
        }
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside a
/// `LIKE`/`ILIKE` pattern, then wraps it for substring matching.
pub(crate) fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
