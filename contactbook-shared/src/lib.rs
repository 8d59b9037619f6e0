//! # Contactbook Shared Library
//!
//! Domain code behind the Contactbook API server: everything except HTTP.
//!
//! ## Module Organization
//!
//! - `models`: Entities (users, contacts, addresses) and paging types
//! - `repository`: Persistence traits with PostgreSQL and in-memory implementations
//! - `auth`: Password hashing, opaque tokens, token authenticator
//! - `usecase`: Validated business operations and response shapes
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod usecase;

/// Current version of the Contactbook shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
