/// Database layer for Contactbook
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded migration runner
///
/// Entities are in the `models` module; SQL lives with the repository
/// implementations in `repository`.

pub mod migrations;
pub mod pool;
