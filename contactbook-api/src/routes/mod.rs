/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, sessions and profile
/// - `contacts`: Contact CRUD and paged search
/// - `addresses`: Address CRUD under a contact

pub mod addresses;
pub mod contacts;
pub mod health;
pub mod users;
