//! # Contactbook API Server Library
//!
//! HTTP delivery for the Contactbook use cases.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, token auth layer
//! - `config`: Layered configuration (defaults, `config.json`, environment)
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with the standard envelope
//! - `response`: The `{data, errors, paging}` envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
