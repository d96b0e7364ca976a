//! # vspheredb Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - SQLite database manager, schema and repositories
//! - HTTP client and the property collector adapter
//! - Configuration loading
//! - Conversions from infrastructure errors into domain errors
//!
//! ## Architecture
//! - Implements traits defined in `vspheredb-core`
//! - Contains all "impure" code (I/O)

pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::HttpPropertyCollector;
pub use database::{DbManager, SqliteInventoryRepository, SqliteVCenterRepository};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
