//! # vspheredb Domain
//!
//! Inventory domain types for the vSphere mirror.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Remote objects, managed object references and property values
//! - Object kinds with their field descriptors
//! - Stored records and sync statistics
//!
//! ## Architecture
//! - No dependencies on other vspheredb crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
