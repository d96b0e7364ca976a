//! Storage primitives for the inventory database
//!
//! This module provides generic storage infrastructure: an r2d2-backed SQLite
//! pool, a connection wrapper with scoped transactions, and core storage types.

pub mod error;
pub mod metrics;
pub mod sqlite;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use metrics::StorageMetrics;
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig};
pub use types::{HealthStatus, PoolMetrics, Transaction};
