//! Storage error types
//!
//! Defines error types for the storage layer, integrating with the common
//! error classification.

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Database pool exhausted")]
    PoolExhausted,

    #[error("Connection timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: i32, found: i32 },

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    R2d2(#[from] r2d2::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorClassification for StorageError {
    /// Retryable errors are pool exhaustion, connection timeouts and
    /// SQLite BUSY/LOCKED conditions.
    fn is_retryable(&self) -> bool {
        match self {
            Self::PoolExhausted | Self::Timeout(_) | Self::Connection(_) => true,
            Self::Rusqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Migration(_) | Self::SchemaVersionMismatch { .. } => ErrorSeverity::Critical,
            Self::PoolExhausted | Self::Timeout(_) => ErrorSeverity::Warning,
            Self::Connection(_)
            | Self::Query(_)
            | Self::InvalidConfig(_)
            | Self::Rusqlite(_)
            | Self::R2d2(_) => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Connection("Failed to connect".to_string());
        assert_eq!(err.to_string(), "Database connection error: Failed to connect");

        let err = StorageError::Timeout(5);
        assert_eq!(err.to_string(), "Connection timeout after 5s");

        let err = StorageError::SchemaVersionMismatch { expected: 2, found: 1 };
        assert_eq!(err.to_string(), "Schema version mismatch: expected 2, found 1");
    }

    #[test]
    fn test_error_retryability() {
        assert!(StorageError::PoolExhausted.is_retryable());
        assert!(StorageError::Timeout(5).is_retryable());
        assert!(!StorageError::InvalidConfig("test".to_string()).is_retryable());
        assert!(!StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows).is_retryable());
    }

    #[test]
    fn test_busy_sqlite_is_retryable() {
        let err = StorageError::Rusqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::DatabaseBusy,
                extended_code: 5,
            },
            None,
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(StorageError::Timeout(5).severity(), ErrorSeverity::Warning);
        assert_eq!(StorageError::Migration("bad".into()).severity(), ErrorSeverity::Critical);
        assert!(StorageError::SchemaVersionMismatch { expected: 2, found: 1 }.is_critical());
        assert!(!StorageError::PoolExhausted.is_critical());
    }
}
