//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for vspheredb
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum VsphereDbError {
    /// Permanent storage failure: constraint violations, schema drift,
    /// undecodable column values.
    #[error("Database error: {0}")]
    Database(String),

    /// Lock contention or an exhausted connection pool.
    #[error("Database busy: {0}")]
    DatabaseBusy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A value did not have the shape its field declaration promises.
    /// Not recoverable by retrying.
    #[error("Programming error: {0}")]
    Programming(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VsphereDbError {
    /// Whether a later attempt of the same pass could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::DatabaseBusy(_))
    }
}

/// Result type alias for vspheredb operations
pub type Result<T> = std::result::Result<T, VsphereDbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = VsphereDbError::Programming("Boolean expected, got \"yes\"".into());
        assert_eq!(err.to_string(), "Programming error: Boolean expected, got \"yes\"");
    }

    #[test]
    fn test_serializes_tagged() {
        let err = VsphereDbError::NotFound("vCenter".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"type": "NotFound", "message": "vCenter"}));
    }

    #[test]
    fn test_transient_errors() {
        assert!(VsphereDbError::Network("reset".into()).is_transient());
        assert!(!VsphereDbError::Programming("bad".into()).is_transient());
        assert!(!VsphereDbError::Auth("denied".into()).is_transient());
        assert!(VsphereDbError::DatabaseBusy("database is locked".into()).is_transient());
        assert!(!VsphereDbError::Database("CHECK constraint failed".into()).is_transient());
    }
}
