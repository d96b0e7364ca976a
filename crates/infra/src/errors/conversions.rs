//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use vspheredb_common::storage::StorageError;
use vspheredb_common::{ErrorClassification, ErrorSeverity};
use vspheredb_domain::VsphereDbError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VsphereDbError);

impl From<InfraError> for VsphereDbError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VsphereDbError> for InfraError {
    fn from(value: VsphereDbError) -> Self {
        InfraError(value)
    }
}

trait IntoVsphereDbError {
    fn into_vspheredb(self) -> VsphereDbError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → VsphereDbError */
/* -------------------------------------------------------------------------- */

impl IntoVsphereDbError for SqlError {
    fn into_vspheredb(self) -> VsphereDbError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        VsphereDbError::DatabaseBusy("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        VsphereDbError::DatabaseBusy("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => VsphereDbError::Database(
                        format!("unique constraint violation: {message}"),
                    ),
                    (ErrorCode::ConstraintViolation, 787) => {
                        VsphereDbError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        VsphereDbError::Database(format!("check constraint violation: {message}"))
                    }
                    _ => VsphereDbError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => VsphereDbError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                VsphereDbError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                VsphereDbError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::Utf8Error(_) => {
                VsphereDbError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => VsphereDbError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => VsphereDbError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_vspheredb())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → VsphereDbError */
/* -------------------------------------------------------------------------- */

impl IntoVsphereDbError for StorageError {
    fn into_vspheredb(self) -> VsphereDbError {
        match self {
            StorageError::Rusqlite(err) => err.into_vspheredb(),
            StorageError::InvalidConfig(message) => VsphereDbError::Config(message),
            StorageError::Timeout(secs) => VsphereDbError::DatabaseBusy(format!(
                "timed out after {secs}s waiting for a connection"
            )),
            other if other.is_retryable() => VsphereDbError::DatabaseBusy(other.to_string()),
            other => VsphereDbError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_vspheredb())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VsphereDbError */
/* -------------------------------------------------------------------------- */

impl IntoVsphereDbError for HttpError {
    fn into_vspheredb(self) -> VsphereDbError {
        if self.is_timeout() {
            return VsphereDbError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return VsphereDbError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return VsphereDbError::InvalidInput(format!("unexpected response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => VsphereDbError::Auth(message),
                404 => VsphereDbError::NotFound(message),
                429 => VsphereDbError::Network(message),
                400..=499 => VsphereDbError::InvalidInput(message),
                _ => VsphereDbError::Network(message),
            };
        }

        VsphereDbError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vspheredb())
    }
}

/// Convert any supported infrastructure error straight into the domain error.
pub fn to_domain<E>(err: E) -> VsphereDbError
where
    InfraError: From<E>,
{
    VsphereDbError::from(InfraError::from(err))
}

/* -------------------------------------------------------------------------- */
/* Classification */
/* -------------------------------------------------------------------------- */

impl ErrorClassification for InfraError {
    fn is_retryable(&self) -> bool {
        self.0.is_transient()
    }

    fn severity(&self) -> ErrorSeverity {
        match &self.0 {
            VsphereDbError::Network(_)
            | VsphereDbError::DatabaseBusy(_)
            | VsphereDbError::NotFound(_) => ErrorSeverity::Warning,
            VsphereDbError::Database(_)
            | VsphereDbError::Config(_)
            | VsphereDbError::Auth(_)
            | VsphereDbError::InvalidInput(_) => ErrorSeverity::Error,
            VsphereDbError::Programming(_) | VsphereDbError::Internal(_) => {
                ErrorSeverity::Critical
            }
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
