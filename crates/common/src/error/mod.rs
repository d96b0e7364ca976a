//! Error classification shared across crates
//!
//! Every error type in the workspace that may reach a scheduler or an
//! operator implements [`ErrorClassification`], so callers can decide whether
//! a failed reconciliation pass is worth retrying without matching on
//! concrete variants.

use std::fmt;

/// Severity levels used for logging and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Expected condition, informational only
    Info,
    /// Degraded but operational
    Warning,
    /// Failure requiring attention
    Error,
    /// Data integrity at risk
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Can the failed operation be retried as-is?
    fn is_retryable(&self) -> bool;

    /// How serious is this error?
    fn severity(&self) -> ErrorSeverity;

    /// Does this error require immediate attention?
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}
