//! Core storage types

use std::sync::Arc;

use rusqlite::{Params, ToSql, Transaction as RusqliteTransaction};

use super::error::{StorageError, StorageResult};
use super::metrics::StorageMetrics;

/// Transaction wrapper
///
/// Transactions automatically rollback on drop unless committed.
pub struct Transaction<'conn> {
    inner: Option<RusqliteTransaction<'conn>>,
    metrics: Option<Arc<StorageMetrics>>,
}

impl<'conn> Transaction<'conn> {
    /// Create a new transaction wrapper
    pub fn new(transaction: RusqliteTransaction<'conn>) -> Self {
        Self { inner: Some(transaction), metrics: None }
    }

    /// Attach pool metrics so commits and rollbacks are counted
    pub fn with_metrics(mut self, metrics: Arc<StorageMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Commit the transaction
    pub fn commit(mut self) -> StorageResult<()> {
        let tx = self.take()?;
        tx.commit().map_err(StorageError::from)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_commit();
        }
        Ok(())
    }

    /// Rollback the transaction
    pub fn rollback(mut self) -> StorageResult<()> {
        let tx = self.take()?;
        tx.rollback().map_err(StorageError::from)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_rollback();
        }
        Ok(())
    }

    /// Execute a statement within the transaction
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        match self.inner {
            Some(ref tx) => tx.execute(sql, params).map_err(StorageError::from),
            None => Err(consumed()),
        }
    }

    /// Execute a cached prepared statement within the transaction
    ///
    /// Repeated statements with identical SQL reuse the compiled statement.
    pub fn execute_cached<P: Params>(&self, sql: &str, params: P) -> StorageResult<usize> {
        match self.inner {
            Some(ref tx) => {
                let mut stmt = tx.prepare_cached(sql).map_err(StorageError::from)?;
                stmt.execute(params).map_err(StorageError::from)
            }
            None => Err(consumed()),
        }
    }

    fn take(&mut self) -> StorageResult<RusqliteTransaction<'conn>> {
        self.inner.take().ok_or_else(consumed)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.inner.take() {
            // Auto-rollback on drop
            let _ = tx.rollback();
            if let Some(metrics) = &self.metrics {
                metrics.record_rollback();
            }
        }
    }
}

fn consumed() -> StorageError {
    StorageError::Query("Transaction already consumed".to_string())
}

/// Health status of the storage system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub healthy: bool,

    /// Number of open connections
    pub active_connections: usize,

    /// Number of idle connections
    pub idle_connections: usize,

    /// Maximum pool size
    pub max_connections: usize,

    /// Optional error message if unhealthy
    pub message: Option<String>,
}

impl HealthStatus {
    /// Create a healthy status
    pub fn healthy(active: usize, idle: usize, max: usize) -> Self {
        Self {
            healthy: true,
            active_connections: active,
            idle_connections: idle,
            max_connections: max,
            message: None,
        }
    }

    /// Create an unhealthy status
    pub fn unhealthy(message: String) -> Self {
        Self {
            healthy: false,
            active_connections: 0,
            idle_connections: 0,
            max_connections: 0,
            message: Some(message),
        }
    }
}

/// Connection pool metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolMetrics {
    /// Total connections acquired
    pub connections_acquired: u64,

    /// Total connection timeouts
    pub connections_timeout: u64,

    /// Total connection errors
    pub connections_error: u64,

    /// Average connection acquisition time (milliseconds)
    pub avg_acquisition_time_ms: u64,

    /// Total committed transactions
    pub transactions_committed: u64,

    /// Total rolled back transactions
    pub transactions_rolled_back: u64,
}
