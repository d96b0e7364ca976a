//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling for the inventory database.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::metrics::StorageMetrics;
use crate::storage::types::{HealthStatus, PoolMetrics};

/// SQLite connection pool
///
/// Every pooled connection gets the configured pragmas applied on creation.
/// Schema management is left to the caller.
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
    metrics: Arc<StorageMetrics>,
}

impl SqlitePool {
    /// Create a new SQLite connection pool
    ///
    /// # Errors
    /// Returns an error if the database file can't be opened or the pool
    /// can't hand out a first connection.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        let metrics = Arc::new(StorageMetrics::new(config.max_size));

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {}", e))
            })?;

        {
            let _conn = pool.get().map_err(|e| {
                warn!("Failed to get test connection: {}", e);
                StorageError::Connection(format!("Failed to get test connection: {}", e))
            })?;
        }

        info!("SQLite pool created with {} connections", config.max_size);

        Ok(Self { pool, config, metrics })
    }

    /// Get a connection from the pool
    #[instrument(skip(self), fields(pool_size = self.config.max_size))]
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.metrics.record_connection_acquired(duration_ms);
                debug!("Connection acquired in {}ms", duration_ms);

                Ok(SqliteConnection::new(conn).with_metrics(Arc::clone(&self.metrics)))
            }
            Err(e) => {
                let err_str = e.to_string().to_lowercase();

                if err_str.contains("timed out") || err_str.contains("timeout") {
                    self.metrics.record_connection_timeout();
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    self.metrics.record_connection_error();
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {}", e)))
                }
            }
        }
    }

    /// Check that the pool can hand out a connection
    pub fn health_check(&self) -> HealthStatus {
        let state = self.pool.state();

        match self.pool.get() {
            Ok(_conn) => HealthStatus::healthy(
                state.connections as usize,
                state.idle_connections as usize,
                self.config.max_size as usize,
            ),
            Err(e) => HealthStatus::unhealthy(format!("Pool unhealthy: {}", e)),
        }
    }

    /// Snapshot of the pool counters
    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            connections_acquired: self.metrics.connections_acquired.load(Ordering::Relaxed),
            connections_timeout: self.metrics.connections_timeout.load(Ordering::Relaxed),
            connections_error: self.metrics.connections_error.load(Ordering::Relaxed),
            avg_acquisition_time_ms: self.metrics.avg_connection_time_ms(),
            transactions_committed: self.metrics.transactions_committed.load(Ordering::Relaxed),
            transactions_rolled_back: self.metrics.transactions_rolled_back.load(Ordering::Relaxed),
        }
    }

    /// Pool configuration
    pub fn config(&self) -> &SqlitePoolConfig {
        &self.config
    }
}
