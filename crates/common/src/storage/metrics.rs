//! Storage metrics tracking
//!
//! Lock-free counters for pool and transaction activity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Storage metrics tracker
#[derive(Debug)]
pub struct StorageMetrics {
    /// Number of connections successfully acquired from the pool
    pub connections_acquired: AtomicU64,

    /// Number of connection acquisition timeouts
    pub connections_timeout: AtomicU64,

    /// Number of connection errors
    pub connections_error: AtomicU64,

    /// Total time spent acquiring connections (in milliseconds)
    total_connection_time_ms: AtomicU64,

    /// Number of transactions committed
    pub transactions_committed: AtomicU64,

    /// Number of transactions rolled back, explicitly or on drop
    pub transactions_rolled_back: AtomicU64,

    max_pool_size: u32,
}

impl StorageMetrics {
    /// Create a new metrics tracker
    pub fn new(max_pool_size: u32) -> Self {
        Self {
            connections_acquired: AtomicU64::new(0),
            connections_timeout: AtomicU64::new(0),
            connections_error: AtomicU64::new(0),
            total_connection_time_ms: AtomicU64::new(0),
            transactions_committed: AtomicU64::new(0),
            transactions_rolled_back: AtomicU64::new(0),
            max_pool_size,
        }
    }

    /// Record a successful connection acquisition
    pub fn record_connection_acquired(&self, duration_ms: u64) {
        self.connections_acquired.fetch_add(1, Ordering::Relaxed);
        self.total_connection_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a connection timeout
    pub fn record_connection_timeout(&self) {
        self.connections_timeout.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection error
    pub fn record_connection_error(&self) {
        self.connections_error.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a committed transaction
    pub fn record_commit(&self) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rolled back transaction
    pub fn record_rollback(&self) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average connection acquisition time in milliseconds
    pub fn avg_connection_time_ms(&self) -> u64 {
        let total = self.total_connection_time_ms.load(Ordering::Relaxed);
        let count = self.connections_acquired.load(Ordering::Relaxed);

        if count == 0 {
            0
        } else {
            total / count
        }
    }

    /// Get the maximum pool size
    pub fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }
}
