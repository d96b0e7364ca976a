#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;
use vspheredb_domain::VCenter;
use vspheredb_infra::database::DbManager;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a migrated temporary database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("inventory.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Row count of `table`, regardless of owner.
    pub fn count_rows(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), &[], |row| row.get(0))
            .expect("count query should succeed")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_vcenter() -> VCenter {
    VCenter::new(
        Uuid::parse_str("0c3c3d2e-6c1a-4b3b-9f43-0e5c6a2f7b10").expect("valid uuid"),
        "vc1.example.com",
        "https://vc1.example.com/api",
    )
}
