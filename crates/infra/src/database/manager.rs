//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::params;
use tracing::info;
use vspheredb_common::storage::{SqliteConnection, SqlitePool, SqlitePoolConfig, StorageError};
use vspheredb_domain::{DatabaseConfig, ObjectKind, Result};

use crate::errors::conversions::to_domain;

pub(crate) const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps a [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Create a new manager with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let config = SqlitePoolConfig { max_size: pool_size.max(1), ..SqlitePoolConfig::default() };
        let pool = SqlitePool::new(&path, config).map_err(to_domain)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.config().max_size,
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Manager for the `[database]` config section, with the schema in place.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let manager = Self::new(&config.path, config.pool_size)?;
        manager.run_migrations()?;
        Ok(manager)
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(to_domain)
    }

    /// Ensure the full schema exists on the current database.
    ///
    /// Refuses to touch a database written by a newer schema version, or
    /// one whose inventory tables disagree with the object type descriptors.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn).map_err(to_domain)
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the database is accessible and responding.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0)).map_err(to_domain)?;
        Ok(())
    }
}

fn create_schema(conn: &SqliteConnection) -> std::result::Result<(), StorageError> {
    conn.execute_batch(SCHEMA_SQL)?;

    let found: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", params![], |row| row.get(0))?;
    if let Some(found) = found {
        if found > SCHEMA_VERSION {
            return Err(StorageError::SchemaVersionMismatch { expected: SCHEMA_VERSION, found });
        }
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )?;

    verify_descriptor_columns(conn)
}

/// Every descriptor column must exist with the type its `FieldKind` declares.
fn verify_descriptor_columns(conn: &SqliteConnection) -> std::result::Result<(), StorageError> {
    for kind in ObjectKind::ALL {
        let descriptor = kind.descriptor();
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", descriptor.table))?;
        let declared: Vec<(String, String)> =
            stmt.query_map(params![], |row| Ok((row.get(1)?, row.get(2)?)))?;

        for field in descriptor.fields {
            let expected = field.kind.sql_type();
            match declared.iter().find(|(name, _)| name == field.column) {
                Some((_, actual)) if actual.eq_ignore_ascii_case(expected) => {}
                Some((_, actual)) => {
                    return Err(StorageError::Migration(format!(
                        "{}.{} is declared {actual}, expected {expected}",
                        descriptor.table, field.column
                    )));
                }
                None => {
                    return Err(StorageError::Migration(format!(
                        "{} lacks column {}",
                        descriptor.table, field.column
                    )));
                }
            }
        }
    }
    Ok(())
}
