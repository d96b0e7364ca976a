//! SQLite-backed inventory repository.
//!
//! Implements `InventoryStore` for every object kind. Table and column names
//! come from the static object type descriptors; values are always bound as
//! parameters. All database operations run in `spawn_blocking`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, params_from_iter};
use rusqlite::types::Value;
use tokio::task;
use tracing::debug;
use uuid::Uuid;
use vspheredb_common::storage::{SqliteConnection, Transaction};
use vspheredb_core::{ChangeSet, InventoryStore};
use vspheredb_domain::{
    ObjectTypeDescriptor, Result as DomainResult, StoredRecord, VsphereDbError,
};

use super::manager::DbManager;
use super::map_join_error;
use super::values::{from_sql, to_sql, uuid_from_sql, uuid_to_sql};
use crate::errors::conversions::to_domain;

/// Stays below the historical SQLite bound of 999 host parameters.
const DELETE_BATCH_SIZE: usize = 500;

/// SQLite-backed store for synchronized inventory records.
pub struct SqliteInventoryRepository {
    db: Arc<DbManager>,
}

impl SqliteInventoryRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryRepository {
    async fn load_for_vcenter(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        vcenter_uuid: Uuid,
    ) -> DomainResult<Vec<StoredRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<StoredRecord>> {
            let conn = db.get_connection()?;
            query_records(&conn, descriptor, vcenter_uuid)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn apply_changes(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        changes: ChangeSet,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(to_domain)?;

            // the transaction rolls back on drop if any step fails
            for record in &changes.inserts {
                insert_record(&tx, descriptor, record)?;
            }
            for record in &changes.updates {
                update_record(&tx, descriptor, record)?;
            }
            delete_records(&tx, descriptor, &changes.deletes, DELETE_BATCH_SIZE)?;

            tx.commit().map_err(to_domain)?;
            debug!(
                table = descriptor.table,
                inserted = changes.inserts.len(),
                updated = changes.updates.len(),
                deleted = changes.deletes.len(),
                "change set committed"
            );
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_for_vcenter(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        vcenter_uuid: Uuid,
    ) -> DomainResult<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<u64> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT COUNT(*) FROM {} WHERE vcenter_uuid = ?1", descriptor.table);
            let count: i64 = conn
                .query_row(&sql, params![uuid_to_sql(&vcenter_uuid)], |row| row.get(0))
                .map_err(to_domain)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn query_records(
    conn: &SqliteConnection,
    descriptor: &ObjectTypeDescriptor,
    vcenter_uuid: Uuid,
) -> DomainResult<Vec<StoredRecord>> {
    let columns: Vec<&str> = descriptor.columns().collect();
    let mut select = vec!["uuid", "vcenter_uuid"];
    select.extend(&columns);
    let sql = format!(
        "SELECT {} FROM {} WHERE vcenter_uuid = ?1",
        select.join(", "),
        descriptor.table
    );

    let mut stmt = conn.inner().prepare(&sql).map_err(to_domain)?;
    let mut rows = stmt.query([uuid_to_sql(&vcenter_uuid)]).map_err(to_domain)?;

    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(to_domain)? {
        let uuid = uuid_from_sql(row.get_ref(0).map_err(to_domain)?)?;
        let owner = uuid_from_sql(row.get_ref(1).map_err(to_domain)?)?;

        let mut values = BTreeMap::new();
        for (offset, field) in descriptor.fields.iter().enumerate() {
            let raw = row.get_ref(offset + 2).map_err(to_domain)?;
            values.insert(field.column.to_string(), from_sql(field.kind, raw)?);
        }

        records.push(StoredRecord::from_db(uuid, owner, values));
    }

    Ok(records)
}

fn insert_record(
    tx: &Transaction<'_>,
    descriptor: &ObjectTypeDescriptor,
    record: &StoredRecord,
) -> DomainResult<()> {
    let mut columns = vec!["uuid", "vcenter_uuid"];
    let mut params = vec![uuid_to_sql(&record.uuid()), uuid_to_sql(&record.vcenter_uuid())];
    for (column, value) in record.values() {
        columns.push(known_column(descriptor, column)?);
        params.push(to_sql(value));
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        descriptor.table,
        columns.join(", ")
    );

    tx.execute_cached(&sql, params_from_iter(params)).map_err(to_domain)?;
    Ok(())
}

/// Writes the modified columns only.
fn update_record(
    tx: &Transaction<'_>,
    descriptor: &ObjectTypeDescriptor,
    record: &StoredRecord,
) -> DomainResult<()> {
    let mut assignments = Vec::new();
    let mut params: Vec<Value> = Vec::new();
    for (column, value) in record.modified_columns() {
        assignments.push(format!("{} = ?", known_column(descriptor, column)?));
        params.push(to_sql(value));
    }
    if assignments.is_empty() {
        return Ok(());
    }
    params.push(uuid_to_sql(&record.uuid()));

    let sql =
        format!("UPDATE {} SET {} WHERE uuid = ?", descriptor.table, assignments.join(", "));

    let changed = tx.execute_cached(&sql, params_from_iter(params)).map_err(to_domain)?;
    if changed == 0 {
        return Err(VsphereDbError::NotFound(format!(
            "{} record {} vanished during sync",
            descriptor.kind,
            record.uuid()
        )));
    }
    Ok(())
}

/// One `DELETE ... WHERE uuid IN (...)` per `chunk` UUIDs.
fn delete_records(
    tx: &Transaction<'_>,
    descriptor: &ObjectTypeDescriptor,
    uuids: &[Uuid],
    chunk: usize,
) -> DomainResult<()> {
    for batch in uuids.chunks(chunk.max(1)) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let sql = format!("DELETE FROM {} WHERE uuid IN ({placeholders})", descriptor.table);
        tx.execute_cached(&sql, params_from_iter(batch.iter().map(uuid_to_sql)))
            .map_err(to_domain)?;
    }
    Ok(())
}

fn known_column<'a>(descriptor: &ObjectTypeDescriptor, column: &'a str) -> DomainResult<&'a str> {
    if descriptor.field_for_column(column).is_some() {
        Ok(column)
    } else {
        Err(VsphereDbError::InvalidInput(format!(
            "{} has no column {column}",
            descriptor.table
        )))
    }
}
