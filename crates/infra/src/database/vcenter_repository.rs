//! SQLite-backed vCenter repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use uuid::Uuid;
use vspheredb_core::VCenterRepository;
use vspheredb_domain::{Result as DomainResult, VCenter, VsphereDbError};

use super::manager::DbManager;
use super::map_join_error;
use super::values::{uuid_from_sql, uuid_to_sql};
use crate::errors::conversions::to_domain;

/// Stores the vCenter owner rows that inventory tables reference.
pub struct SqliteVCenterRepository {
    db: Arc<DbManager>,
}

impl SqliteVCenterRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VCenterRepository for SqliteVCenterRepository {
    async fn upsert(&self, vcenter: &VCenter) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let vcenter = vcenter.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO vcenter (uuid, name, api_url, last_sync_at) VALUES (?1, ?2, ?3, NULL)
                 ON CONFLICT(uuid) DO UPDATE SET name = excluded.name, api_url = excluded.api_url",
                params![uuid_to_sql(&vcenter.uuid), vcenter.name, vcenter.api_url],
            )
            .map_err(to_domain)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find(&self, uuid: Uuid) -> DomainResult<Option<VCenter>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<VCenter>> {
            let conn = db.get_connection()?;
            let row = conn
                .inner()
                .query_row(
                    "SELECT uuid, name, api_url, last_sync_at FROM vcenter WHERE uuid = ?1",
                    params![uuid_to_sql(&uuid)],
                    |row| {
                        Ok((
                            row.get::<_, Vec<u8>>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<i64>>(3)?,
                        ))
                    },
                )
                .optional()
                .map_err(to_domain)?;

            let Some((raw_uuid, name, api_url, last_sync_ms)) = row else {
                return Ok(None);
            };

            let uuid = uuid_from_sql(rusqlite::types::ValueRef::Blob(&raw_uuid))?;
            let mut vcenter = VCenter::new(uuid, name, api_url);
            vcenter.last_sync_at = last_sync_ms.map(millis_to_datetime).transpose()?;
            Ok(Some(vcenter))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn record_sync(&self, uuid: Uuid, finished_at: DateTime<Utc>) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE vcenter SET last_sync_at = ?1 WHERE uuid = ?2",
                    params![finished_at.timestamp_millis(), uuid_to_sql(&uuid)],
                )
                .map_err(to_domain)?;

            if updated == 0 {
                return Err(VsphereDbError::NotFound(format!("vCenter {} is not registered", uuid.simple())));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn millis_to_datetime(millis: i64) -> DomainResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| VsphereDbError::Database(format!("invalid last_sync_at value {millis}")))
}
