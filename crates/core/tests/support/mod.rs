//! Shared test helpers for `vspheredb-core` integration tests.
//!
//! In-memory implementations of the sync ports with failure injection, so
//! service tests can focus on behaviour instead of storage details.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use vspheredb_core::{ChangeSet, InventoryStore, PropertyCollector, VCenterRepository};
use vspheredb_domain::{
    ObjectTypeDescriptor, RemoteObject, Result as DomainResult, StoredRecord, VCenter,
    VsphereDbError,
};

/// Property collector answering from a per-type object list.
#[derive(Default)]
pub struct MockPropertyCollector {
    objects: Mutex<HashMap<String, Vec<RemoteObject>>>,
    failing: Mutex<Option<String>>,
    requests: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockPropertyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the objects reported for `object_type`.
    pub fn set_objects(&self, object_type: &str, objects: Vec<RemoteObject>) {
        self.objects.lock().unwrap().insert(object_type.to_string(), objects);
    }

    /// Make every request for `object_type` fail with a network error.
    pub fn fail_for(&self, object_type: &str) {
        *self.failing.lock().unwrap() = Some(object_type.to_string());
    }

    /// Object types requested so far, in order.
    pub fn requested_types(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn requested_paths(&self, object_type: &str) -> Option<Vec<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t == object_type)
            .map(|(_, paths)| paths.clone())
    }
}

#[async_trait]
impl PropertyCollector for MockPropertyCollector {
    async fn collect(
        &self,
        object_type: &str,
        property_set: &[String],
    ) -> DomainResult<Vec<RemoteObject>> {
        self.requests.lock().unwrap().push((object_type.to_string(), property_set.to_vec()));

        if self.failing.lock().unwrap().as_deref() == Some(object_type) {
            return Err(VsphereDbError::Network(format!("collecting {object_type} failed")));
        }

        Ok(self.objects.lock().unwrap().get(object_type).cloned().unwrap_or_default())
    }
}

/// Inventory store keeping rows per table in memory.
///
/// `apply_changes` is all-or-nothing like a database transaction.
#[derive(Default)]
pub struct MemoryInventoryStore {
    tables: Mutex<HashMap<&'static str, BTreeMap<Uuid, StoredRecord>>>,
    fail_writes: AtomicBool,
    applied: AtomicUsize,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of change sets successfully applied.
    pub fn applied_change_sets(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }

    pub fn rows(&self, table: &str) -> Vec<StoredRecord> {
        self.tables.lock().unwrap().get(table).map(|t| t.values().cloned().collect()).unwrap_or_default()
    }

    pub fn row(&self, table: &str, uuid: Uuid) -> Option<StoredRecord> {
        self.tables.lock().unwrap().get(table).and_then(|t| t.get(&uuid).cloned())
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn load_for_vcenter(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        vcenter_uuid: Uuid,
    ) -> DomainResult<Vec<StoredRecord>> {
        Ok(self
            .rows(descriptor.table)
            .into_iter()
            .filter(|r| r.vcenter_uuid() == vcenter_uuid)
            .map(|r| StoredRecord::from_db(r.uuid(), r.vcenter_uuid(), r.values().clone()))
            .collect())
    }

    async fn apply_changes(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        changes: ChangeSet,
    ) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VsphereDbError::Database("disk I/O error".into()));
        }

        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(descriptor.table).or_default();

        for record in changes.inserts {
            if table.contains_key(&record.uuid()) {
                return Err(VsphereDbError::Database("UNIQUE constraint failed".into()));
            }
            table.insert(
                record.uuid(),
                StoredRecord::from_db(record.uuid(), record.vcenter_uuid(), record.values().clone()),
            );
        }
        for record in changes.updates {
            let stored = table
                .get_mut(&record.uuid())
                .ok_or_else(|| VsphereDbError::NotFound(record.uuid().to_string()))?;
            let mut values = stored.values().clone();
            for (column, value) in record.modified_columns() {
                values.insert(column.to_string(), value.clone());
            }
            *stored = StoredRecord::from_db(record.uuid(), record.vcenter_uuid(), values);
        }
        for uuid in changes.deletes {
            table.remove(&uuid);
        }

        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn count_for_vcenter(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        vcenter_uuid: Uuid,
    ) -> DomainResult<u64> {
        Ok(self.rows(descriptor.table).iter().filter(|r| r.vcenter_uuid() == vcenter_uuid).count()
            as u64)
    }
}

/// vCenter repository backed by a map.
#[derive(Default)]
pub struct MemoryVCenterRepository {
    vcenters: Mutex<HashMap<Uuid, VCenter>>,
}

impl MemoryVCenterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uuid: Uuid) -> Option<VCenter> {
        self.vcenters.lock().unwrap().get(&uuid).cloned()
    }
}

#[async_trait]
impl VCenterRepository for MemoryVCenterRepository {
    async fn upsert(&self, vcenter: &VCenter) -> DomainResult<()> {
        let mut vcenters = self.vcenters.lock().unwrap();
        let last_sync_at = vcenters.get(&vcenter.uuid).and_then(|v| v.last_sync_at);
        let mut stored = vcenter.clone();
        stored.last_sync_at = last_sync_at;
        vcenters.insert(vcenter.uuid, stored);
        Ok(())
    }

    async fn find(&self, uuid: Uuid) -> DomainResult<Option<VCenter>> {
        Ok(self.get(uuid))
    }

    async fn record_sync(&self, uuid: Uuid, finished_at: DateTime<Utc>) -> DomainResult<()> {
        let mut vcenters = self.vcenters.lock().unwrap();
        let vcenter =
            vcenters.get_mut(&uuid).ok_or_else(|| VsphereDbError::NotFound(uuid.to_string()))?;
        vcenter.last_sync_at = Some(finished_at);
        Ok(())
    }
}

/// A vCenter with a fixed instance UUID.
pub fn test_vcenter() -> VCenter {
    VCenter::new(
        Uuid::parse_str("0c3c3d2e-6c1a-4b3b-9f43-0e5c6a2f7b10").unwrap(),
        "vc1.example.com",
        "https://vc1.example.com/api",
    )
}
