//! Ports used by the inventory sync service
//!
//! Adapters live in `vspheredb-infra`; tests use in-memory mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use vspheredb_domain::{ObjectTypeDescriptor, RemoteObject, Result, StoredRecord, VCenter};

use super::reconciler::ChangeSet;

/// Source of remote inventory objects.
#[async_trait]
pub trait PropertyCollector: Send + Sync {
    /// Fetch every object of `object_type` with the given property paths.
    ///
    /// Returns the complete current set. Paths the API has no value for are
    /// omitted from an object's property map.
    async fn collect(&self, object_type: &str, property_set: &[String]) -> Result<Vec<RemoteObject>>;
}

/// Persistence of synchronized inventory records.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Load every stored record of the descriptor's table owned by `vcenter_uuid`.
    ///
    /// Returned records are marked as loaded and carry no modifications.
    async fn load_for_vcenter(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        vcenter_uuid: Uuid,
    ) -> Result<Vec<StoredRecord>>;

    /// Apply a change set atomically.
    ///
    /// Either every insert, update and delete takes effect or none does.
    async fn apply_changes(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        changes: ChangeSet,
    ) -> Result<()>;

    /// Number of stored records of the descriptor's table owned by `vcenter_uuid`.
    async fn count_for_vcenter(
        &self,
        descriptor: &'static ObjectTypeDescriptor,
        vcenter_uuid: Uuid,
    ) -> Result<u64>;
}

/// Persistence of the vCenters being mirrored.
#[async_trait]
pub trait VCenterRepository: Send + Sync {
    /// Insert the vCenter or update its name and API URL.
    ///
    /// Never touches `last_sync_at` of an existing row.
    async fn upsert(&self, vcenter: &VCenter) -> Result<()>;

    async fn find(&self, uuid: Uuid) -> Result<Option<VCenter>>;

    /// Remember when the last complete pass finished.
    async fn record_sync(&self, uuid: Uuid, finished_at: DateTime<Utc>) -> Result<()>;
}
