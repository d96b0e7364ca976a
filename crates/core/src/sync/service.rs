//! Inventory sync service - drives reconciliation passes

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use vspheredb_domain::{
    InventorySummary, KindCount, ObjectKind, Result, SyncReport, SyncStats, VCenter,
};

use super::ports::{InventoryStore, PropertyCollector, VCenterRepository};
use super::reconciler::SyncReconciler;

/// Inventory sync service
///
/// Runs one strictly sequential pass per call: every step is awaited before
/// the next one starts and object kinds never overlap.
pub struct InventorySyncService {
    vcenter: VCenter,
    collector: Arc<dyn PropertyCollector>,
    store: Arc<dyn InventoryStore>,
    vcenters: Arc<dyn VCenterRepository>,
    kinds: Vec<ObjectKind>,
}

impl InventorySyncService {
    /// Create a service covering every object kind
    pub fn new(
        vcenter: VCenter,
        collector: Arc<dyn PropertyCollector>,
        store: Arc<dyn InventoryStore>,
        vcenters: Arc<dyn VCenterRepository>,
    ) -> Self {
        Self { vcenter, collector, store, vcenters, kinds: ObjectKind::ALL.to_vec() }
    }

    /// Restrict full passes to the given kinds
    ///
    /// Kinds still run in the fixed `Datastore`, `HostSystem`,
    /// `VirtualMachine` order regardless of the order given here.
    pub fn with_kinds(mut self, kinds: &[ObjectKind]) -> Self {
        self.kinds = ObjectKind::ALL.into_iter().filter(|k| kinds.contains(k)).collect();
        self
    }

    pub fn vcenter(&self) -> &VCenter {
        &self.vcenter
    }

    pub fn kinds(&self) -> &[ObjectKind] {
        &self.kinds
    }

    /// Make sure the owning vCenter row exists
    pub async fn register_vcenter(&self) -> Result<()> {
        self.vcenters.upsert(&self.vcenter).await
    }

    /// Reconcile one object kind
    ///
    /// Fetch failures and mapping errors leave the database untouched; a
    /// failed write is rolled back by the store. The owning vCenter must
    /// already be registered.
    #[instrument(skip(self), fields(vcenter = %self.vcenter.name))]
    pub async fn sync_object_type(&self, kind: ObjectKind) -> Result<SyncStats> {
        let descriptor = kind.descriptor();

        debug!("Loading existing {kind} from DB");
        let existing = self.store.load_for_vcenter(descriptor, self.vcenter.uuid).await?;
        debug!("Got {} existing {kind}", existing.len());

        let fetched = self.collector.collect(kind.name(), &descriptor.property_set()).await?;
        debug!("Got {} {kind} from vCenter", fetched.len());

        let changes = SyncReconciler::new(&self.vcenter, descriptor).reconcile(existing, &fetched)?;
        let stats = changes.stats;

        if changes.has_writes() {
            debug!("Ready to store {kind}");
            self.store.apply_changes(descriptor, changes).await?;
        }

        info!(
            "{kind}: {} new, {} modified, {} deleted (got {} from API)",
            stats.created, stats.modified, stats.deleted, stats.fetched
        );

        Ok(stats)
    }

    /// Reconcile every configured kind, stopping at the first failure
    ///
    /// On success the vCenter's last sync time is recorded.
    #[instrument(skip(self), fields(vcenter = %self.vcenter.name))]
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let started_at = Utc::now();
        self.register_vcenter().await?;

        let mut kinds = Vec::with_capacity(self.kinds.len());
        for kind in &self.kinds {
            match self.sync_object_type(*kind).await {
                Ok(stats) => kinds.push((*kind, stats)),
                Err(err) => {
                    warn!(error = %err, "Sync of {kind} failed, stopping pass");
                    return Err(err);
                }
            }
        }

        let finished_at = Utc::now();
        self.vcenters.record_sync(self.vcenter.uuid, finished_at).await?;

        let report = SyncReport { started_at, finished_at, kinds };
        let totals = report.totals();
        info!(
            created = totals.created,
            modified = totals.modified,
            deleted = totals.deleted,
            fetched = totals.fetched,
            "Sync pass completed"
        );

        Ok(report)
    }

    /// Stored record counts per kind plus the last completed pass
    pub async fn summary(&self) -> Result<InventorySummary> {
        let stored = self.vcenters.find(self.vcenter.uuid).await?;
        let last_sync_at = stored.and_then(|vc| vc.last_sync_at);

        let mut counts = Vec::with_capacity(ObjectKind::ALL.len());
        for kind in ObjectKind::ALL {
            let count = self.store.count_for_vcenter(kind.descriptor(), self.vcenter.uuid).await?;
            counts.push(KindCount { kind, count });
        }

        Ok(InventorySummary {
            vcenter_name: self.vcenter.name.clone(),
            vcenter_uuid_hex: self.vcenter.hex_uuid(),
            last_sync_at,
            counts,
        })
    }
}
