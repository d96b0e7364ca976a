//! Diff of a fetched object set against the stored records of one kind

use std::collections::{HashMap, HashSet};

use uuid::Uuid;
use vspheredb_domain::{
    ObjectTypeDescriptor, RemoteObject, Result, StoredRecord, SyncStats, VCenter,
};

use super::mapper::apply_mapped_properties;

/// Writes needed to bring the stored records of one kind in line with a fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Records that do not exist in the database yet
    pub inserts: Vec<StoredRecord>,
    /// Loaded records with at least one modified column
    pub updates: Vec<StoredRecord>,
    /// Stored records no longer reported by the API
    pub deletes: Vec<Uuid>,
    pub stats: SyncStats,
}

impl ChangeSet {
    /// Whether applying this change set would write anything
    pub fn has_writes(&self) -> bool {
        !(self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty())
    }
}

/// Computes change sets for one vCenter and one object kind.
///
/// Pure: nothing here touches storage, so a mapping error leaves the
/// database exactly as it was.
#[derive(Debug, Clone, Copy)]
pub struct SyncReconciler<'a> {
    vcenter: &'a VCenter,
    descriptor: &'a ObjectTypeDescriptor,
}

impl<'a> SyncReconciler<'a> {
    pub fn new(vcenter: &'a VCenter, descriptor: &'a ObjectTypeDescriptor) -> Self {
        Self { vcenter, descriptor }
    }

    /// Diff `fetched` against `existing`.
    ///
    /// A remote id reported more than once maps to one record built from its
    /// last occurrence. Records are queued for insert if new, for update only
    /// if a column actually changed, and for delete if their UUID was not
    /// fetched.
    pub fn reconcile(
        &self,
        existing: Vec<StoredRecord>,
        fetched: &[RemoteObject],
    ) -> Result<ChangeSet> {
        let existing_order: Vec<Uuid> = existing.iter().map(StoredRecord::uuid).collect();
        let mut records: HashMap<Uuid, StoredRecord> =
            existing.into_iter().map(|record| (record.uuid(), record)).collect();

        // last occurrence of every id, in order of first appearance
        let mut order: Vec<Uuid> = Vec::with_capacity(fetched.len());
        let mut latest: HashMap<Uuid, &RemoteObject> = HashMap::with_capacity(fetched.len());
        for object in fetched {
            let uuid = self.vcenter.make_global_uuid(&object.id);
            if latest.insert(uuid, object).is_none() {
                order.push(uuid);
            }
        }

        let mut changes = ChangeSet::default();
        changes.stats.fetched = fetched.len();

        for uuid in &order {
            let Some(object) = latest.get(uuid) else { continue };
            let mut record = records
                .remove(uuid)
                .unwrap_or_else(|| StoredRecord::new(*uuid, self.vcenter.uuid));

            apply_mapped_properties(&mut record, object, self.vcenter, self.descriptor)?;

            if !record.has_been_loaded_from_db() {
                changes.inserts.push(record);
            } else if record.has_been_modified() {
                changes.updates.push(record);
            }
        }

        let kept: HashSet<&Uuid> = order.iter().collect();
        let mut seen = HashSet::new();
        changes.deletes = existing_order
            .into_iter()
            .filter(|uuid| !kept.contains(uuid) && seen.insert(*uuid))
            .collect();

        changes.stats.created = changes.inserts.len();
        changes.stats.modified = changes.updates.len();
        changes.stats.deleted = changes.deletes.len();

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use vspheredb_domain::{ColumnValue, ObjectKind, VsphereDbError};

    use super::*;

    fn vcenter() -> VCenter {
        VCenter::new(Uuid::new_v4(), "vc1", "https://vc1.example.com")
    }

    fn stored(vc: &VCenter, id: &str, name: &str) -> StoredRecord {
        let mut values = BTreeMap::new();
        values.insert("host_name".to_string(), ColumnValue::Text(name.to_string()));
        StoredRecord::from_db(vc.make_global_uuid(id), vc.uuid, values)
    }

    fn host(id: &str, name: &str) -> RemoteObject {
        RemoteObject::new(id).with_property("name", name)
    }

    #[test]
    fn test_create_modify_delete() {
        let vc = vcenter();
        let reconciler = SyncReconciler::new(&vc, ObjectKind::HostSystem.descriptor());
        let existing = vec![stored(&vc, "host-a", "a"), stored(&vc, "host-b", "b")];
        let fetched = vec![host("host-b", "b-renamed"), host("host-c", "c")];

        let changes = reconciler.reconcile(existing, &fetched).unwrap();

        assert_eq!(changes.stats, SyncStats { created: 1, modified: 1, deleted: 1, fetched: 2 });
        assert_eq!(changes.inserts[0].uuid(), vc.make_global_uuid("host-c"));
        assert_eq!(changes.inserts[0].vcenter_uuid(), vc.uuid);
        assert_eq!(changes.updates[0].uuid(), vc.make_global_uuid("host-b"));
        assert_eq!(changes.deletes, vec![vc.make_global_uuid("host-a")]);
    }

    #[test]
    fn test_unchanged_records_are_not_written() {
        let vc = vcenter();
        let reconciler = SyncReconciler::new(&vc, ObjectKind::HostSystem.descriptor());
        let existing = vec![stored(&vc, "host-a", "a")];

        let changes = reconciler.reconcile(existing, &[host("host-a", "a")]).unwrap();

        assert!(!changes.has_writes());
        assert_eq!(changes.stats, SyncStats { fetched: 1, ..Default::default() });
    }

    #[test]
    fn test_empty_fetch_deletes_everything() {
        let vc = vcenter();
        let reconciler = SyncReconciler::new(&vc, ObjectKind::HostSystem.descriptor());
        let existing = vec![stored(&vc, "host-a", "a"), stored(&vc, "host-b", "b")];

        let changes = reconciler.reconcile(existing, &[]).unwrap();

        assert_eq!(changes.stats.deleted, 2);
        assert!(changes.inserts.is_empty());
        assert!(changes.updates.is_empty());
    }

    #[test]
    fn test_duplicate_ids_last_occurrence_wins() {
        let vc = vcenter();
        let reconciler = SyncReconciler::new(&vc, ObjectKind::HostSystem.descriptor());
        let fetched = vec![host("host-a", "first"), host("host-b", "b"), host("host-a", "second")];

        let changes = reconciler.reconcile(Vec::new(), &fetched).unwrap();

        assert_eq!(changes.stats.created, 2);
        assert_eq!(changes.stats.fetched, 3);
        assert_eq!(changes.inserts[0].uuid(), vc.make_global_uuid("host-a"));
        assert_eq!(changes.inserts[0].get("host_name"), &ColumnValue::Text("second".into()));
    }

    #[test]
    fn test_mapping_error_aborts() {
        let vc = vcenter();
        let reconciler = SyncReconciler::new(&vc, ObjectKind::HostSystem.descriptor());
        let fetched = vec![
            host("host-a", "a"),
            RemoteObject::new("host-b").with_property("runtime.inMaintenanceMode", "no"),
        ];

        let result = reconciler.reconcile(vec![stored(&vc, "host-z", "z")], &fetched);
        assert!(matches!(result, Err(VsphereDbError::Programming(_))));
    }

    #[test]
    fn test_records_of_other_vcenters_are_unrelated() {
        let vc = vcenter();
        let other = vcenter();
        let reconciler = SyncReconciler::new(&vc, ObjectKind::HostSystem.descriptor());

        let changes = reconciler.reconcile(Vec::new(), &[host("host-a", "a")]).unwrap();
        assert_ne!(changes.inserts[0].uuid(), other.make_global_uuid("host-a"));
    }
}
