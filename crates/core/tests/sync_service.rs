//! Integration tests for `InventorySyncService` against in-memory ports.

mod support;

use std::sync::Arc;

use support::{test_vcenter, MemoryInventoryStore, MemoryVCenterRepository, MockPropertyCollector};
use vspheredb_core::InventorySyncService;
use vspheredb_domain::{
    ColumnValue, ManagedObjectReference, ObjectKind, RemoteObject, SyncStats, VsphereDbError,
};

struct Harness {
    collector: Arc<MockPropertyCollector>,
    store: Arc<MemoryInventoryStore>,
    vcenters: Arc<MemoryVCenterRepository>,
    service: InventorySyncService,
}

fn harness() -> Harness {
    let collector = Arc::new(MockPropertyCollector::new());
    let store = Arc::new(MemoryInventoryStore::new());
    let vcenters = Arc::new(MemoryVCenterRepository::new());
    let service =
        InventorySyncService::new(test_vcenter(), collector.clone(), store.clone(), vcenters.clone());
    Harness { collector, store, vcenters, service }
}

fn vm(id: &str, name: &str, host: &str) -> RemoteObject {
    RemoteObject::new(id)
        .with_property("name", name)
        .with_property("parent", ManagedObjectReference::new("Folder", "group-v3"))
        .with_property("runtime.host", ManagedObjectReference::new("HostSystem", host))
        .with_property("config.template", false)
        .with_property("config.hardware.numCPU", 2_i64)
        .with_property("runtime.powerState", "poweredOn")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_first_pass_creates_one_record_per_object() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.set_objects(
        "VirtualMachine",
        vec![vm("vm-1", "web01", "host-1"), vm("vm-2", "web02", "host-1")],
    );

    let stats = h.service.sync_object_type(ObjectKind::VirtualMachine).await.unwrap();

    assert_eq!(stats, SyncStats { created: 2, modified: 0, deleted: 0, fetched: 2 });
    let vc = test_vcenter();
    let row = h.store.row("virtual_machine", vc.make_global_uuid("vm-1")).unwrap();
    assert_eq!(row.vcenter_uuid(), vc.uuid);
    assert_eq!(row.get("object_name"), &ColumnValue::Text("web01".into()));
    assert_eq!(row.get("runtime_host_uuid"), &ColumnValue::Uuid(vc.make_global_uuid("host-1")));
    assert_eq!(row.get("parent_uuid"), &ColumnValue::Uuid(vc.make_global_uuid("group-v3")));
    assert_eq!(row.get("template"), &ColumnValue::Flag(false));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_identical_pass_changes_nothing() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.set_objects("VirtualMachine", vec![vm("vm-1", "web01", "host-1")]);

    h.service.sync_object_type(ObjectKind::VirtualMachine).await.unwrap();
    let stats = h.service.sync_object_type(ObjectKind::VirtualMachine).await.unwrap();

    assert_eq!(stats, SyncStats { fetched: 1, ..Default::default() });
    assert_eq!(h.store.applied_change_sets(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_changed_and_vanished_objects() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.set_objects(
        "VirtualMachine",
        vec![vm("vm-a", "a", "host-1"), vm("vm-b", "b", "host-1")],
    );
    h.service.sync_object_type(ObjectKind::VirtualMachine).await.unwrap();

    h.collector.set_objects(
        "VirtualMachine",
        vec![vm("vm-b", "b", "host-2"), vm("vm-c", "c", "host-1")],
    );
    let stats = h.service.sync_object_type(ObjectKind::VirtualMachine).await.unwrap();

    assert_eq!(stats, SyncStats { created: 1, modified: 1, deleted: 1, fetched: 2 });
    let vc = test_vcenter();
    assert!(h.store.row("virtual_machine", vc.make_global_uuid("vm-a")).is_none());
    let b = h.store.row("virtual_machine", vc.make_global_uuid("vm-b")).unwrap();
    assert_eq!(b.get("runtime_host_uuid"), &ColumnValue::Uuid(vc.make_global_uuid("host-2")));
    assert_eq!(b.get("object_name"), &ColumnValue::Text("b".into()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_fetch_deletes_all_records() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.set_objects("HostSystem", vec![RemoteObject::new("host-1"), RemoteObject::new("host-2")]);
    h.service.sync_object_type(ObjectKind::HostSystem).await.unwrap();

    h.collector.set_objects("HostSystem", Vec::new());
    let stats = h.service.sync_object_type(ObjectKind::HostSystem).await.unwrap();

    assert_eq!(stats.deleted, 2);
    assert!(h.store.rows("host_system").is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_failure_writes_nothing() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.fail_for("Datastore");

    let result = h.service.sync_object_type(ObjectKind::Datastore).await;

    assert!(matches!(result, Err(VsphereDbError::Network(_))));
    assert_eq!(h.store.applied_change_sets(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_failure_keeps_previous_state() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.set_objects("VirtualMachine", vec![vm("vm-1", "web01", "host-1")]);
    h.service.sync_object_type(ObjectKind::VirtualMachine).await.unwrap();

    h.store.fail_writes(true);
    h.collector.set_objects("VirtualMachine", vec![vm("vm-2", "web02", "host-1")]);
    let result = h.service.sync_object_type(ObjectKind::VirtualMachine).await;

    assert!(matches!(result, Err(VsphereDbError::Database(_))));
    let rows = h.store.rows("virtual_machine");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uuid(), test_vcenter().make_global_uuid("vm-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_boolean_aborts_before_writing() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();
    h.collector.set_objects(
        "VirtualMachine",
        vec![vm("vm-1", "web01", "host-1"), vm("vm-2", "web02", "host-1").with_property("config.template", "maybe")],
    );

    let result = h.service.sync_object_type(ObjectKind::VirtualMachine).await;

    assert!(matches!(result, Err(VsphereDbError::Programming(_))));
    assert!(h.store.rows("virtual_machine").is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_all_runs_kinds_in_fixed_order_and_records_time() {
    let h = harness();
    let service = h.service.with_kinds(&[ObjectKind::VirtualMachine, ObjectKind::Datastore]);
    h.collector.set_objects("Datastore", vec![RemoteObject::new("datastore-1")]);
    h.collector.set_objects("VirtualMachine", vec![vm("vm-1", "web01", "host-1")]);

    let report = service.sync_all().await.unwrap();

    assert_eq!(h.collector.requested_types(), vec!["Datastore", "VirtualMachine"]);
    assert_eq!(report.kinds.len(), 2);
    assert_eq!(report.totals().created, 2);
    let stored = h.vcenters.get(test_vcenter().uuid).unwrap();
    assert_eq!(stored.last_sync_at, Some(report.finished_at));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_all_stops_at_first_failure() {
    let h = harness();
    h.collector.fail_for("HostSystem");

    let result = h.service.sync_all().await;

    assert!(result.is_err());
    assert_eq!(h.collector.requested_types(), vec!["Datastore", "HostSystem"]);
    assert_eq!(h.vcenters.get(test_vcenter().uuid).unwrap().last_sync_at, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collector_receives_descriptor_property_set() {
    let h = harness();
    h.service.register_vcenter().await.unwrap();

    h.service.sync_object_type(ObjectKind::HostSystem).await.unwrap();

    let paths = h.collector.requested_paths("HostSystem").unwrap();
    assert_eq!(paths, ObjectKind::HostSystem.descriptor().property_set());
    assert!(paths.contains(&"parent".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_summary_counts_records_per_kind() {
    let h = harness();
    h.collector.set_objects("VirtualMachine", vec![vm("vm-1", "a", "host-1"), vm("vm-2", "b", "host-1")]);
    h.collector.set_objects("HostSystem", vec![RemoteObject::new("host-1")]);
    h.service.sync_all().await.unwrap();

    let summary = h.service.summary().await.unwrap();

    assert_eq!(summary.vcenter_name, "vc1.example.com");
    assert_eq!(summary.vcenter_uuid_hex, "0c3c3d2e6c1a4b3b9f430e5c6a2f7b10");
    assert!(summary.last_sync_at.is_some());
    assert_eq!(summary.total(), 3);
    let vms = summary.counts.iter().find(|c| c.kind == ObjectKind::VirtualMachine).unwrap();
    assert_eq!(vms.count, 2);
}
