//! Domain types and models

pub mod descriptor;
pub mod kind;
pub mod moref;
pub mod record;
pub mod remote;
pub mod stats;
pub mod vcenter;

pub use descriptor::{FieldDescriptor, FieldKind, ObjectTypeDescriptor};
pub use kind::ObjectKind;
pub use moref::ManagedObjectReference;
pub use record::{ColumnValue, StoredRecord};
pub use remote::{PropertyValue, RemoteObject};
pub use stats::{InventorySummary, KindCount, SyncReport, SyncStats};
pub use vcenter::VCenter;
