//! # vspheredb Core
//!
//! Reconciliation logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the remote API and the database
//! - Property mapping from remote values to column values
//! - The reconciler computing a change set per object kind
//! - The sync service driving a full pass
//!
//! ## Architecture Principles
//! - Only depends on `vspheredb-domain`
//! - No database or HTTP code
//! - All external dependencies via traits

pub mod sync;

pub use sync::mapper::apply_mapped_properties;
pub use sync::ports::{InventoryStore, PropertyCollector, VCenterRepository};
pub use sync::reconciler::{ChangeSet, SyncReconciler};
pub use sync::service::InventorySyncService;
