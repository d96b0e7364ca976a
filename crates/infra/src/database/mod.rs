//! Database implementations

pub mod inventory_repository;
pub mod manager;
pub mod values;
pub mod vcenter_repository;

pub use inventory_repository::SqliteInventoryRepository;
pub use manager::DbManager;
pub use vcenter_repository::SqliteVCenterRepository;

use tokio::task;
use vspheredb_domain::VsphereDbError;

pub(crate) fn map_join_error(err: task::JoinError) -> VsphereDbError {
    if err.is_cancelled() {
        VsphereDbError::Internal("blocking task cancelled".into())
    } else {
        VsphereDbError::Internal(format!("blocking task failed: {err}"))
    }
}
