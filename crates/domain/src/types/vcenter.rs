//! The vCenter owning a synchronized inventory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The vCenter under which reconciliation runs
///
/// Its instance UUID is the namespace for every derived object UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCenter {
    pub uuid: Uuid,
    pub name: String,
    pub api_url: String,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl VCenter {
    pub fn new(uuid: Uuid, name: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self { uuid, name: name.into(), api_url: api_url.into(), last_sync_at: None }
    }

    /// Derive the global UUID of a remote object from its managed object id
    ///
    /// Same vCenter and same id always give the same UUID.
    pub fn make_global_uuid(&self, moref_id: &str) -> Uuid {
        Uuid::new_v5(&self.uuid, moref_id.as_bytes())
    }

    /// Lowercase hex form of the vCenter UUID, without dashes
    pub fn hex_uuid(&self) -> String {
        hex::encode(self.uuid.as_bytes())
    }
}
