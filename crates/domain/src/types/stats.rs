//! Sync statistics and inventory summaries

use std::ops::AddAssign;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::ObjectKind;

/* -------------------------------------------------------------------------- */
/* Per-pass statistics */
/* -------------------------------------------------------------------------- */

/// Outcome of one reconciliation pass for one object kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Records inserted
    pub created: usize,

    /// Existing records with at least one changed column
    pub modified: usize,

    /// Records removed because the API no longer reports them
    pub deleted: usize,

    /// Objects returned by the API, duplicates included
    pub fetched: usize,
}

impl SyncStats {
    /// Whether the pass wrote anything
    pub fn has_changes(&self) -> bool {
        self.created + self.modified + self.deleted > 0
    }
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, rhs: Self) {
        self.created += rhs.created;
        self.modified += rhs.modified;
        self.deleted += rhs.deleted;
        self.fetched += rhs.fetched;
    }
}

/// Outcome of a full pass over all configured kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub kinds: Vec<(ObjectKind, SyncStats)>,
}

impl SyncReport {
    pub fn totals(&self) -> SyncStats {
        let mut totals = SyncStats::default();
        for (_, stats) in &self.kinds {
            totals += *stats;
        }
        totals
    }

    pub fn stats_for(&self, kind: ObjectKind) -> Option<SyncStats> {
        self.kinds.iter().find(|(k, _)| *k == kind).map(|(_, stats)| *stats)
    }
}

/* -------------------------------------------------------------------------- */
/* Inventory summary */
/* -------------------------------------------------------------------------- */

/// Number of stored records of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: ObjectKind,
    pub count: u64,
}

/// Stored inventory of one vCenter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub vcenter_name: String,
    pub vcenter_uuid_hex: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub counts: Vec<KindCount>,
}

impl InventorySummary {
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}
