use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use propstats_core::report::AnalyticsReport;

/// What the dashboard currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardSnapshot {
    /// No refresh has completed yet.
    Loading,
    Ready { report: AnalyticsReport },
    Error { message: String },
}

struct Applied {
    seq: u64,
    snapshot: DashboardSnapshot,
}

/// Latest-wins holder for periodically refreshed analytics.
///
/// Every refresh takes a sequence number from [`DashboardState::begin`] before
/// fetching. Refreshes are never cancelled, so they may finish out of order;
/// [`DashboardState::apply`] drops any result whose sequence number is not
/// newer than the one already shown.
pub struct DashboardState {
    issued: AtomicU64,
    applied: RwLock<Applied>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: RwLock::new(Applied {
                seq: 0,
                snapshot: DashboardSnapshot::Loading,
            }),
        }
    }

    /// Issue the next sequence number. The first refresh gets `1`.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `snapshot` if `seq` is newer than the applied one.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub async fn apply(&self, seq: u64, snapshot: DashboardSnapshot) -> bool {
        let mut applied = self.applied.write().await;
        if seq <= applied.seq {
            return false;
        }
        applied.seq = seq;
        applied.snapshot = snapshot;
        true
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.applied.read().await.snapshot.clone()
    }

    pub async fn applied_seq(&self) -> u64 {
        self.applied.read().await.seq
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
