use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::state::AppState;

/// Spawn one dashboard refresh without waiting for it.
///
/// Overlapping refreshes are neither cancelled nor coalesced; ordering is
/// resolved by the dashboard's sequence guard.
pub fn spawn_refresh(state: &Arc<AppState>) -> JoinHandle<bool> {
    let state = Arc::clone(state);
    tokio::spawn(async move { state.refresh_dashboard().await })
}

pub async fn run_refresh_loop(state: Arc<AppState>, period: Duration) {
    info!(
        period_ms = period.as_millis() as u64,
        "Dashboard refresh loop started"
    );
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        spawn_refresh(&state);
    }
}
