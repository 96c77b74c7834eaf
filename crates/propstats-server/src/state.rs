use std::sync::Arc;

use tracing::{debug, warn};

use propstats_core::{
    config::Config,
    metrics::YearMonth,
    report::{fetch_report, AnalyticsReport},
    source::{MetricsSource, RevenueSource},
};

use crate::{
    dashboard::{DashboardSnapshot, DashboardState},
    error::UPSTREAM_ERROR_MESSAGE,
};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// Upstream per-month metrics. Read-only; shared across requests.
    pub metrics: Arc<dyn MetricsSource>,

    /// Revenue side channel joined to metric rows by position.
    pub revenue: Arc<dyn RevenueSource>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Snapshot kept current by the background refresh loop.
    pub dashboard: DashboardState,

    /// Source of "now" for year inference. Replaced in tests.
    clock: fn() -> YearMonth,
}

impl AppState {
    pub fn new(
        metrics: Arc<dyn MetricsSource>,
        revenue: Arc<dyn RevenueSource>,
        config: Config,
    ) -> Self {
        Self {
            metrics,
            revenue,
            config: Arc::new(config),
            dashboard: DashboardState::new(),
            clock: YearMonth::current,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> YearMonth) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> YearMonth {
        (self.clock)()
    }

    /// Fetch fresh rows and aggregate them. Nothing is cached.
    pub async fn build_report(&self) -> anyhow::Result<AnalyticsReport> {
        fetch_report(self.metrics.as_ref(), self.revenue.as_ref(), self.now()).await
    }

    /// Run one dashboard refresh and apply it unless a newer one landed first.
    ///
    /// Returns whether the result was applied.
    pub async fn refresh_dashboard(&self) -> bool {
        let seq = self.dashboard.begin();
        let snapshot = match self.build_report().await {
            Ok(report) => {
                debug!(
                    seq,
                    months = report.periods.monthly.len(),
                    "Dashboard refresh fetched"
                );
                DashboardSnapshot::Ready { report }
            }
            Err(e) => {
                warn!(
                    seq,
                    source = self.metrics.name(),
                    error = %format!("{e:#}"),
                    "Dashboard refresh failed"
                );
                DashboardSnapshot::Error {
                    message: UPSTREAM_ERROR_MESSAGE.to_string(),
                }
            }
        };

        let applied = self.dashboard.apply(seq, snapshot).await;
        if applied {
            debug!(seq, "Dashboard snapshot updated");
        } else {
            debug!(seq, "Discarded stale dashboard refresh");
        }
        applied
    }
}
