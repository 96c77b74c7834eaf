use async_trait::async_trait;

use crate::metrics::RawMonthRow;

/// Upstream reporting API returning one row per calendar month for the
/// trailing window, in the order the upstream chooses.
#[async_trait]
pub trait MetricsSource: Send + Sync + 'static {
    async fn fetch_monthly(&self) -> anyhow::Result<Vec<RawMonthRow>>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Per-month revenue figures, joined to metric rows by position.
#[async_trait]
pub trait RevenueSource: Send + Sync + 'static {
    async fn monthly_revenue(&self) -> anyhow::Result<Vec<f64>>;
}

/// Fixed rows held in memory.
pub struct StaticMetricsSource {
    rows: Vec<RawMonthRow>,
}

impl StaticMetricsSource {
    pub fn new(rows: Vec<RawMonthRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl MetricsSource for StaticMetricsSource {
    async fn fetch_monthly(&self) -> anyhow::Result<Vec<RawMonthRow>> {
        Ok(self.rows.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Stand-in ad revenue: twelve values `1000 + i * 100`.
pub struct PlaceholderRevenue;

pub const PLACEHOLDER_MONTHS: usize = 12;

#[async_trait]
impl RevenueSource for PlaceholderRevenue {
    async fn monthly_revenue(&self) -> anyhow::Result<Vec<f64>> {
        Ok((0..PLACEHOLDER_MONTHS)
            .map(|i| 1000.0 + i as f64 * 100.0)
            .collect())
    }
}

/// No revenue channel; every month joins `0.0`.
pub struct NullRevenue;

#[async_trait]
impl RevenueSource for NullRevenue {
    async fn monthly_revenue(&self) -> anyhow::Result<Vec<f64>> {
        Ok(Vec::new())
    }
}
