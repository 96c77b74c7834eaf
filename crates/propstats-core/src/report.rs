//! Full fetch-aggregate-summarize cycle.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    metrics::YearMonth,
    period::{aggregate, PeriodReport},
    source::{MetricsSource, RevenueSource},
    summary::StatCards,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    #[serde(flatten)]
    pub periods: PeriodReport,
    pub stats: StatCards,
    pub reference_month: YearMonth,
    pub generated_at: DateTime<Utc>,
}

impl AnalyticsReport {
    pub fn build(periods: PeriodReport, reference_month: YearMonth) -> Self {
        let stats = StatCards::from_report(&periods);
        Self {
            periods,
            stats,
            reference_month,
            generated_at: Utc::now(),
        }
    }
}

/// Fetch rows and revenue, then aggregate.
///
/// Either fetch failing aborts the whole cycle; nothing is computed from a
/// partial fetch.
pub async fn fetch_report(
    metrics: &dyn MetricsSource,
    revenue: &dyn RevenueSource,
    now: YearMonth,
) -> Result<AnalyticsReport> {
    let rows = metrics
        .fetch_monthly()
        .await
        .with_context(|| format!("{} metrics fetch failed", metrics.name()))?;
    let revenue = revenue
        .monthly_revenue()
        .await
        .context("revenue fetch failed")?;
    Ok(AnalyticsReport::build(aggregate(&rows, &revenue, now), now))
}
