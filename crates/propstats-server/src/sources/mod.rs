use std::sync::Arc;

use anyhow::Result;

use propstats_core::source::{MetricsSource, NullRevenue, PlaceholderRevenue, RevenueSource};

use crate::config::{Config, MetricsSourceKind, RevenueSourceKind};

pub mod fixture;
pub mod ga4;

pub use fixture::FixtureSource;
pub use ga4::Ga4Client;

pub fn metrics_source(cfg: &Config) -> Result<Arc<dyn MetricsSource>> {
    let source: Arc<dyn MetricsSource> = match &cfg.metrics_source {
        MetricsSourceKind::Ga4 {
            property_id,
            access_token,
            base_url,
        } => Arc::new(Ga4Client::new(
            base_url,
            property_id,
            access_token,
            cfg.lookback_days,
            cfg.upstream_timeout(),
        )?),
        MetricsSourceKind::Fixture { path } => Arc::new(FixtureSource::new(path)),
    };
    Ok(source)
}

pub fn revenue_source(cfg: &Config) -> Arc<dyn RevenueSource> {
    match cfg.revenue_source {
        RevenueSourceKind::Placeholder => Arc::new(PlaceholderRevenue),
        RevenueSourceKind::None => Arc::new(NullRevenue),
    }
}
