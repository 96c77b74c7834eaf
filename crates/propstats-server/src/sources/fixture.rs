use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use propstats_core::{metrics::RawMonthRow, source::MetricsSource};

/// Monthly rows read from a JSON array on disk, re-read on every fetch.
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetricsSource for FixtureSource {
    async fn fetch_monthly(&self) -> Result<Vec<RawMonthRow>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read fixture {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid fixture JSON in {}", self.path.display()))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
