use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub metrics_source: MetricsSourceKind,
    pub revenue_source: RevenueSourceKind,
    pub lookback_days: u32,
    /// Dashboard refresh period. `0` disables the background loop.
    pub refresh_interval_ms: u64,
    pub upstream_timeout_ms: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsSourceKind {
    /// GA4 Data API `runReport`.
    Ga4 {
        property_id: String,
        access_token: String,
        base_url: String,
    },
    /// JSON array of monthly rows read from disk on every fetch.
    Fixture { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevenueSourceKind {
    Placeholder,
    None,
}

pub const DEFAULT_GA4_BASE_URL: &str = "https://analyticsdata.googleapis.com";

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("PROPSTATS_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            metrics_source: {
                let raw = std::env::var("PROPSTATS_METRICS_SOURCE")
                    .unwrap_or_else(|_| "fixture".to_string());
                match raw.as_str() {
                    "ga4" => MetricsSourceKind::Ga4 {
                        property_id: std::env::var("PROPSTATS_GA4_PROPERTY_ID").map_err(
                            |_| "PROPSTATS_GA4_PROPERTY_ID required when METRICS_SOURCE=ga4",
                        )?,
                        access_token: std::env::var("PROPSTATS_GA4_ACCESS_TOKEN").map_err(
                            |_| "PROPSTATS_GA4_ACCESS_TOKEN required when METRICS_SOURCE=ga4",
                        )?,
                        base_url: std::env::var("PROPSTATS_GA4_BASE_URL")
                            .unwrap_or_else(|_| DEFAULT_GA4_BASE_URL.to_string()),
                    },
                    "fixture" => MetricsSourceKind::Fixture {
                        path: std::env::var("PROPSTATS_FIXTURE_PATH")
                            .unwrap_or_else(|_| "./data/metrics.json".to_string()),
                    },
                    other => return Err(format!("unknown metrics source: {other}")),
                }
            },
            revenue_source: {
                let raw = std::env::var("PROPSTATS_REVENUE_SOURCE")
                    .unwrap_or_else(|_| "placeholder".to_string());
                match raw.as_str() {
                    "none" => RevenueSourceKind::None,
                    _ => RevenueSourceKind::Placeholder,
                }
            },
            lookback_days: std::env::var("PROPSTATS_LOOKBACK_DAYS")
                .unwrap_or_else(|_| "365".to_string())
                .parse()
                .unwrap_or(365),
            refresh_interval_ms: std::env::var("PROPSTATS_REFRESH_INTERVAL_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            upstream_timeout_ms: std::env::var("PROPSTATS_UPSTREAM_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10_000),
            cors_origins: std::env::var("PROPSTATS_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// `None` when the background refresh loop is disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_ms > 0).then(|| Duration::from_millis(self.refresh_interval_ms))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}
