use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use propstats_core::{metrics::RawMonthRow, source::MetricsSource};

/// Metric order requested from GA4; response `metricValues` follow it.
const METRICS: [&str; 4] = ["activeUsers", "newUsers", "sessions", "conversions"];

/// GA4 Data API client running a month-dimension report.
///
/// Rows are returned in whatever order GA4 produces; they are not re-sorted
/// here because the aggregator preserves source order.
#[derive(Clone)]
pub struct Ga4Client {
    client: Client,
    base_url: String,
    property_id: String,
    access_token: String,
    lookback_days: u32,
}

impl Ga4Client {
    pub fn new(
        base_url: &str,
        property_id: &str,
        access_token: &str,
        lookback_days: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build GA4 HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            property_id: property_id.to_string(),
            access_token: access_token.to_string(),
            lookback_days,
        })
    }

    fn report_url(&self) -> Result<reqwest::Url> {
        let raw = format!(
            "{}/v1beta/properties/{}:runReport",
            self.base_url, self.property_id
        );
        reqwest::Url::parse(&raw).context("Invalid GA4 base URL")
    }

    fn request_body(&self) -> Value {
        json!({
            "dateRanges": [{
                "startDate": format!("{}daysAgo", self.lookback_days),
                "endDate": "today"
            }],
            "dimensions": [{ "name": "month" }],
            "metrics": METRICS.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>()
        })
    }
}

#[async_trait]
impl MetricsSource for Ga4Client {
    async fn fetch_monthly(&self) -> Result<Vec<RawMonthRow>> {
        let resp = self
            .client
            .post(self.report_url()?)
            .bearer_auth(&self.access_token)
            .json(&self.request_body())
            .send()
            .await
            .context("GA4 runReport request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("GA4 error {status}: {body}");
        }

        let json: Value = resp.json().await.context("GA4 response parse failed")?;
        let rows = parse_run_report(&json)?;
        debug!(rows = rows.len(), "GA4 report fetched");
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "ga4"
    }
}

/// Convert a `runReport` response body into monthly rows.
///
/// GA4 omits `rows` entirely when the report is empty.
pub fn parse_run_report(body: &Value) -> Result<Vec<RawMonthRow>> {
    let Some(rows) = body.get("rows") else {
        return Ok(Vec::new());
    };
    let rows = rows
        .as_array()
        .ok_or_else(|| anyhow!("GA4 rows is not an array"))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).with_context(|| format!("GA4 row {i} malformed")))
        .collect()
}

fn parse_row(row: &Value) -> Result<RawMonthRow> {
    let month = row["dimensionValues"][0]["value"]
        .as_str()
        .ok_or_else(|| anyhow!("missing month dimension"))?;
    let month = RawMonthRow::parse_month(month)?;

    let metric = |idx: usize| -> Result<u64> {
        let raw = row["metricValues"][idx]["value"]
            .as_str()
            .ok_or_else(|| anyhow!("missing metric {}", METRICS[idx]))?;
        parse_count(raw).with_context(|| format!("invalid {} value {raw:?}", METRICS[idx]))
    };

    Ok(RawMonthRow {
        month,
        active_users: metric(0)?,
        new_users: metric(1)?,
        sessions: metric(2)?,
        conversions: metric(3)?,
    })
}

/// GA4 reports counts as strings, occasionally with a fractional part
/// (`"12.0"` for key events).
fn parse_count(raw: &str) -> Result<u64> {
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(v);
    }
    let v: f64 = raw.parse()?;
    if !v.is_finite() || v < 0.0 {
        bail!("count out of range");
    }
    Ok(v.round() as u64)
}
