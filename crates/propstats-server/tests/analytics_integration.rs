use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use propstats_core::config::{Config, MetricsSourceKind, RevenueSourceKind};
use propstats_core::metrics::{RawMonthRow, YearMonth};
use propstats_core::source::{
    MetricsSource, NullRevenue, PlaceholderRevenue, RevenueSource, StaticMetricsSource,
};
use propstats_server::app::build_app;
use propstats_server::state::AppState;

fn test_config() -> Config {
    Config {
        port: 0,
        metrics_source: MetricsSourceKind::Fixture {
            path: "/nonexistent/metrics.json".to_string(),
        },
        revenue_source: RevenueSourceKind::Placeholder,
        lookback_days: 365,
        refresh_interval_ms: 0,
        upstream_timeout_ms: 1000,
        cors_origins: vec![],
    }
}

fn june_2025() -> YearMonth {
    YearMonth::new(2025, 6)
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

fn row(month: u32, sessions: u64, conversions: u64, new_users: u64) -> RawMonthRow {
    RawMonthRow {
        month,
        active_users: new_users + 1,
        new_users,
        sessions,
        conversions,
    }
}

struct StaticRevenue(Vec<f64>);

#[async_trait]
impl RevenueSource for StaticRevenue {
    async fn monthly_revenue(&self) -> anyhow::Result<Vec<f64>> {
        Ok(self.0.clone())
    }
}

struct DownSource;

#[async_trait]
impl MetricsSource for DownSource {
    async fn fetch_monthly(&self) -> anyhow::Result<Vec<RawMonthRow>> {
        anyhow::bail!("connection refused")
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

fn app_with(metrics: Arc<dyn MetricsSource>, revenue: Arc<dyn RevenueSource>) -> axum::Router {
    let state = AppState::new(metrics, revenue, test_config()).with_clock(june_2025);
    build_app(Arc::new(state))
}

fn scenario_app() -> axum::Router {
    app_with(
        Arc::new(StaticMetricsSource::new(vec![
            row(1, 100, 10, 5),
            row(2, 200, 20, 15),
            row(4, 50, 5, 2),
        ])),
        Arc::new(StaticRevenue(vec![1000.0, 2000.0, 500.0])),
    )
}

async fn get(app: axum::Router, uri: &str) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("request")
}

#[tokio::test]
async fn test_analytics_returns_three_views() {
    let response = get(scenario_app(), "/api/analytics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];

    let monthly = data["monthly"].as_array().expect("monthly");
    assert_eq!(monthly.len(), 3);
    assert_eq!(monthly[0]["month"], "Jan");
    assert_eq!(monthly[0]["monthIdx"], 1);
    assert_eq!(monthly[0]["year"], 2025);
    assert_eq!(monthly[2]["revenue"], 500.0);
    assert_eq!(monthly[2]["adsenseRevenue"], 500.0);

    let quarterly = data["quarterly"].as_array().expect("quarterly");
    assert_eq!(quarterly.len(), 2);
    assert_eq!(quarterly[0]["quarter"], "Q1");
    assert_eq!(quarterly[0]["year"], 2025);
    assert_eq!(quarterly[0]["sessions"], 300);
    assert_eq!(quarterly[0]["conversions"], 30);
    assert_eq!(quarterly[0]["newUsers"], 20);
    assert_eq!(quarterly[0]["revenue"], 3000.0);
    assert_eq!(quarterly[1]["quarterIdx"], 2);
    assert_eq!(quarterly[1]["sessions"], 50);

    assert_eq!(data["yearly"], data["monthly"]);
    assert_eq!(data["stats"]["quarterly"]["sales"], 350);
    assert_eq!(data["stats"]["quarterly"]["leads"], 22);
    assert_eq!(data["stats"]["quarterly"]["revenue"], 3500.0);
    assert_eq!(data["stats"]["quarterly"]["conversionRate"], 10);
    assert_eq!(data["referenceMonth"]["year"], 2025);
}

#[tokio::test]
async fn test_analytics_infers_previous_year_for_later_months() {
    let app = app_with(
        Arc::new(StaticMetricsSource::new(vec![row(8, 1, 0, 0), row(3, 1, 0, 0)])),
        Arc::new(PlaceholderRevenue),
    );
    let json = json_body(get(app, "/api/analytics").await).await;
    let monthly = json["data"]["monthly"].as_array().expect("monthly");
    assert_eq!(monthly[0]["year"], 2024);
    assert_eq!(monthly[0]["revenue"], 1000.0);
    assert_eq!(monthly[1]["year"], 2025);
    assert_eq!(monthly[1]["revenue"], 1100.0);

    let quarterly = json["data"]["quarterly"].as_array().expect("quarterly");
    assert_eq!(quarterly[0]["year"], 2024);
    assert_eq!(quarterly[0]["quarter"], "Q3");
    assert_eq!(quarterly[1]["year"], 2025);
    assert_eq!(quarterly[1]["quarter"], "Q1");
}

#[tokio::test]
async fn test_empty_source_yields_empty_views_and_zero_stats() {
    let app = app_with(
        Arc::new(StaticMetricsSource::new(vec![])),
        Arc::new(NullRevenue),
    );
    let json = json_body(get(app, "/api/analytics").await).await;
    let data = &json["data"];
    assert_eq!(data["monthly"], serde_json::json!([]));
    assert_eq!(data["quarterly"], serde_json::json!([]));
    assert_eq!(data["yearly"], serde_json::json!([]));
    for granularity in ["monthly", "quarterly", "yearly"] {
        let card = &data["stats"][granularity];
        assert_eq!(card["revenue"], 0.0);
        assert_eq!(card["sales"], 0);
        assert_eq!(card["leads"], 0);
        assert_eq!(card["conversionRate"], 0);
    }
}

#[tokio::test]
async fn test_stats_defaults_to_monthly() {
    let response = get(scenario_app(), "/api/analytics/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["granularity"], "monthly");
    assert_eq!(json["data"]["sales"], 350);
}

#[tokio::test]
async fn test_stats_for_quarterly() {
    let json = json_body(get(scenario_app(), "/api/analytics/stats?granularity=quarterly").await)
        .await;
    assert_eq!(json["granularity"], "quarterly");
    assert_eq!(json["data"]["leads"], 22);
    assert_eq!(json["data"]["conversionRate"], 10);
}

#[tokio::test]
async fn test_stats_rejects_unknown_granularity() {
    let response = get(scenario_app(), "/api/analytics/stats?granularity=weekly").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["field"], "granularity");
}

#[tokio::test]
async fn test_upstream_failure_returns_502() {
    let app = app_with(Arc::new(DownSource), Arc::new(NullRevenue));
    let response = get(app.clone(), "/api/analytics").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "upstream_error");
    assert_eq!(json["error"]["message"], "error fetching analytics");

    let response = get(app, "/api/analytics/stats").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
