use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use propstats_core::metrics::Granularity;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub granularity: Option<String>,
}

/// `GET /api/analytics` - Monthly, quarterly and yearly views plus stat cards,
/// computed from a fresh upstream fetch.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.build_report().await.map_err(AppError::Upstream)?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/analytics/stats?granularity=` - One stat card.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let granularity = Granularity::parse(query.granularity.as_deref())
        .map_err(|e| AppError::invalid_field("granularity", e.to_string()))?;

    let report = state.build_report().await.map_err(AppError::Upstream)?;

    Ok(Json(json!({
        "data": report.stats.get(granularity),
        "granularity": granularity.as_str()
    })))
}

/// `GET /api/analytics/latest` - Last snapshot applied by the refresh loop.
pub async fn get_latest(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "data": state.dashboard.snapshot().await }))
}

/// `POST /api/analytics/refresh` - Refresh the dashboard snapshot now.
///
/// If an overlapping newer refresh lands first, this one is discarded and the
/// response shows the newer snapshot.
pub async fn post_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let applied = state.refresh_dashboard().await;
    Json(json!({
        "data": state.dashboard.snapshot().await,
        "applied": applied
    }))
}
