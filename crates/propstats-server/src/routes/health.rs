use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health` — liveness check.
///
/// Does not touch the metrics source; an unreachable upstream is reported by
/// the analytics endpoints, not here.
///
/// Response shape:
/// ```json
/// { "status": "ok", "version": "0.1.0", "metrics_source": "ga4" }
/// ```
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "metrics_source": state.metrics.name()
        })),
    )
}
