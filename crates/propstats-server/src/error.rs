use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Client-facing message for any failed upstream fetch.
pub const UPSTREAM_ERROR_MESSAGE: &str = "error fetching analytics";

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {message}")]
    BadRequest { message: String, field: Option<&'static str> },

    /// Metrics or revenue source failed; nothing was aggregated.
    #[error("upstream error: {0:#}")]
    Upstream(anyhow::Error),
}

impl AppError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            field: Some(field),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.as_str(), None),
            AppError::BadRequest { message, field } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.as_str(),
                *field,
            ),
            AppError::Upstream(e) => {
                tracing::warn!(error = %format!("{e:#}"), "Upstream analytics fetch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    UPSTREAM_ERROR_MESSAGE,
                    None,
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "field": field
                }
            })),
        )
            .into_response()
    }
}
