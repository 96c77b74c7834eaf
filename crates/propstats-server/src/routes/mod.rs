pub mod analytics;
pub mod health;

use axum::http::Uri;

use crate::error::AppError;

/// JSON 404 for unmatched paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
