use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid granularity: {0} (expected monthly, quarterly or yearly)")]
    InvalidGranularity(String),

    #[error("invalid month value: {0:?}")]
    InvalidMonth(String),
}
