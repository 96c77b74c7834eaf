pub mod config;
pub mod error;
pub mod metrics;
pub mod period;
pub mod report;
pub mod source;
pub mod summary;
