/// Re-export `Config` from `propstats-core` for use within this crate.
///
/// All environment-variable parsing lives in `propstats-core` so it can be
/// shared with integration tests without depending on the full server.
pub use propstats_core::config::{Config, MetricsSourceKind, RevenueSourceKind};
