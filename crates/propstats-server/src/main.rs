use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use propstats_server::{scheduler, sources, state::AppState};

/// `propstats health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$PROPSTATS_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("PROPSTATS_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("propstats=info".parse()?),
        )
        .json()
        .init();

    let cfg = propstats_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let metrics = sources::metrics_source(&cfg)?;
    let revenue = sources::revenue_source(&cfg);
    info!(
        metrics_source = metrics.name(),
        revenue_source = ?cfg.revenue_source,
        lookback_days = cfg.lookback_days,
        "Analytics sources configured"
    );

    let state = Arc::new(AppState::new(metrics, revenue, cfg.clone()));

    match cfg.refresh_interval() {
        Some(period) => {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                scheduler::run_refresh_loop(state, period).await;
            });
        }
        None => info!("Dashboard refresh loop disabled (PROPSTATS_REFRESH_INTERVAL_MS=0)"),
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = propstats_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "propstats listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
