// =============================================================================
// FOMO Tracker — Main Entry Point
// =============================================================================
//
// Loads the raw observation series, runs the indicator pipeline once, then
// serves the derived table, backtest reports, and single-token scores over
// REST. A background task periodically reloads the series and swaps in a
// fresh snapshot.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod backtest;
mod composite;
mod data_source;
mod error;
mod export;
mod indicators;
mod pipeline;
mod runtime_config;
mod signals;
mod stats;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::backtest::BacktestOutcome;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("FOMO tracker starting up");

    let config_path =
        std::env::var("FOMO_CONFIG").unwrap_or_else(|_| "fomo_config.json".to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(path) = std::env::var("FOMO_DATA_CSV") {
        config.csv_path = path;
    }

    info!(
        csv_path = %config.csv_path,
        index_variant = ?config.pipeline.index_variant,
        listen_addr = %config.listen_addr,
        "configuration resolved"
    );

    // ── 2. Build shared state & first pipeline run ───────────────────────
    let state = Arc::new(AppState::new(config));

    match recompute(&state) {
        Ok(()) => {}
        Err(e) => {
            // The service still starts: the dashboard shows 503s until a
            // refresh succeeds.
            error!(error = %e, "initial pipeline run failed");
            state.record_error(format!("initial pipeline run failed: {e}"));
        }
    }

    // ── 3. Background refresh task ───────────────────────────────────────
    {
        let state = state.clone();
        let interval = state.runtime_config.read().refresh_secs;
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(tokio::time::Duration::from_secs(interval.max(1)));
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                if let Err(e) = recompute(&state) {
                    error!(error = %e, "series refresh failed");
                    state.record_error(format!("series refresh failed: {e}"));
                }
            }
        });
    }

    // ── 4. Serve ─────────────────────────────────────────────────────────
    let addr = state.runtime_config.read().listen_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "REST API listening");

    axum::serve(listener, api::router(state)).await?;
    Ok(())
}

/// Reload the raw series, run the full pipeline, and install the result.
fn recompute(state: &AppState) -> anyhow::Result<()> {
    let (csv_path, params, backtest_params) = {
        let cfg = state.runtime_config.read();
        (cfg.csv_path.clone(), cfg.pipeline.clone(), cfg.backtest.clone())
    };

    let observations = data_source::load_csv(&csv_path)?;
    let derived = pipeline::run(observations, &params)?;

    match backtest::backtest_signals(&derived, backtest_params.horizon) {
        BacktestOutcome::Evaluated(summary) => info!(
            signals = summary.total_signals,
            success_rate_pct = summary.success_rate_pct,
            avg_change_pct = summary.avg_change_pct,
            "backtest summary"
        ),
        BacktestOutcome::NoSignals => info!("backtest: no qualifying signals"),
    }

    let latest = derived.fomo_index.last().copied().unwrap_or(0.0);
    info!(rows = derived.len(), latest_index = latest, "derived series installed");

    state.install_series(derived);
    Ok(())
}
