// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The service is a read-only dashboard
// feed: every route serves data derived from the current series snapshot or a
// live single-token fetch. No route mutates state.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app_state::AppState;
use crate::backtest;
use crate::composite::TokenAssessment;
use crate::export::{export_csv, ExportOptions};
use crate::types::GaugeZone;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/series", get(series))
        .route("/api/v1/index/latest", get(latest_index))
        .route("/api/v1/backtest", get(backtest_report))
        .route("/api/v1/false-positives", get(false_positives))
        .route("/api/v1/token/:id/score", get(token_score))
        .route("/api/v1/export.csv", get(export))
        .route("/api/v1/errors", get(recent_errors))
        .layer(cors)
        .with_state(state)
}

/// 503 body used whenever no derived series has been computed yet.
fn series_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "derived series not yet computed" })),
    )
        .into_response()
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
    last_refresh: Option<NaiveDateTime>,
    series_len: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
        last_refresh: state.last_refresh(),
        series_len: state.current_series().map(|s| s.len()).unwrap_or(0),
    };
    Json(resp)
}

// =============================================================================
// Recent errors (dashboard log)
// =============================================================================

async fn recent_errors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent_errors())
}

// =============================================================================
// Derived series (chart feed)
// =============================================================================

async fn series(State(state): State<Arc<AppState>>) -> Response {
    match state.current_series() {
        Some(series) => Json(series.rows()).into_response(),
        None => series_unavailable(),
    }
}

// =============================================================================
// Latest index value (gauge display)
// =============================================================================

#[derive(Serialize)]
struct LatestIndexResponse {
    timestamp: NaiveDateTime,
    price: f64,
    fomo_index: f64,
    zone: GaugeZone,
    fomo_signal: bool,
}

async fn latest_index(State(state): State<Arc<AppState>>) -> Response {
    let Some(series) = state.current_series() else {
        return series_unavailable();
    };
    // The pipeline rejects empty input, so a computed series has a last row.
    let i = series.len() - 1;
    let value = series.fomo_index[i];

    Json(LatestIndexResponse {
        timestamp: series.observations[i].timestamp,
        price: series.observations[i].price,
        fomo_index: value,
        zone: GaugeZone::from_index(value),
        fomo_signal: series.fomo_signal[i],
    })
    .into_response()
}

// =============================================================================
// Backtest & false positives
// =============================================================================

async fn backtest_report(State(state): State<Arc<AppState>>) -> Response {
    let Some(series) = state.current_series() else {
        return series_unavailable();
    };
    let horizon = state.runtime_config.read().backtest.horizon;
    Json(backtest::backtest_signals(&series, horizon)).into_response()
}

async fn false_positives(State(state): State<Arc<AppState>>) -> Response {
    let Some(series) = state.current_series() else {
        return series_unavailable();
    };
    let params = state.runtime_config.read().backtest.clone();
    Json(backtest::false_positive_analysis(
        &series,
        params.fp_horizon,
        params.fomo_threshold,
        params.drop_threshold,
    ))
    .into_response()
}

// =============================================================================
// Single-token composite score
// =============================================================================

async fn token_score(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
) -> Response {
    let (known, days, rsi_period) = {
        let cfg = state.runtime_config.read();
        (
            cfg.tokens.iter().any(|t| t == &token_id),
            cfg.fetch_days,
            cfg.rsi_period,
        )
    };
    if !known {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown token `{token_id}`") })),
        )
            .into_response();
    }

    match state.coingecko.fetch_market_history(&token_id, days).await {
        Ok(history) => {
            let assessment =
                TokenAssessment::evaluate(&history.prices, &history.volumes, rsi_period);
            Json(serde_json::json!({
                "token_id": token_id,
                "assessment": assessment,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(token_id, error = %e, "token score fetch failed");
            state.record_error(format!("token `{token_id}` fetch failed: {e}"));
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// =============================================================================
// CSV export
// =============================================================================

#[derive(Deserialize)]
struct ExportQuery {
    start: Option<String>,
    end: Option<String>,
    /// Moving-average window for the FOMO index column; 0 / absent disables.
    ma: Option<usize>,
}

async fn export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let Some(series) = state.current_series() else {
        return series_unavailable();
    };

    let parse = |value: &Option<String>, end_of_day: bool| -> Result<Option<NaiveDateTime>, String> {
        match value {
            None => Ok(None),
            Some(raw) => parse_date_bound(raw, end_of_day)
                .map(Some)
                .ok_or_else(|| format!("`{raw}` is not a recognised date")),
        }
    };

    let (start, end) = match (parse(&query.start, false), parse(&query.end, true)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(e), _) | (_, Err(e)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e })),
            )
                .into_response();
        }
    };

    let csv = export_csv(
        &series,
        &ExportOptions {
            start,
            end,
            smoothing_window: query.ma.unwrap_or(0),
        },
    );

    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=fomo_data.csv",
            ),
        ],
        csv,
    )
        .into_response()
}

/// Parse a date bound. A date-only end bound covers the whole day.
fn parse_date_bound(value: &str, end_of_day: bool) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
}
