// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All data endpoints live under `/api/v1/`. The API is read-only and
// unauthenticated; CORS is configured permissively for development.
//
//   GET /                                  — service info + endpoint directory
//   GET /api/v1/health                     — liveness with uptime
//   GET /api/v1/symbols/{symbol}/history   — fetch + normalize a series
//   GET /api/v1/analysis/{symbol}          — full technical analysis
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis::{self, AnalysisReport, IndicatorParams};
use crate::app_state::AppState;
use crate::error::{AnalysisError, FeedError};
use crate::series::{PricePoint, Series};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/api/v1/health", get(health))
        .route("/api/v1/symbols/:symbol/history", get(history))
        .route("/api/v1/analysis/:symbol", get(analysis_endpoint))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Error mapping
// =============================================================================

/// Request-level failure, mapped to an HTTP status with a JSON body.
pub enum ApiError {
    Analysis(AnalysisError),
    Feed(FeedError),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        Self::Analysis(err)
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        Self::Feed(err)
    }
}

/// Status code for a given failure. Parameter mistakes are the caller's
/// fault (400); a series the indicators cannot work with is a semantic
/// problem with the entity (422); upstream trouble is a bad gateway.
fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Analysis(AnalysisError::Configuration(_)) => StatusCode::BAD_REQUEST,
        ApiError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApiError::Feed(FeedError::UnknownSymbol(_)) => StatusCode::NOT_FOUND,
        ApiError::Feed(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = match &self {
            ApiError::Analysis(e) => e.to_string(),
            ApiError::Feed(e) => e.to_string(),
        };
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Service info (mirrors the original home endpoint)
// =============================================================================

async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "online",
        "service": "Borsa Analytics API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/v1/health",
            "history": "/api/v1/symbols/{symbol}/history",
            "analysis": "/api/v1/analysis/{symbol}",
        }
    }))
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    uptime_secs: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// =============================================================================
// History
// =============================================================================

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    period: Option<String>,
    interval: Option<String>,
}

#[derive(Serialize)]
struct HistoryResponse {
    symbol: String,
    period: String,
    interval: String,
    points: Vec<PricePoint>,
}

/// Fetch, normalize, and return the OHLCV history for a symbol.
async fn history(
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let symbol = symbol.to_uppercase();
    let period = query.period.unwrap_or_else(|| "1mo".to_string());
    let interval = query.interval.unwrap_or_else(|| "1d".to_string());

    let raw = state.feed.fetch_series(&symbol, &period, &interval).await?;
    let series = Series::normalize(raw)?;

    info!(symbol, period, interval, points = series.len(), "history served");

    Ok(Json(HistoryResponse {
        symbol,
        period,
        interval,
        points: series.points().to_vec(),
    }))
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct AnalysisQuery {
    period: Option<String>,
    interval: Option<String>,
    sma_window: Option<usize>,
    ema_window: Option<usize>,
    rsi_window: Option<usize>,
    macd_fast: Option<usize>,
    macd_slow: Option<usize>,
    macd_signal: Option<usize>,
    bb_window: Option<usize>,
    bb_std: Option<f64>,
}

/// Layer per-request overrides over the configured defaults.
fn merged_params(base: IndicatorParams, query: &AnalysisQuery) -> IndicatorParams {
    IndicatorParams {
        sma_window: query.sma_window.unwrap_or(base.sma_window),
        ema_window: query.ema_window.unwrap_or(base.ema_window),
        rsi_window: query.rsi_window.unwrap_or(base.rsi_window),
        macd_fast: query.macd_fast.unwrap_or(base.macd_fast),
        macd_slow: query.macd_slow.unwrap_or(base.macd_slow),
        macd_signal: query.macd_signal.unwrap_or(base.macd_signal),
        bb_window: query.bb_window.unwrap_or(base.bb_window),
        bb_std: query.bb_std.unwrap_or(base.bb_std),
    }
}

/// Run the full technical analysis for a symbol.
async fn analysis_endpoint(
    Path(symbol): Path<String>,
    Query(query): Query<AnalysisQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let symbol = symbol.to_uppercase();
    // The original analysis endpoint works on a year of daily closes.
    let period = query.period.clone().unwrap_or_else(|| "1y".to_string());
    let interval = query.interval.clone().unwrap_or_else(|| "1d".to_string());

    let params = merged_params(state.config.indicators, &query);

    let raw = state.feed.fetch_series(&symbol, &period, &interval).await?;
    let report = analysis::analyze(&symbol, raw, &params, &state.config.thresholds)?;

    info!(
        symbol,
        period,
        computed = report.indicators.len(),
        skipped = report.skipped.len(),
        bias = %report.overall_bias,
        "analysis served"
    );

    Ok(Json(report))
}
