//! HTTP API for the journal daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Score preview (no persistence)
//! - Submit, list and delete trades
//! - CSV export
//! - Analytics dashboard data

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use journal_domain::{ScoreBreakdown, TradeRecord, TradeSubmission};
use journal_engine::AnalyticsSummary;
use journal_store::{StoreError, TradeStore};

use crate::error::DaemonError;
use crate::journal::{Journal, Submitted};

/// File name offered for the CSV download
pub const EXPORT_FILE_NAME: &str = "trade_journal.csv";

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState {
    pub journal: Journal<dyn TradeStore>,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Trade list response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TradesResponse {
    pub count: usize,
    pub trades: Vec<TradeRecord>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/score", post(score_handler))
        .route("/trades", post(submit_handler).get(list_handler))
        .route("/trades/export.csv", get(export_handler))
        .route("/trades/:position", delete(delete_handler))
        .route("/analytics", get(analytics_handler))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.journal.store().backend().to_string(),
    })
}

/// Score a form without recording it.
async fn score_handler(
    State(state): State<Arc<ApiState>>,
    Json(entry): Json<TradeSubmission>,
) -> Json<ScoreBreakdown> {
    Json(state.journal.preview(&entry))
}

/// Score and record a trade.
async fn submit_handler(
    State(state): State<Arc<ApiState>>,
    Json(entry): Json<TradeSubmission>,
) -> ApiResult<(StatusCode, Json<Submitted>)> {
    let submitted = state.journal.submit(entry).await.map_err(to_error_response)?;
    Ok((StatusCode::CREATED, Json(submitted)))
}

/// List all trades in insertion order.
async fn list_handler(State(state): State<Arc<ApiState>>) -> ApiResult<Json<TradesResponse>> {
    let trades = state.journal.list().await.map_err(to_error_response)?;
    Ok(Json(TradesResponse {
        count: trades.len(),
        trades,
    }))
}

/// Delete the trade at a 0-based position.
async fn delete_handler(
    State(state): State<Arc<ApiState>>,
    Path(position): Path<usize>,
) -> ApiResult<Json<TradeRecord>> {
    let removed = state.journal.delete(position).await.map_err(to_error_response)?;
    Ok(Json(removed))
}

/// Download the journal as CSV.
async fn export_handler(State(state): State<Arc<ApiState>>) -> ApiResult<impl IntoResponse> {
    let csv = state.journal.export_csv().await.map_err(to_error_response)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    ))
}

/// Dashboard summary.
async fn analytics_handler(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<AnalyticsSummary>> {
    let summary = state.journal.analytics().await.map_err(to_error_response)?;
    Ok(Json(summary))
}

// =============================================================================
// Helpers
// =============================================================================

fn to_error_response(error: DaemonError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        DaemonError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        // Stored rows that fail validation are a server-side data fault
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// =============================================================================
// Tests
// =============================================================================
