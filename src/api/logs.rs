//! Request log endpoints.

use crate::api::AppState;
use crate::tracker::LogEntry;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// GET /v1/logs
pub async fn list_logs(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    Json(state.tracker.logs())
}

/// DELETE /v1/logs
pub async fn clear_logs(State(state): State<Arc<AppState>>) -> StatusCode {
    state.tracker.clear_logs();
    StatusCode::NO_CONTENT
}

/// GET /v1/failures
pub async fn list_failures(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    Json(state.tracker.failures())
}

/// DELETE /v1/failures
pub async fn clear_failures(State(state): State<Arc<AppState>>) -> StatusCode {
    state.tracker.clear_failures();
    StatusCode::NO_CONTENT
}
