//! Health check endpoint handler.

use crate::api::AppState;
use crate::dispatch::ApiMode;
use crate::health::ConnectivitySnapshot;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: ApiMode,
    pub uptime_seconds: u64,
    /// Reachability of the LiveGo backend as last observed
    pub backend: ConnectivitySnapshot,
}

/// GET /health
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        mode: state.client.dispatcher().mode(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        backend: state.monitor.snapshot(),
    })
}
