//! Connectivity, scan and audit endpoints.

use crate::api::{AppState, ErrorResponse};
use crate::auditor::ComponentAudit;
use crate::client::{Endpoint, EndpointDescriptor};
use crate::dashboard::websocket;
use crate::health::{ApiStatus, ConnectivitySnapshot, Incident};
use crate::metrics::handler::compute_audit_stats;
use crate::metrics::AuditStats;
use crate::scanner::{ApiTestResult, ScanSummary};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityReport {
    #[serde(flatten)]
    pub snapshot: ConnectivitySnapshot,
    pub incidents: Vec<Incident>,
    pub services: Vec<ApiStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub summary: ScanSummary,
    pub results: Vec<ApiTestResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub summary: AuditStats,
    pub components: Vec<ComponentAudit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndpointQuery {
    /// Restrict to one group, case-insensitive
    pub group: Option<String>,
}

/// GET /v1/connectivity
pub async fn connectivity(State(state): State<Arc<AppState>>) -> Json<ConnectivityReport> {
    Json(ConnectivityReport {
        snapshot: state.monitor.snapshot(),
        incidents: state.monitor.incidents(),
        services: state.monitor.services(),
    })
}

/// POST /v1/forensics
pub async fn run_forensics(State(state): State<Arc<AppState>>) -> Json<Vec<ApiStatus>> {
    Json(state.monitor.run_api_forensics().await)
}

/// GET /v1/scan
pub async fn last_scan(State(state): State<Arc<AppState>>) -> Json<ScanReport> {
    let results = state.scanner.last_results();
    Json(ScanReport {
        summary: ScanSummary::from_results(&results),
        results,
    })
}

/// POST /v1/scan
///
/// Runs to completion; per-endpoint progress goes out over `/ws`.
pub async fn run_scan(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScanReport>, ErrorResponse> {
    let total = state.scanner.registry().len();
    let tx = state.ws_broadcast.clone();
    let mut index = 0;

    let results = state
        .scanner
        .run_full_scan(|result| {
            index += 1;
            let _ = tx.send(websocket::create_scan_progress_update(index, total, result));
        })
        .await?;

    Ok(Json(ScanReport {
        summary: ScanSummary::from_results(&results),
        results,
    }))
}

/// GET /v1/audit
pub async fn last_audit(State(state): State<Arc<AppState>>) -> Json<AuditReport> {
    let components = state.auditor.last_results();
    Json(AuditReport {
        summary: compute_audit_stats(&components),
        components,
    })
}

/// POST /v1/audit
pub async fn run_audit(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AuditReport>, ErrorResponse> {
    let total = state.auditor.components().len();
    let tx = state.ws_broadcast.clone();
    let mut index = 0;

    let components = state
        .auditor
        .run_full_app_audit(|audit| {
            index += 1;
            let _ = tx.send(websocket::create_audit_progress_update(index, total, audit));
        })
        .await?;

    Ok(Json(AuditReport {
        summary: compute_audit_stats(&components),
        components,
    }))
}

/// GET /v1/endpoints
pub async fn endpoints(
    Query(query): Query<EndpointQuery>,
) -> Result<Json<Vec<EndpointDescriptor>>, ErrorResponse> {
    let descriptors: Vec<_> = Endpoint::ALL
        .iter()
        .filter(|e| {
            query
                .group
                .as_deref()
                .map_or(true, |g| e.group().eq_ignore_ascii_case(g))
        })
        .map(|e| e.descriptor())
        .collect();

    if descriptors.is_empty() {
        if let Some(group) = &query.group {
            return Err(ErrorResponse::not_found(format!("Unknown group '{}'", group)));
        }
    }
    Ok(Json(descriptors))
}
