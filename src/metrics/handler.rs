//! # Metrics HTTP Handlers

use super::{AuditStats, ConnectivityStats, RequestStats, StatsResponse};
use crate::api::AppState;
use crate::auditor::{AuditStatus, ComponentAudit};
use crate::scanner::ScanSummary;
use crate::tracker::{LogEntry, LogStatus};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Handler for GET /metrics (Prometheus text format).
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics_collector.update_gauges();

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics_collector.render_metrics(),
    )
}

/// Handler for GET /v1/stats.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.monitor.snapshot();
    let scan = state.scanner.last_results();
    let audit = state.auditor.last_results();

    Json(StatsResponse {
        uptime_seconds: state.metrics_collector.uptime_seconds(),
        mode: state.client.dispatcher().mode(),
        requests: compute_request_stats(&state.tracker.logs()),
        connectivity: ConnectivityStats {
            status: snapshot.status,
            latency_ms: snapshot.latency_ms,
            incidents: state.monitor.incidents().len(),
        },
        scan: (!scan.is_empty()).then(|| ScanSummary::from_results(&scan)),
        audit: (!audit.is_empty()).then(|| compute_audit_stats(&audit)),
    })
}

pub fn compute_request_stats(logs: &[LogEntry]) -> RequestStats {
    let mut stats = RequestStats {
        logged: logs.len(),
        ..Default::default()
    };
    let mut total_duration = 0u64;
    let mut settled = 0u64;

    for entry in logs {
        match entry.status {
            LogStatus::Pending => stats.pending += 1,
            LogStatus::Success => stats.succeeded += 1,
            LogStatus::Error => stats.errors += 1,
            LogStatus::Timeout => stats.timeouts += 1,
        }
        if let Some(duration) = entry.duration_ms {
            total_duration += duration;
            settled += 1;
        }
    }

    if settled > 0 {
        stats.average_duration_ms = Some(total_duration as f64 / settled as f64);
    }
    stats
}

pub fn compute_audit_stats(audits: &[ComponentAudit]) -> AuditStats {
    AuditStats {
        total: audits.len(),
        ok: audits.iter().filter(|a| a.status == AuditStatus::Ok).count(),
        failed: audits.iter().filter(|a| a.status == AuditStatus::Fail).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::HttpMethod;

    fn entry(id: u64, status: LogStatus, duration_ms: Option<u64>) -> LogEntry {
        LogEntry {
            id,
            method: HttpMethod::Get,
            endpoint: "/streams".to_string(),
            status,
            start_time: 0,
            duration_ms,
            error: None,
            status_code: None,
        }
    }

    #[test]
    fn test_request_stats_empty() {
        let stats = compute_request_stats(&[]);
        assert_eq!(stats, RequestStats::default());
    }

    #[test]
    fn test_request_stats_breakdown() {
        let logs = vec![
            entry(4, LogStatus::Pending, None),
            entry(3, LogStatus::Timeout, Some(10_000)),
            entry(2, LogStatus::Error, Some(200)),
            entry(1, LogStatus::Success, Some(100)),
        ];

        let stats = compute_request_stats(&logs);
        assert_eq!(stats.logged, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.timeouts, 1);
        let average = stats.average_duration_ms.unwrap();
        assert!((average - 10_300.0 / 3.0).abs() < 1e-9);
    }
}
