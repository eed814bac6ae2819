//! # Metrics Types
//!
//! Data structures for the JSON stats response.

use crate::dispatch::ApiMode;
use crate::health::ConnectivityStatus;
use crate::scanner::ScanSummary;
use serde::Serialize;

/// JSON response for GET /v1/stats.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub mode: ApiMode,
    /// Breakdown of the request log currently held
    pub requests: RequestStats,
    pub connectivity: ConnectivityStats,
    /// Totals of the last integrity scan, absent before the first run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestStats {
    pub logged: usize,
    pub pending: usize,
    pub succeeded: usize,
    pub errors: usize,
    pub timeouts: usize,
    /// Mean duration of settled requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_duration_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityStats {
    pub status: ConnectivityStatus,
    pub latency_ms: i64,
    pub incidents: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}
