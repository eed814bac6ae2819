//! Per-endpoint probe results.

use serde::{Deserialize, Serialize};

/// Outcome of one check dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Fail,
}

impl CheckStatus {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            CheckStatus::Ok
        } else {
            CheckStatus::Fail
        }
    }

    pub fn is_ok(self) -> bool {
        self == CheckStatus::Ok
    }
}

/// Three-dimension health of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTestResult {
    /// Dotted endpoint name
    pub path: String,
    pub group: String,
    /// Endpoint resolved to a route
    pub import_status: CheckStatus,
    /// Call executed (any settled response counts)
    pub call_status: CheckStatus,
    /// Call returned a non-null payload
    pub data_status: CheckStatus,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
}

impl ApiTestResult {
    pub fn is_healthy(&self) -> bool {
        self.import_status.is_ok() && self.call_status.is_ok() && self.data_status.is_ok()
    }
}

/// Totals over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub healthy: usize,
    pub unwired: usize,
    pub call_failures: usize,
    pub empty_payloads: usize,
}

impl ScanSummary {
    pub fn from_results(results: &[ApiTestResult]) -> Self {
        let mut summary = ScanSummary {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            if result.is_healthy() {
                summary.healthy += 1;
            } else if !result.import_status.is_ok() {
                summary.unwired += 1;
            } else if !result.call_status.is_ok() {
                summary.call_failures += 1;
            } else {
                summary.empty_payloads += 1;
            }
        }
        summary
    }
}
