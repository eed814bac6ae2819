//! Configuration for connectivity monitoring.

use serde::{Deserialize, Serialize};

/// Configuration for the connectivity monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Whether periodic polling runs under `serve`
    pub enabled: bool,
    /// Seconds between liveness polls
    pub interval_seconds: u64,
    /// Timeout for each liveness poll
    pub liveness_timeout_ms: u64,
    /// Timeout for each forensic probe
    pub forensic_timeout_ms: u64,
    /// Path polled for liveness
    pub liveness_path: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 5,
            liveness_timeout_ms: 4_000,
            forensic_timeout_ms: 3_000,
            liveness_path: "/health".to_string(),
        }
    }
}
