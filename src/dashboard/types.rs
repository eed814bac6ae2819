//! Messages pushed to connected diagnostic screens

use serde::{Deserialize, Serialize};

/// WebSocket update message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketUpdate {
    pub update_type: UpdateType,
    /// JSON payload for the update
    pub data: serde_json::Value,
}

/// Type of WebSocket update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// Full request log after a mutation
    LogSnapshot,
    /// Full failure list after a mutation
    FailureSnapshot,
    /// Connectivity status changed
    Connectivity,
    /// Forensic sweep refreshed the critical services
    Services,
    /// One endpoint probed during a scan
    ScanProgress,
    /// One component audited
    AuditProgress,
}

/// Payload of progress updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress<T> {
    /// 1-based position in the run
    pub index: usize,
    pub total: usize,
    pub item: T,
}
