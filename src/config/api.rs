//! Backend API configuration

use crate::dispatch::{ApiMode, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::tracker::DEFAULT_LOG_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the client reaches the LiveGo backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the REST API, e.g. `https://api.livego.app/api`
    pub base_url: String,
    pub mode: ApiMode,
    /// Dispatcher deadline for every call
    pub request_timeout_ms: u64,
    /// Artificial delay added by the mock backend
    pub mock_latency_ms: u64,
    /// Where the session token and user are persisted; in memory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
    /// Number of request log entries kept
    pub tracker_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            mode: ApiMode::Mock,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            mock_latency_ms: 0,
            session_file: None,
            tracker_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}
