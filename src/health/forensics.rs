//! Critical subsystems probed by the forensic sweep.

use super::error::ProbeError;
use serde::{Deserialize, Serialize};

/// Health of one critical subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Responded successfully
    Online,
    /// Not reachable within the deadline
    Offline,
    /// Reachable but answered with an error status
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub name: String,
    pub endpoint: String,
    pub status: ServiceStatus,
    pub last_error: Option<String>,
}

impl ApiStatus {
    fn new(name: &str, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            status: ServiceStatus::Offline,
            last_error: None,
        }
    }

    /// Record a probe result.
    pub fn apply(&mut self, result: &Result<u64, ProbeError>) {
        let (status, last_error) = match result {
            Ok(_) => (ServiceStatus::Online, None),
            Err(e @ ProbeError::Http(_)) => (ServiceStatus::Error, Some(e.hint())),
            Err(e) => (ServiceStatus::Offline, Some(e.hint())),
        };
        self.status = status;
        self.last_error = last_error;
    }
}

/// Gateway, authentication, data and realtime subsystems.
pub fn critical_services() -> Vec<ApiStatus> {
    vec![
        ApiStatus::new("Gateway", "/health"),
        ApiStatus::new("Authentication", "/auth/session"),
        ApiStatus::new("Data", "/streams/live"),
        ApiStatus::new("Realtime", "/realtime/status"),
    ]
}
