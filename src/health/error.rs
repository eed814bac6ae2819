//! Error types for connectivity probes.

use thiserror::Error;

/// Why a probe did not reach a healthy backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Probe timed out
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// TCP connection could not be established
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with a non-success status
    #[error("HTTP {0}")]
    Http(u16),

    /// Any other transport failure
    #[error("Network error: {0}")]
    Network(String),
}

impl ProbeError {
    /// Classify a reqwest error.
    pub fn classify(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout(timeout_ms)
        } else if e.is_connect() {
            ProbeError::Unreachable(e.to_string())
        } else {
            ProbeError::Network(e.to_string())
        }
    }

    /// Short cause label for incident records.
    pub fn cause(&self) -> String {
        match self {
            ProbeError::Timeout(_) => "Timeout".to_string(),
            ProbeError::Unreachable(_) => "Unreachable".to_string(),
            ProbeError::Http(code) => format!("HTTP {}", code),
            ProbeError::Network(_) => "Network error".to_string(),
        }
    }

    /// Human hint shown next to a failed critical service.
    pub fn hint(&self) -> String {
        match self {
            ProbeError::Timeout(ms) => format!("No response within {}ms", ms),
            ProbeError::Unreachable(_) => {
                "Network failure (connection refused, DNS or CORS)".to_string()
            }
            ProbeError::Http(code) => format!("HTTP {}", code),
            ProbeError::Network(message) => message.clone(),
        }
    }
}
