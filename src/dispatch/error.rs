//! Error types for dispatched calls.

use crate::tracker::LogStatus;
use thiserror::Error;

/// Closed set of ways a backend call can fail.
///
/// The variants are surfaced by the transport itself so callers never have to
/// guess the failure kind from message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The call did not settle within its deadline.
    #[error("Timeout after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// Connection refused, DNS failure, or a blocked cross-origin request.
    #[error("Network unreachable: {0}")]
    Unreachable(String),

    /// Any other transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `message` comes from the server body when present.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body is not valid JSON.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The client has no usable binding for the call (missing route, wrong
    /// argument shape).
    #[error("Endpoint not wired: {0}")]
    Unwired(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// True when the failure means the call could not even be attempted.
    pub fn is_wiring(&self) -> bool {
        matches!(self, ApiError::Unwired(_))
    }

    /// Terminal status recorded in the request log.
    pub fn log_status(&self) -> LogStatus {
        if self.is_timeout() {
            LogStatus::Timeout
        } else {
            LogStatus::Error
        }
    }

    /// Short machine label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Timeout { .. } => "timeout",
            ApiError::Unreachable(_) => "unreachable",
            ApiError::Network(_) => "network",
            ApiError::Http { .. } => "http",
            ApiError::Decode(_) => "decode",
            ApiError::Unwired(_) => "unwired",
        }
    }

    /// Classify a reqwest transport error.
    pub fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            ApiError::Timeout {
                after_ms: timeout_ms,
            }
        } else if e.is_connect() {
            ApiError::Unreachable(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Pull a human-readable error out of a failed response body.
///
/// Looks for a top-level `message` or `error` string, or `error.message`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let direct = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);

    direct("message").or_else(|| direct("error")).or_else(|| {
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    })
}
