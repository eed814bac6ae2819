use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verb of a tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Lifecycle state of a tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    /// Dispatched, not yet settled
    Pending,
    Success,
    Error,
    /// The dispatcher's own deadline fired first
    Timeout,
}

impl LogStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LogStatus::Pending)
    }

    /// Error and Timeout entries are mirrored into the failure list.
    pub fn is_failure(&self) -> bool {
        matches!(self, LogStatus::Error | LogStatus::Timeout)
    }
}

/// One attempted network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic id assigned by the tracker
    pub id: u64,
    pub method: HttpMethod,
    /// Request path, e.g. `/users/friends`
    pub endpoint: String,
    pub status: LogStatus,
    /// Dispatch time in epoch milliseconds
    pub start_time: i64,
    /// Set on the terminal transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Partial update merged into an existing [`LogEntry`].
///
/// `None` fields leave the entry untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogUpdate {
    pub status: Option<LogStatus>,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

impl LogUpdate {
    pub fn success() -> Self {
        Self {
            status: Some(LogStatus::Success),
            ..Default::default()
        }
    }

    pub fn failed(status: LogStatus, error: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            status: Some(status),
            error: Some(error.into()),
            status_code,
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

impl LogEntry {
    /// Merge an update, computing the duration on terminal transitions
    /// that don't carry an explicit one.
    pub(crate) fn merge(&mut self, update: LogUpdate, now_ms: i64) {
        if let Some(status) = update.status {
            self.status = status;
            if status.is_terminal() && update.duration_ms.is_none() {
                self.duration_ms = Some((now_ms - self.start_time).max(0) as u64);
            }
        }
        if let Some(duration_ms) = update.duration_ms {
            self.duration_ms = Some(duration_ms);
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        if let Some(code) = update.status_code {
            self.status_code = Some(code);
        }
    }
}
