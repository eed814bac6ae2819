//! Request dispatcher.
//!
//! Every backend call goes through [`Dispatcher::request`]: the attempt is
//! registered in the [`ApiTracker`], raced against a deadline, executed by the
//! configured [`Transport`] (in-memory mock or live HTTP), and the outcome is
//! written back to the tracker. A call whose future is dropped before it
//! settles is recorded as cancelled, so no entry is left pending.

mod error;
mod http;
mod mock;

pub use error::*;
pub use http::HttpTransport;
pub use mock::{MockDatabase, MockTransport};

pub use crate::tracker::HttpMethod;

use crate::session::SessionStore;
use crate::tracker::{ApiTracker, LogStatus, LogUpdate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default dispatcher deadline.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Which backend the dispatcher talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// Synthetic in-memory backend
    #[default]
    Mock,
    /// Real HTTP backend
    Live,
}

impl FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(ApiMode::Mock),
            "live" | "real" => Ok(ApiMode::Live),
            _ => Err(format!("Invalid API mode: {}", s)),
        }
    }
}

/// One outgoing call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Successful transport response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Executes a single request against some backend.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    fn mode(&self) -> ApiMode;

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Single chokepoint for backend calls.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    tracker: Arc<ApiTracker>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, tracker: Arc<ApiTracker>, timeout: Duration) -> Self {
        Self {
            transport,
            tracker,
            timeout,
        }
    }

    /// Build the transport selected by `config.mode`.
    pub fn from_config(
        config: &crate::config::ApiConfig,
        tracker: Arc<ApiTracker>,
        session: Arc<SessionStore>,
    ) -> Result<Self, ApiError> {
        let transport: Arc<dyn Transport> = match config.mode {
            ApiMode::Mock => Arc::new(
                MockTransport::new().with_latency(Duration::from_millis(config.mock_latency_ms)),
            ),
            ApiMode::Live => Arc::new(HttpTransport::new(&config.base_url, session)?),
        };

        tracing::debug!(mode = ?config.mode, base_url = %config.base_url, "Dispatcher configured");
        Ok(Self::new(
            transport,
            tracker,
            Duration::from_millis(config.request_timeout_ms),
        ))
    }

    pub fn mode(&self) -> ApiMode {
        self.transport.mode()
    }

    pub fn tracker(&self) -> &Arc<ApiTracker> {
        &self.tracker
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request and return the parsed payload.
    ///
    /// Timeouts, transport failures, HTTP errors and malformed bodies all come
    /// back as `Err`; the log entry records which one it was.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut pending = PendingLog::new(&self.tracker, method, path);
        let start = pending.start;

        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
        };

        let outcome = match tokio::time::timeout(self.timeout, self.transport.send(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            }),
        };

        let elapsed = start.elapsed();
        let status_label = match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::histogram!("livego_request_duration_seconds",
            "method" => method.as_str()
        )
        .record(elapsed.as_secs_f64());
        metrics::counter!("livego_requests_total",
            "method" => method.as_str(),
            "status" => status_label
        )
        .increment(1);

        match outcome {
            Ok(response) => {
                pending.settle(LogUpdate {
                    status_code: Some(response.status),
                    ..LogUpdate::success()
                });
                tracing::debug!(
                    method = %method,
                    path = path,
                    status = response.status,
                    latency_ms = elapsed.as_millis() as u64,
                    "Request succeeded"
                );
                Ok(response.body)
            }
            Err(error) => {
                pending.settle(LogUpdate::failed(
                    error.log_status(),
                    error.to_string(),
                    error.status_code(),
                ));
                tracing::debug!(
                    method = %method,
                    path = path,
                    error = %error,
                    latency_ms = elapsed.as_millis() as u64,
                    "Request failed"
                );
                Err(error)
            }
        }
    }
}

/// Log entry of an in-flight call, settled exactly once.
///
/// Dropping it unsettled (the request future was cancelled by an outer
/// deadline or a disconnected caller) marks the entry as an error.
struct PendingLog<'a> {
    tracker: &'a ApiTracker,
    id: u64,
    start: Instant,
    settled: bool,
}

impl<'a> PendingLog<'a> {
    fn new(tracker: &'a ApiTracker, method: HttpMethod, path: &str) -> Self {
        Self {
            tracker,
            id: tracker.add_log(method, path),
            start: Instant::now(),
            settled: false,
        }
    }

    fn settle(&mut self, update: LogUpdate) {
        let duration_ms = self.start.elapsed().as_millis() as u64;
        self.tracker.update_log(self.id, update.with_duration(duration_ms));
        self.settled = true;
    }
}

impl Drop for PendingLog<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let duration_ms = self.start.elapsed().as_millis() as u64;
        tracing::debug!(
            log_id = self.id,
            latency_ms = duration_ms,
            "Request cancelled before settling"
        );
        metrics::counter!("livego_requests_total", "status" => "cancelled").increment(1);
        self.tracker.update_log(
            self.id,
            LogUpdate::failed(
                LogStatus::Error,
                format!("Request cancelled after {}ms", duration_ms),
                None,
            )
            .with_duration(duration_ms),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct SlowTransport {
        delay: Duration,
    }

    #[async_trait]
    impl Transport for SlowTransport {
        fn mode(&self) -> ApiMode {
            ApiMode::Mock
        }

        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
            tokio::time::sleep(self.delay).await;
            Ok(ApiResponse {
                status: 200,
                body: json!({"late": true}),
            })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        fn mode(&self) -> ApiMode {
            ApiMode::Live
        }

        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
            Err(ApiError::Http {
                status: 503,
                message: "Maintenance".to_string(),
            })
        }
    }

    fn dispatcher_with(transport: Arc<dyn Transport>, timeout: Duration) -> Dispatcher {
        Dispatcher::new(transport, Arc::new(ApiTracker::new()), timeout)
    }

    #[test]
    fn test_api_mode_from_str() {
        assert_eq!(ApiMode::from_str("mock").unwrap(), ApiMode::Mock);
        assert_eq!(ApiMode::from_str("LIVE").unwrap(), ApiMode::Live);
        assert_eq!(ApiMode::from_str("real").unwrap(), ApiMode::Live);
        assert!(ApiMode::from_str("fake").is_err());
    }

    #[tokio::test]
    async fn test_success_logged_with_status_code() {
        let dispatcher = dispatcher_with(Arc::new(MockTransport::new()), Duration::from_secs(10));

        let body = dispatcher
            .request(HttpMethod::Get, "/health", None)
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");

        let logs = dispatcher.tracker().logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Success);
        assert_eq!(logs[0].status_code, Some(200));
        assert!(logs[0].duration_ms.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_wins_race() {
        let dispatcher = dispatcher_with(
            Arc::new(SlowTransport {
                delay: Duration::from_secs(30),
            }),
            Duration::from_secs(10),
        );

        let started = tokio::time::Instant::now();
        let err = dispatcher
            .request(HttpMethod::Get, "/slow", None)
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Timeout { after_ms: 10_000 });
        assert!(started.elapsed() < Duration::from_secs(11));

        let logs = dispatcher.tracker().logs();
        assert_eq!(logs[0].status, LogStatus::Timeout);
        assert_eq!(dispatcher.tracker().failures().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_call_is_settled_as_cancelled() {
        let dispatcher = dispatcher_with(
            Arc::new(SlowTransport {
                delay: Duration::from_secs(30),
            }),
            Duration::from_secs(10),
        );

        // Outer deadline shorter than the dispatcher's own
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.request(HttpMethod::Get, "/slow", None),
        )
        .await;
        assert!(outcome.is_err());

        let logs = dispatcher.tracker().logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Error);
        assert!(logs[0].duration_ms.is_some());
        assert!(logs[0]
            .error
            .as_deref()
            .unwrap()
            .starts_with("Request cancelled after"));
        assert_eq!(dispatcher.tracker().failures().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_settling_before_deadline_succeeds() {
        let dispatcher = dispatcher_with(
            Arc::new(SlowTransport {
                delay: Duration::from_secs(2),
            }),
            Duration::from_secs(10),
        );

        let body = dispatcher
            .request(HttpMethod::Get, "/slow", None)
            .await
            .unwrap();
        assert_eq!(body["late"], true);
    }

    #[tokio::test]
    async fn test_http_error_logged_with_code_and_message() {
        let dispatcher = dispatcher_with(Arc::new(FailingTransport), Duration::from_secs(10));

        let err = dispatcher
            .request(HttpMethod::Post, "/streams", Some(json!({"title": "x"})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));

        let failures = dispatcher.tracker().failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].status, LogStatus::Error);
        assert_eq!(failures[0].status_code, Some(503));
        assert_eq!(failures[0].error.as_deref(), Some("Maintenance"));
        assert_eq!(failures[0].method, HttpMethod::Post);
    }
}
