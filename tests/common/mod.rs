//! Shared test utilities for LiveGo integration tests.

#![allow(dead_code)]

use livego::api::{create_router, AppState};
use livego::client::ApiClient;
use livego::config::LivegoConfig;
use livego::dispatch::{Dispatcher, HttpTransport, MockTransport, Transport};
use livego::health::ConnectivityMonitor;
use livego::session::SessionStore;
use livego::tracker::ApiTracker;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Default configuration with all pacing removed and short deadlines.
pub fn fast_config() -> LivegoConfig {
    let mut config = LivegoConfig::default();
    config.scan.pacing_ms = 0;
    config.scan.call_timeout_ms = 2_000;
    config.audit.pacing_ms = 0;
    config.audit.trivial_pacing_ms = 0;
    config.audit.call_timeout_ms = 2_000;
    config.monitor.liveness_timeout_ms = 1_000;
    config.monitor.forensic_timeout_ms = 1_000;
    config
}

// =============================================================================
// Clients
// =============================================================================

pub struct TestClient {
    pub tracker: Arc<ApiTracker>,
    pub session: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
}

fn client_over(
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    timeout: Duration,
) -> TestClient {
    let tracker = Arc::new(ApiTracker::new());
    let dispatcher = Dispatcher::new(transport, Arc::clone(&tracker), timeout);
    let client = Arc::new(ApiClient::new(Arc::new(dispatcher), Arc::clone(&session)));
    TestClient {
        tracker,
        session,
        client,
    }
}

/// Client backed by the in-memory backend.
pub fn mock_client() -> TestClient {
    client_over(
        Arc::new(MockTransport::new()),
        Arc::new(SessionStore::in_memory()),
        Duration::from_secs(5),
    )
}

/// In-memory backend that answers every call after `latency`.
pub fn slow_mock_client(latency: Duration, timeout: Duration) -> TestClient {
    client_over(
        Arc::new(MockTransport::new().with_latency(latency)),
        Arc::new(SessionStore::in_memory()),
        timeout,
    )
}

/// Client talking HTTP to `base_url` with a per-call deadline.
pub fn live_client(base_url: &str, timeout: Duration) -> TestClient {
    let session = Arc::new(SessionStore::in_memory());
    let transport =
        HttpTransport::with_client(reqwest::Client::new(), base_url, Arc::clone(&session));
    client_over(Arc::new(transport), session, timeout)
}

// =============================================================================
// App Builders
// =============================================================================

/// Application state over the in-memory backend; the monitor targets
/// `monitor_url`.
pub fn make_state(config: LivegoConfig, monitor_url: &str) -> Arc<AppState> {
    let test_client = mock_client();
    let monitor = Arc::new(ConnectivityMonitor::new(monitor_url, config.monitor.clone()));
    Arc::new(AppState::with_parts(
        Arc::new(config),
        test_client.tracker,
        test_client.client,
        monitor,
    ))
}

/// Router plus the state behind it.
pub fn make_app(monitor_url: &str) -> (axum::Router, Arc<AppState>) {
    let state = make_state(fast_config(), monitor_url);
    (create_router(Arc::clone(&state)), state)
}
