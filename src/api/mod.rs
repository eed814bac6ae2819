//! # Diagnostics HTTP surface
//!
//! JSON endpoints through which diagnostic screens drive the core.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness of this service plus current connectivity
//! - `GET|DELETE /v1/logs` - Request log (newest first) / clear it
//! - `GET|DELETE /v1/failures` - Failure list / clear it
//! - `GET /v1/connectivity` - Status, incident history and critical services
//! - `POST /v1/forensics` - Run a forensic sweep
//! - `GET|POST /v1/scan` - Last scan results / run a full scan
//! - `GET|POST /v1/audit` - Last audit results / run a full audit
//! - `GET /v1/endpoints` - Endpoint registry, optionally `?group=`
//! - `GET /v1/stats` - JSON summary
//! - `GET /metrics` - Prometheus metrics
//! - `GET /ws` - Live updates
//!
//! ## Example
//!
//! ```no_run
//! use livego::api::{create_router, AppState};
//! use livego::config::LivegoConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = Arc::new(AppState::new(Arc::new(LivegoConfig::default()))?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod diagnostics;
mod error;
mod health;
mod logs;

pub use diagnostics::{AuditReport, ConnectivityReport, EndpointQuery, ScanReport};
pub use error::{ErrorBody, ErrorResponse};
pub use health::HealthResponse;

use crate::auditor::AppAuditor;
use crate::client::{ApiClient, ApiSurface};
use crate::config::LivegoConfig;
use crate::dashboard::{types::WebSocketUpdate, websocket};
use crate::dispatch::{ApiError, Dispatcher};
use crate::health::ConnectivityMonitor;
use crate::metrics::MetricsCollector;
use crate::scanner::IntegrityScanner;
use crate::session::{SessionError, SessionStore};
use crate::tracker::{ApiTracker, Subscription};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64 KB); no endpoint takes a large body.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Buffered WebSocket updates per subscriber.
const BROADCAST_CAPACITY: usize = 256;

/// Failure to assemble the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open session store: {0}")]
    Session(#[from] SessionError),

    #[error("failed to configure API client: {0}")]
    Client(#[from] ApiError),
}

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<LivegoConfig>,
    pub tracker: Arc<ApiTracker>,
    pub client: Arc<ApiClient>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub scanner: Arc<IntegrityScanner>,
    pub auditor: Arc<AppAuditor>,
    pub metrics_collector: Arc<MetricsCollector>,
    /// Fan-out to WebSocket clients
    pub ws_broadcast: broadcast::Sender<WebSocketUpdate>,
    pub start_time: Instant,
    /// Tracker listeners feeding `ws_broadcast`; removed on drop
    _subscriptions: Vec<Subscription>,
}

impl AppState {
    /// Build the whole diagnostic core from configuration.
    pub fn new(config: Arc<LivegoConfig>) -> Result<Self, StateError> {
        let tracker = Arc::new(ApiTracker::with_capacity(config.api.tracker_capacity));
        let session = Arc::new(match &config.api.session_file {
            Some(path) => SessionStore::open(path)?,
            None => SessionStore::in_memory(),
        });
        let dispatcher = Arc::new(Dispatcher::from_config(
            &config.api,
            Arc::clone(&tracker),
            Arc::clone(&session),
        )?);
        let client = Arc::new(ApiClient::new(dispatcher, session));
        let monitor = Arc::new(ConnectivityMonitor::new(
            &config.api.base_url,
            config.monitor.clone(),
        ));
        Ok(Self::with_parts(config, tracker, client, monitor))
    }

    /// Assemble state around an existing client and monitor.
    pub fn with_parts(
        config: Arc<LivegoConfig>,
        tracker: Arc<ApiTracker>,
        client: Arc<ApiClient>,
        monitor: Arc<ConnectivityMonitor>,
    ) -> Self {
        let surface: Arc<dyn ApiSurface> = client.clone();
        let scanner = Arc::new(IntegrityScanner::new(
            Arc::clone(&surface),
            config.scan.clone(),
        ));
        let auditor = Arc::new(AppAuditor::new(surface, config.audit.clone()));

        let start_time = Instant::now();

        // Reuse an existing recorder when one is already installed (tests, embedding)
        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Metrics already initialized, using detached recorder");
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });
        let metrics_collector = Arc::new(MetricsCollector::new(
            Arc::clone(&tracker),
            Arc::clone(&monitor),
            start_time,
            prometheus_handle,
        ));

        let (ws_broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
        let subscriptions = vec![
            tracker.subscribe({
                let tx = ws_broadcast.clone();
                move |logs| {
                    let _ = tx.send(websocket::create_log_snapshot_update(logs));
                }
            }),
            tracker.subscribe_to_failures({
                let tx = ws_broadcast.clone();
                move |failures| {
                    let _ = tx.send(websocket::create_failure_snapshot_update(failures));
                }
            }),
        ];

        Self {
            config,
            tracker,
            client,
            monitor,
            scanner,
            auditor,
            metrics_collector,
            ws_broadcast,
            start_time,
            _subscriptions: subscriptions,
        }
    }

    /// Forward connectivity and service changes to WebSocket clients until
    /// `cancel_token` fires.
    pub fn forward_connectivity(&self, cancel_token: CancellationToken) -> JoinHandle<()> {
        let mut status_rx = self.monitor.subscribe();
        let mut services_rx = self.monitor.subscribe_services();
        let tx = self.ws_broadcast.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    changed = status_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let update = websocket::create_connectivity_update(&status_rx.borrow_and_update());
                        let _ = tx.send(update);
                    }
                    changed = services_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let update = websocket::create_services_update(&services_rx.borrow_and_update());
                        let _ = tx.send(update);
                    }
                }
            }
        })
    }
}

/// Create the router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.server.cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    };
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route("/health", get(health::handle))
        .route("/v1/logs", get(logs::list_logs).delete(logs::clear_logs))
        .route(
            "/v1/failures",
            get(logs::list_failures).delete(logs::clear_failures),
        )
        .route("/v1/connectivity", get(diagnostics::connectivity))
        .route("/v1/forensics", post(diagnostics::run_forensics))
        .route(
            "/v1/scan",
            get(diagnostics::last_scan).post(diagnostics::run_scan),
        )
        .route(
            "/v1/audit",
            get(diagnostics::last_audit).post(diagnostics::run_audit),
        )
        .route("/v1/endpoints", get(diagnostics::endpoints))
        .route("/v1/stats", get(crate::metrics::handler::stats_handler))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .route("/ws", get(websocket::websocket_handler))
        .layer(axum::middleware::from_fn(crate::logging::log_requests))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .with_state(state)
}
