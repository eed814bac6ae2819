//! # Metrics Collection Module
//!
//! Prometheus export and a JSON stats view of the diagnostic core.
//!
//! ## Endpoints
//!
//! - `GET /metrics` - Prometheus text format
//! - `GET /v1/stats` - JSON summary
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `livego_requests_total{method, status}` - Dispatched backend calls
//! - `livego_connectivity_incidents_total` - Transitions into disconnected
//! - `livego_scan_probes_total{outcome}` - Endpoints probed by the scanner
//!
//! **Histograms:**
//! - `livego_request_duration_seconds{method}` - Dispatcher round-trip
//! - `livego_liveness_latency_seconds` - Liveness poll round-trip
//!
//! **Gauges:**
//! - `livego_tracker_logs` / `livego_tracker_failures` - Request log sizes
//! - `livego_connectivity_latency_ms` - Last liveness latency (-1 when down)
//! - `livego_connected` - 1 while the backend is reachable
//! - `livego_audit_failed_components` - Failed components in the last audit

pub mod handler;
pub mod types;

pub use types::*;

use crate::health::{ConnectivityMonitor, ConnectivityStatus};
use crate::tracker::ApiTracker;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Computes derived gauges and renders the exporter output.
pub struct MetricsCollector {
    tracker: Arc<ApiTracker>,
    monitor: Arc<ConnectivityMonitor>,
    start_time: Instant,
    prometheus_handle: PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(
        tracker: Arc<ApiTracker>,
        monitor: Arc<ConnectivityMonitor>,
        start_time: Instant,
        prometheus_handle: PrometheusHandle,
    ) -> Self {
        Self {
            tracker,
            monitor,
            start_time,
            prometheus_handle,
        }
    }

    /// Refresh gauges derived from tracker and monitor state.
    pub fn update_gauges(&self) {
        metrics::gauge!("livego_tracker_logs").set(self.tracker.logs().len() as f64);
        metrics::gauge!("livego_tracker_failures").set(self.tracker.failures().len() as f64);

        let snapshot = self.monitor.snapshot();
        metrics::gauge!("livego_connectivity_latency_ms").set(snapshot.latency_ms as f64);
        let connected = matches!(snapshot.status, ConnectivityStatus::Connected);
        metrics::gauge!("livego_connected").set(if connected { 1.0 } else { 0.0 });
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize the Prometheus exporter.
///
/// Duration buckets cover fast mock responses up to the dispatcher's
/// 10 second deadline.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let duration_buckets = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("livego_request_duration_seconds".to_string()),
            duration_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("livego_liveness_latency_seconds".to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}


#[cfg(test)]
mod tests {
    use super::test_support::test_handle;
    use super::*;
    use crate::health::MonitorConfig;
    use crate::tracker::HttpMethod;

    fn collector() -> (Arc<ApiTracker>, MetricsCollector) {
        let tracker = Arc::new(ApiTracker::new());
        let monitor = Arc::new(ConnectivityMonitor::new(
            "http://localhost:9",
            MonitorConfig::default(),
        ));
        let collector = MetricsCollector::new(tracker.clone(), monitor, Instant::now(), test_handle());
        (tracker, collector)
    }

    #[test]
    fn test_collector_uptime_starts_at_zero() {
        let (_, collector) = collector();
        assert!(collector.uptime_seconds() < 1);
    }

    #[test]
    fn test_gauges_rendered() {
        let (tracker, collector) = collector();
        tracker.add_log(HttpMethod::Get, "/health");

        collector.update_gauges();
        let rendered = collector.render_metrics();

        assert!(rendered.contains("livego_tracker_logs"));
        assert!(rendered.contains("livego_connected"));
    }
}
