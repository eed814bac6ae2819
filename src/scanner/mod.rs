//! Endpoint integrity scanner.
//!
//! Walks the endpoint registry in declaration order and probes each entry on
//! three independent dimensions: the endpoint is wired to a route, a call
//! with its dummy arguments settles, and the settled call carries a payload.
//! Probes run strictly one after another; a failing probe never stops the run.

mod config;
mod error;
mod result;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::*;
pub use result::*;

use crate::client::{ApiSurface, Endpoint};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Marks a run as in progress until dropped.
pub(crate) struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool, what: &'static str) -> Result<Self, ScanError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::AlreadyRunning(what))?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Probes every registered endpoint.
pub struct IntegrityScanner {
    api: Arc<dyn ApiSurface>,
    config: ScanConfig,
    registry: Vec<Endpoint>,
    results: RwLock<Vec<ApiTestResult>>,
    running: AtomicBool,
}

impl IntegrityScanner {
    /// Scanner over the full endpoint registry.
    pub fn new(api: Arc<dyn ApiSurface>, config: ScanConfig) -> Self {
        Self {
            api,
            config,
            registry: Endpoint::ALL.to_vec(),
            results: RwLock::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Restrict the scan to `registry`, kept in the given order.
    pub fn with_registry(mut self, registry: Vec<Endpoint>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &[Endpoint] {
        &self.registry
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Probe a single endpoint.
    pub async fn probe(&self, endpoint: Endpoint) -> ApiTestResult {
        let mut result = ApiTestResult {
            path: endpoint.path().to_string(),
            group: endpoint.group().to_string(),
            import_status: CheckStatus::Fail,
            call_status: CheckStatus::Fail,
            data_status: CheckStatus::Fail,
            response_time_ms: None,
            error: None,
        };

        if self.api.resolve(endpoint).is_none() {
            result.error = Some(format!("Endpoint not wired: {}", endpoint.path()));
            return result;
        }
        result.import_status = CheckStatus::Ok;

        let budget = Duration::from_millis(self.config.call_timeout_ms);
        let start = Instant::now();
        let outcome =
            tokio::time::timeout(budget, self.api.invoke(endpoint, endpoint.dummy_args())).await;
        result.response_time_ms = Some(start.elapsed().as_millis() as u64);

        match outcome {
            Ok(Ok(payload)) => {
                result.call_status = CheckStatus::Ok;
                result.data_status = CheckStatus::from_bool(!payload.is_null());
            }
            Ok(Err(e)) => {
                // A rejected call still proves the endpoint is callable.
                result.call_status = CheckStatus::from_bool(!e.is_wiring());
                result.error = Some(e.to_string());
            }
            Err(_) => {
                result.error = Some(format!("Timeout after {}ms", self.config.call_timeout_ms));
            }
        }

        metrics::counter!("livego_scan_probes_total",
            "outcome" => if result.is_healthy() { "healthy" } else { "degraded" }
        )
        .increment(1);
        result
    }

    /// Probe the whole registry.
    ///
    /// `on_progress` is called once per endpoint, in order, right after its
    /// probe settles. Returns `ScanError::AlreadyRunning` if another scan is
    /// in flight on this scanner.
    pub async fn run_full_scan<F>(&self, mut on_progress: F) -> Result<Vec<ApiTestResult>, ScanError>
    where
        F: FnMut(&ApiTestResult),
    {
        let _guard = RunGuard::acquire(&self.running, "scan")?;
        let pacing = Duration::from_millis(self.config.pacing_ms);
        let started = Instant::now();

        tracing::info!(endpoints = self.registry.len(), "Integrity scan started");

        let mut results = Vec::with_capacity(self.registry.len());
        for &endpoint in &self.registry {
            let result = self.probe(endpoint).await;
            tracing::debug!(
                endpoint = %endpoint,
                import = ?result.import_status,
                call = ?result.call_status,
                data = ?result.data_status,
                "Endpoint probed"
            );
            on_progress(&result);
            results.push(result);

            if !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }

        let summary = ScanSummary::from_results(&results);
        tracing::info!(
            total = summary.total,
            healthy = summary.healthy,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Integrity scan completed"
        );

        *self.results.write().unwrap_or_else(|p| p.into_inner()) = results.clone();
        Ok(results)
    }

    /// Results of the most recent completed scan.
    pub fn last_results(&self) -> Vec<ApiTestResult> {
        self.results
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
