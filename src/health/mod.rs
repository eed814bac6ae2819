//! Connectivity monitoring.
//!
//! A background loop polls a single liveness endpoint and classifies the
//! backend as connected or disconnected, recording an incident each time it
//! goes down. An on-demand forensic sweep probes the critical subsystems
//! individually.

mod config;
mod error;
mod forensics;
mod state;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::*;
pub use forensics::*;
pub use state::*;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Scanning overlay held for the lifetime of one forensic sweep.
struct SweepGuard<'a> {
    monitor: &'a ConnectivityMonitor,
}

impl<'a> SweepGuard<'a> {
    fn begin(monitor: &'a ConnectivityMonitor) -> Self {
        monitor.update_sweeps(ConnectivityState::begin_sweep);
        Self { monitor }
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.monitor.update_sweeps(ConnectivityState::end_sweep);
    }
}

/// Background service that tracks backend reachability.
pub struct ConnectivityMonitor {
    /// HTTP client shared by liveness and forensic probes
    client: reqwest::Client,
    base_url: String,
    config: MonitorConfig,
    state: Mutex<ConnectivityState>,
    status_tx: watch::Sender<ConnectivitySnapshot>,
    services_tx: watch::Sender<Vec<ApiStatus>>,
}

impl ConnectivityMonitor {
    pub fn new(base_url: &str, config: MonitorConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("livego-diagnostics/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self::with_client(base_url, config, client)
    }

    /// Create a monitor with a custom HTTP client (for testing).
    pub fn with_client(base_url: &str, config: MonitorConfig, client: reqwest::Client) -> Self {
        let state = ConnectivityState::default();
        let (status_tx, _) = watch::channel(state.snapshot());
        let (services_tx, _) = watch::channel(critical_services());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
            state: Mutex::new(state),
            status_tx,
            services_tx,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectivityState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// GET `{base_url}{path}`; returns the round-trip in ms.
    async fn probe(&self, path: &str, timeout_ms: u64) -> Result<u64, ProbeError> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| ProbeError::classify(e, timeout_ms))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        if !response.status().is_success() {
            return Err(ProbeError::Http(response.status().as_u16()));
        }
        Ok(latency_ms)
    }

    /// Run one liveness poll and publish the result.
    pub async fn check_once(&self) -> ConnectivitySnapshot {
        {
            let mut state = self.lock_state();
            if state.begin_poll() {
                self.status_tx.send_replace(state.snapshot());
            }
        }

        let outcome = match self
            .probe(&self.config.liveness_path, self.config.liveness_timeout_ms)
            .await
        {
            Ok(latency_ms) => ProbeOutcome::Reachable { latency_ms },
            Err(error) => ProbeOutcome::Failed { error },
        };

        if let ProbeOutcome::Reachable { latency_ms } = &outcome {
            metrics::histogram!("livego_liveness_latency_seconds")
                .record(*latency_ms as f64 / 1000.0);
        }

        let (snapshot, previous, incident) = {
            let mut state = self.lock_state();
            let incident = state.apply_outcome(outcome);
            let snapshot = state.snapshot();
            let previous = self.status_tx.send_replace(snapshot.clone());
            (snapshot, previous, incident)
        };

        if let Some(incident) = &incident {
            metrics::counter!("livego_connectivity_incidents_total").increment(1);
            tracing::warn!(
                cause = %incident.cause,
                details = %incident.details,
                "Backend connectivity lost"
            );
        }

        if previous.status != snapshot.status {
            tracing::info!(
                old_status = %previous.status,
                new_status = %snapshot.status,
                latency_ms = snapshot.latency_ms,
                "Connectivity status changed"
            );
        }
        snapshot
    }

    /// Probe each critical subsystem and refresh the service list.
    ///
    /// Every service is probed even when earlier ones fail. The published
    /// status reads Scanning while any sweep is in flight, including sweeps
    /// whose future is dropped midway.
    pub async fn run_api_forensics(&self) -> Vec<ApiStatus> {
        let _sweep = SweepGuard::begin(self);
        tracing::info!("API forensics started");

        let mut services = self.services();
        for service in services.iter_mut() {
            let result = self
                .probe(&service.endpoint, self.config.forensic_timeout_ms)
                .await;
            service.apply(&result);
            tracing::debug!(
                service = %service.name,
                endpoint = %service.endpoint,
                status = ?service.status,
                "Critical service probed"
            );
        }

        self.services_tx.send_replace(services.clone());

        let online = services
            .iter()
            .filter(|s| s.status == ServiceStatus::Online)
            .count();
        tracing::info!(online, total = services.len(), "API forensics completed");
        services
    }

    fn update_sweeps(&self, update: impl FnOnce(&mut ConnectivityState)) {
        let mut state = self.lock_state();
        update(&mut state);
        // Published under the lock so overlapping sweeps publish in order
        self.status_tx.send_replace(state.snapshot());
    }

    /// Receiver that starts with the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivitySnapshot> {
        self.status_tx.subscribe()
    }

    pub fn subscribe_services(&self) -> watch::Receiver<Vec<ApiStatus>> {
        self.services_tx.subscribe()
    }

    pub fn snapshot(&self) -> ConnectivitySnapshot {
        self.lock_state().snapshot()
    }

    pub fn incidents(&self) -> Vec<Incident> {
        self.lock_state().incidents().to_vec()
    }

    pub fn services(&self) -> Vec<ApiStatus> {
        self.services_tx.borrow().clone()
    }

    /// Start the polling loop.
    /// Returns a JoinHandle that resolves once `cancel_token` fires.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.config.interval_seconds,
                base_url = %self.base_url,
                "Connectivity monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Connectivity monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let snapshot = self.check_once().await;
                        tracing::debug!(
                            status = %snapshot.status,
                            latency_ms = snapshot.latency_ms,
                            "Liveness poll completed"
                        );
                    }
                }
            }
        })
    }
}
