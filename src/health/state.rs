//! Connectivity state machine.

use super::error::ProbeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Published connectivity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Connected,
    Disconnected,
    Reconnecting,
    /// Forensic sweep in progress
    Scanning,
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityStatus::Connected => "connected",
            ConnectivityStatus::Disconnected => "disconnected",
            ConnectivityStatus::Reconnecting => "reconnecting",
            ConnectivityStatus::Scanning => "scanning",
        };
        f.write_str(s)
    }
}

/// Record of a loss of connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub time: DateTime<Utc>,
    pub status: ConnectivityStatus,
    pub latency_ms: i64,
    pub cause: String,
    pub details: String,
}

/// What subscribers receive on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivitySnapshot {
    pub status: ConnectivityStatus,
    /// Round-trip of the last poll, -1 when unknown or failed
    pub latency_ms: i64,
    pub last_incident: Option<Incident>,
}

/// Result of one liveness poll.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Reachable { latency_ms: u64 },
    Failed { error: ProbeError },
}

/// Connectivity status plus incident history.
#[derive(Debug, Clone)]
pub struct ConnectivityState {
    status: ConnectivityStatus,
    latency_ms: i64,
    /// Outcome of the last completed poll
    settled: Option<ConnectivityStatus>,
    /// Forensic sweeps in flight
    sweeps: u32,
    incidents: Vec<Incident>,
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self {
            status: ConnectivityStatus::Reconnecting,
            latency_ms: -1,
            settled: None,
            sweeps: 0,
            incidents: Vec::new(),
        }
    }
}

impl ConnectivityState {
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        ConnectivitySnapshot {
            status: if self.sweeps > 0 {
                ConnectivityStatus::Scanning
            } else {
                self.status
            },
            latency_ms: self.latency_ms,
            last_incident: self.incidents.last().cloned(),
        }
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Mark the start of a poll.
    /// Returns true when the published status changed to Reconnecting.
    pub fn begin_poll(&mut self) -> bool {
        if self.status == ConnectivityStatus::Disconnected {
            self.status = ConnectivityStatus::Reconnecting;
            true
        } else {
            false
        }
    }

    /// Apply a poll outcome.
    /// Returns the incident when this poll moved the backend into Disconnected.
    pub fn apply_outcome(&mut self, outcome: ProbeOutcome) -> Option<Incident> {
        match outcome {
            ProbeOutcome::Reachable { latency_ms } => {
                self.status = ConnectivityStatus::Connected;
                self.latency_ms = latency_ms as i64;
                self.settled = Some(ConnectivityStatus::Connected);
                None
            }
            ProbeOutcome::Failed { error } => {
                self.status = ConnectivityStatus::Disconnected;
                self.latency_ms = -1;
                let was_disconnected = self.settled == Some(ConnectivityStatus::Disconnected);
                self.settled = Some(ConnectivityStatus::Disconnected);
                if was_disconnected {
                    return None;
                }

                let incident = Incident {
                    time: Utc::now(),
                    status: ConnectivityStatus::Disconnected,
                    latency_ms: -1,
                    cause: error.cause(),
                    details: error.to_string(),
                };
                self.incidents.push(incident.clone());
                Some(incident)
            }
        }
    }

    pub fn begin_sweep(&mut self) {
        self.sweeps += 1;
    }

    pub fn end_sweep(&mut self) {
        self.sweeps = self.sweeps.saturating_sub(1);
    }
}
