//! Unit tests for health module.

use super::*;

fn failed(error: ProbeError) -> ProbeOutcome {
    ProbeOutcome::Failed { error }
}

fn reachable(latency_ms: u64) -> ProbeOutcome {
    ProbeOutcome::Reachable { latency_ms }
}

// ============================================================================
// T01: MonitorConfig Tests
// ============================================================================

#[test]
fn test_config_default_values() {
    let config = MonitorConfig::default();
    assert!(config.enabled);
    assert_eq!(config.interval_seconds, 5);
    assert_eq!(config.liveness_timeout_ms, 4_000);
    assert_eq!(config.forensic_timeout_ms, 3_000);
    assert_eq!(config.liveness_path, "/health");
}

#[test]
fn test_config_partial_toml() {
    let toml = r#"
        interval_seconds = 30
    "#;
    let config: MonitorConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.interval_seconds, 30);
    assert_eq!(config.liveness_timeout_ms, 4_000); // default
    assert!(config.enabled); // default
}

// ============================================================================
// T02: ProbeError Tests
// ============================================================================

#[test]
fn test_error_display() {
    assert_eq!(ProbeError::Timeout(4000).to_string(), "Timeout after 4000ms");
    assert_eq!(ProbeError::Http(503).to_string(), "HTTP 503");
    assert_eq!(
        ProbeError::Unreachable("refused".to_string()).to_string(),
        "Server unreachable: refused"
    );
}

#[test]
fn test_error_cause_labels() {
    assert_eq!(ProbeError::Timeout(1).cause(), "Timeout");
    assert_eq!(ProbeError::Unreachable(String::new()).cause(), "Unreachable");
    assert_eq!(ProbeError::Http(502).cause(), "HTTP 502");
    assert_eq!(ProbeError::Network("x".to_string()).cause(), "Network error");
}

// ============================================================================
// T03: ConnectivityState Transitions
// ============================================================================

#[test]
fn test_initial_state_is_reconnecting_with_unknown_latency() {
    let state = ConnectivityState::default();
    let snapshot = state.snapshot();
    assert_eq!(snapshot.status, ConnectivityStatus::Reconnecting);
    assert_eq!(snapshot.latency_ms, -1);
    assert!(snapshot.last_incident.is_none());
}

#[test]
fn test_success_sets_connected_and_latency() {
    let mut state = ConnectivityState::default();
    assert!(state.apply_outcome(reachable(42)).is_none());

    let snapshot = state.snapshot();
    assert_eq!(snapshot.status, ConnectivityStatus::Connected);
    assert_eq!(snapshot.latency_ms, 42);
}

#[test]
fn test_first_failure_records_incident() {
    let mut state = ConnectivityState::default();
    let incident = state
        .apply_outcome(failed(ProbeError::Timeout(4000)))
        .expect("transition into disconnected records an incident");

    assert_eq!(incident.status, ConnectivityStatus::Disconnected);
    assert_eq!(incident.latency_ms, -1);
    assert_eq!(incident.cause, "Timeout");
    assert_eq!(incident.details, "Timeout after 4000ms");
    assert_eq!(state.snapshot().latency_ms, -1);
}

#[test]
fn test_repeated_failures_record_single_incident() {
    let mut state = ConnectivityState::default();
    state.apply_outcome(reachable(10));

    for _ in 0..5 {
        state.begin_poll();
        state.apply_outcome(failed(ProbeError::Http(503)));
    }

    assert_eq!(state.incidents().len(), 1);
    assert_eq!(state.incidents()[0].cause, "HTTP 503");
}

#[test]
fn test_reconnecting_does_not_reset_disconnected() {
    let mut state = ConnectivityState::default();
    state.apply_outcome(failed(ProbeError::Http(500)));

    assert!(state.begin_poll());
    assert_eq!(state.snapshot().status, ConnectivityStatus::Reconnecting);

    assert!(state.apply_outcome(failed(ProbeError::Http(500))).is_none());
    assert_eq!(state.snapshot().status, ConnectivityStatus::Disconnected);
}

#[test]
fn test_begin_poll_while_connected_is_silent() {
    let mut state = ConnectivityState::default();
    state.apply_outcome(reachable(5));
    assert!(!state.begin_poll());
    assert_eq!(state.snapshot().status, ConnectivityStatus::Connected);
}

#[test]
fn test_recovery_then_failure_records_second_incident() {
    let mut state = ConnectivityState::default();
    state.apply_outcome(failed(ProbeError::Timeout(4000)));
    state.apply_outcome(reachable(12));
    state.apply_outcome(failed(ProbeError::Unreachable("refused".into())));

    assert_eq!(state.incidents().len(), 2);
    let last = state.snapshot().last_incident.unwrap();
    assert_eq!(last.cause, "Unreachable");
}

#[test]
fn test_scanning_overlays_status() {
    let mut state = ConnectivityState::default();
    state.apply_outcome(reachable(8));

    state.begin_sweep();
    assert_eq!(state.snapshot().status, ConnectivityStatus::Scanning);

    state.end_sweep();
    assert_eq!(state.snapshot().status, ConnectivityStatus::Connected);
    assert_eq!(state.snapshot().latency_ms, 8);
}

#[test]
fn test_overlapping_sweeps_keep_overlay_until_last_ends() {
    let mut state = ConnectivityState::default();
    state.apply_outcome(reachable(8));

    state.begin_sweep();
    state.begin_sweep();
    state.end_sweep();
    assert_eq!(state.snapshot().status, ConnectivityStatus::Scanning);

    state.end_sweep();
    assert_eq!(state.snapshot().status, ConnectivityStatus::Connected);

    // Unbalanced end is ignored
    state.end_sweep();
    state.begin_sweep();
    assert_eq!(state.snapshot().status, ConnectivityStatus::Scanning);
}

// ============================================================================
// T04: Critical Services
// ============================================================================

#[test]
fn test_critical_services_fixed_list() {
    let services = critical_services();
    let names: Vec<_> = services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Gateway", "Authentication", "Data", "Realtime"]);
    assert!(services.iter().all(|s| s.endpoint.starts_with('/')));
}

#[test]
fn test_service_classification() {
    let mut service = critical_services().remove(0);

    service.apply(&Ok(15));
    assert_eq!(service.status, ServiceStatus::Online);
    assert!(service.last_error.is_none());

    service.apply(&Err(ProbeError::Http(502)));
    assert_eq!(service.status, ServiceStatus::Error);
    assert_eq!(service.last_error.as_deref(), Some("HTTP 502"));

    service.apply(&Err(ProbeError::Timeout(3000)));
    assert_eq!(service.status, ServiceStatus::Offline);
    assert_eq!(service.last_error.as_deref(), Some("No response within 3000ms"));

    service.apply(&Err(ProbeError::Unreachable("refused".into())));
    assert_eq!(service.status, ServiceStatus::Offline);
    assert!(service.last_error.unwrap().contains("CORS"));
}

// ============================================================================
// T05: ConnectivityMonitor Construction
// ============================================================================

#[test]
fn test_monitor_starts_reconnecting() {
    let monitor = ConnectivityMonitor::new("http://localhost:9/", MonitorConfig::default());
    assert_eq!(monitor.snapshot().status, ConnectivityStatus::Reconnecting);
    assert!(monitor.incidents().is_empty());
    assert_eq!(monitor.services().len(), 4);
    assert_eq!(
        monitor.subscribe().borrow().status,
        ConnectivityStatus::Reconnecting
    );
}
