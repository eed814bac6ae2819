//! Unit tests for the integrity scanner.

use super::*;
use crate::client::{CallArgs, Route};
use crate::dispatch::ApiError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Mutex;

/// Scriptable `ApiSurface` that records every invocation.
struct FakeSurface {
    unwired: HashSet<Endpoint>,
    slow: HashSet<Endpoint>,
    respond: fn(Endpoint) -> Result<Value, ApiError>,
    calls: Mutex<Vec<(Endpoint, CallArgs)>>,
}

impl FakeSurface {
    fn new(respond: fn(Endpoint) -> Result<Value, ApiError>) -> Self {
        Self {
            unwired: HashSet::new(),
            slow: HashSet::new(),
            respond,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(Endpoint, CallArgs)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiSurface for FakeSurface {
    fn resolve(&self, endpoint: Endpoint) -> Option<Route> {
        (!self.unwired.contains(&endpoint)).then(|| endpoint.route())
    }

    async fn invoke(&self, endpoint: Endpoint, args: CallArgs) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push((endpoint, args));
        if self.slow.contains(&endpoint) {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        (self.respond)(endpoint)
    }
}

fn ok_payload(_: Endpoint) -> Result<Value, ApiError> {
    Ok(json!({"ok": true}))
}

fn rejected(_: Endpoint) -> Result<Value, ApiError> {
    Err(ApiError::Http {
        status: 401,
        message: "Invalid credentials".to_string(),
    })
}

fn scanner(surface: FakeSurface, registry: Vec<Endpoint>) -> (Arc<FakeSurface>, IntegrityScanner) {
    let surface = Arc::new(surface);
    let scanner = IntegrityScanner::new(surface.clone(), ScanConfig::default())
        .with_registry(registry);
    (surface, scanner)
}

// ============================================================================
// T01: Full sweep
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_sweep_reports_every_endpoint_in_order() {
    let mut surface = FakeSurface::new(ok_payload);
    surface.unwired = Endpoint::ALL.iter().copied().collect();
    let (_, scanner) = scanner(surface, Endpoint::ALL.to_vec());

    let mut seen = Vec::new();
    let results = scanner
        .run_full_scan(|r| seen.push(r.path.clone()))
        .await
        .unwrap();

    assert_eq!(seen.len(), Endpoint::ALL.len());
    assert_eq!(results.len(), Endpoint::ALL.len());
    for (endpoint, result) in Endpoint::ALL.iter().zip(&results) {
        assert_eq!(result.path, endpoint.path());
        assert_eq!(result.import_status, CheckStatus::Fail);
        assert_eq!(result.call_status, CheckStatus::Fail);
        assert_eq!(result.data_status, CheckStatus::Fail);
    }
    assert_eq!(seen, results.iter().map(|r| r.path.clone()).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_healthy_endpoint_passes_all_checks() {
    let (surface, scanner) = scanner(FakeSurface::new(ok_payload), vec![Endpoint::UsersGetFriends]);

    let results = scanner.run_full_scan(|_| {}).await.unwrap();

    assert!(results[0].is_healthy());
    assert!(results[0].error.is_none());
    assert!(results[0].response_time_ms.is_some());
    assert_eq!(surface.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_null_payload_fails_data_check() {
    let (_, scanner) = scanner(FakeSurface::new(|_| Ok(Value::Null)), vec![Endpoint::AuthLogout]);

    let results = scanner.run_full_scan(|_| {}).await.unwrap();

    assert_eq!(results[0].call_status, CheckStatus::Ok);
    assert_eq!(results[0].data_status, CheckStatus::Fail);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_call_still_counts_as_executed() {
    let (_, scanner) = scanner(FakeSurface::new(rejected), vec![Endpoint::WalletGetBalance]);

    let results = scanner.run_full_scan(|_| {}).await.unwrap();

    assert_eq!(results[0].import_status, CheckStatus::Ok);
    assert_eq!(results[0].call_status, CheckStatus::Ok);
    assert_eq!(results[0].data_status, CheckStatus::Fail);
    assert_eq!(results[0].error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test(start_paused = true)]
async fn test_wiring_error_fails_call_check() {
    let (_, scanner) = scanner(
        FakeSurface::new(|e| Err(ApiError::Unwired(e.path().to_string()))),
        vec![Endpoint::StreamsGet],
    );

    let results = scanner.run_full_scan(|_| {}).await.unwrap();

    assert_eq!(results[0].import_status, CheckStatus::Ok);
    assert_eq!(results[0].call_status, CheckStatus::Fail);
    assert_eq!(results[0].data_status, CheckStatus::Fail);
}

// ============================================================================
// T02: Timeout classification
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_call_classified_as_timeout() {
    let mut surface = FakeSurface::new(ok_payload);
    surface.slow.insert(Endpoint::StreamsGetLive);
    let (_, scanner) = scanner(
        surface,
        vec![Endpoint::StreamsGetLive, Endpoint::StreamsList],
    );

    let started = tokio::time::Instant::now();
    let results = scanner.run_full_scan(|_| {}).await.unwrap();

    assert_eq!(results[0].import_status, CheckStatus::Ok);
    assert_eq!(results[0].call_status, CheckStatus::Fail);
    assert_eq!(results[0].data_status, CheckStatus::Fail);
    assert_eq!(results[0].error.as_deref(), Some("Timeout after 5000ms"));
    // The next endpoint is still probed.
    assert!(results[1].is_healthy());
    assert!(started.elapsed() < Duration::from_secs(10));
}

// ============================================================================
// T03: auth.login scenario
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_login_probed_with_credentials() {
    let (surface, scanner) = scanner(FakeSurface::new(rejected), vec![Endpoint::AuthLogin]);

    let results = scanner.run_full_scan(|_| {}).await.unwrap();

    assert_eq!(results[0].group, "Auth");
    assert_eq!(results[0].path, "auth.login");
    assert_eq!(results[0].import_status, CheckStatus::Ok);

    let calls = surface.calls();
    assert_eq!(calls.len(), 1);
    let (endpoint, args) = &calls[0];
    assert_eq!(*endpoint, Endpoint::AuthLogin);
    assert_eq!(args.arity(), 2);
    assert_eq!(*args, CallArgs::credentials("admin@livego.com", "123"));
}

// ============================================================================
// T04: Run bookkeeping
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_concurrent_scan_rejected() {
    let mut surface = FakeSurface::new(ok_payload);
    surface.slow.insert(Endpoint::SystemHealth);
    let (_, scanner) = scanner(surface, vec![Endpoint::SystemHealth]);

    let (first, second) = tokio::join!(
        scanner.run_full_scan(|_| {}),
        scanner.run_full_scan(|_| {})
    );

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), ScanError::AlreadyRunning("scan"));
    assert!(!scanner.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_last_results_replaced_each_run() {
    let (_, scanner) = scanner(FakeSurface::new(ok_payload), vec![Endpoint::GiftsList]);
    assert!(scanner.last_results().is_empty());

    scanner.run_full_scan(|_| {}).await.unwrap();
    assert_eq!(scanner.last_results().len(), 1);

    scanner.run_full_scan(|_| {}).await.unwrap();
    assert_eq!(scanner.last_results().len(), 1);
}

#[test]
fn test_summary_buckets() {
    let make = |import, call, data| ApiTestResult {
        path: "x".to_string(),
        group: "X".to_string(),
        import_status: import,
        call_status: call,
        data_status: data,
        response_time_ms: None,
        error: None,
    };
    use CheckStatus::{Fail, Ok};
    let results = vec![
        make(Ok, Ok, Ok),
        make(Fail, Fail, Fail),
        make(Ok, Fail, Fail),
        make(Ok, Ok, Fail),
        make(Ok, Ok, Ok),
    ];

    let summary = ScanSummary::from_results(&results);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.healthy, 2);
    assert_eq!(summary.unwired, 1);
    assert_eq!(summary.call_failures, 1);
    assert_eq!(summary.empty_payloads, 1);
}
