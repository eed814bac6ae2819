//! Integration tests for dispatching against a live HTTP backend.

mod common;

use livego::client::{ApiSurface, CallArgs, Endpoint};
use livego::dispatch::{ApiError, HttpMethod};
use livego::tracker::LogStatus;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend() -> (MockServer, String) {
    let server = MockServer::start().await;
    let base_url = format!("{}/api", server.uri());
    (server, base_url)
}

// =============================================================================
// Success path
// =============================================================================

#[tokio::test]
async fn test_get_returns_payload_and_logs_success() {
    let (server, base_url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/streams/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "s1"}])))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    let payload = t
        .client
        .invoke(Endpoint::StreamsGetLive, CallArgs::None)
        .await
        .unwrap();
    assert_eq!(payload, json!([{"id": "s1"}]));

    let logs = t.tracker.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].method, HttpMethod::Get);
    assert_eq!(logs[0].endpoint, "/streams/live");
    assert_eq!(logs[0].status, LogStatus::Success);
    assert_eq!(logs[0].status_code, Some(200));
    assert!(logs[0].duration_ms.is_some());
    assert!(t.tracker.failures().is_empty());
}

#[tokio::test]
async fn test_login_sends_credentials_and_stores_token() {
    let (server, base_url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "admin@livego.com", "password": "123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"id": "u1", "name": "Admin"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    t.client.login("admin@livego.com", "123").await.unwrap();
    assert_eq!(t.session.token().as_deref(), Some("tok-1"));
    assert_eq!(t.session.user().unwrap()["name"], "Admin");

    let me = t.client.me().await.unwrap();
    assert_eq!(me["id"], "u1");
}

#[tokio::test]
async fn test_path_id_is_substituted() {
    let (server, base_url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/users/42/follow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"following": true})))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    let payload = t
        .client
        .invoke(Endpoint::UsersFollow, CallArgs::id("42"))
        .await
        .unwrap();
    assert_eq!(payload["following"], true);
}

#[tokio::test]
async fn test_empty_body_is_null_payload() {
    let (server, base_url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    t.session.set_token("tok-1").unwrap();
    t.client.logout().await.unwrap();
    assert!(t.session.token().is_none());
}

// =============================================================================
// Failure classification
// =============================================================================

#[tokio::test]
async fn test_http_error_uses_server_message() {
    let (server, base_url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/wallet/balance"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Session expired"})),
        )
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    let err = t
        .client
        .invoke(Endpoint::WalletGetBalance, CallArgs::None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 401,
            message: "Session expired".to_string()
        }
    );

    let failures = t.tracker.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].status, LogStatus::Error);
    assert_eq!(failures[0].status_code, Some(401));
    assert_eq!(failures[0].error.as_deref(), Some("Session expired"));
}

#[tokio::test]
async fn test_http_error_without_body_falls_back_to_status() {
    let (server, base_url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/gifts"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    let err = t
        .client
        .invoke(Endpoint::GiftsList, CallArgs::None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let (server, base_url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/streams/live"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    let err = t
        .client
        .invoke(Endpoint::StreamsGetLive, CallArgs::None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(t.tracker.failures().len(), 1);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let (server, base_url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/streams/live"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let t = common::live_client(&base_url, Duration::from_millis(200));
    let err = t
        .client
        .invoke(Endpoint::StreamsGetLive, CallArgs::None)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout { after_ms: 200 });
    assert_eq!(err.to_string(), "Timeout after 200ms");

    let logs = t.tracker.logs();
    assert_eq!(logs[0].status, LogStatus::Timeout);
    assert_eq!(t.tracker.failures()[0].id, logs[0].id);
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 9 locally
    let t = common::live_client("http://127.0.0.1:9/api", Duration::from_secs(2));
    let err = t
        .client
        .invoke(Endpoint::StreamsGetLive, CallArgs::None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unreachable(_) | ApiError::Network(_)));
    assert_eq!(t.tracker.logs()[0].status, LogStatus::Error);
}

#[tokio::test]
async fn test_missing_path_id_never_reaches_backend() {
    let (server, base_url) = backend().await;

    let t = common::live_client(&base_url, Duration::from_secs(2));
    let err = t
        .client
        .invoke(Endpoint::UsersFollow, CallArgs::None)
        .await
        .unwrap_err();
    assert!(err.is_wiring());
    assert!(t.tracker.logs().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}
