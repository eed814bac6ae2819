//! WebSocket handler for live diagnostic updates

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::auditor::ComponentAudit;
use crate::dashboard::types::{Progress, UpdateType, WebSocketUpdate};
use crate::health::{ApiStatus, ConnectivitySnapshot};
use crate::scanner::ApiTestResult;
use crate::tracker::LogEntry;

/// Messages above this size are dropped rather than truncated.
const MAX_MESSAGE_BYTES: usize = 64 * 1024;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut rx = state.ws_broadcast.subscribe();

    // Current connectivity first so screens render without waiting for a change.
    let initial = create_connectivity_update(&state.monitor.snapshot());

    let send_task = tokio::spawn(async move {
        let mut pending = Some(initial);
        loop {
            let update = match pending.take() {
                Some(update) => update,
                None => match rx.recv().await {
                    Ok(update) => update,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "WebSocket client lagging, updates skipped");
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            };

            match serde_json::to_string(&update) {
                Ok(json) => {
                    if json.len() > MAX_MESSAGE_BYTES {
                        tracing::warn!(
                            bytes = json.len(),
                            update_type = ?update.update_type,
                            "WebSocket message exceeds size limit, skipping"
                        );
                        continue;
                    }
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize WebSocket update");
                }
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }
}

fn make_update<T: Serialize>(update_type: UpdateType, data: &T) -> WebSocketUpdate {
    WebSocketUpdate {
        update_type,
        data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
    }
}

pub fn create_log_snapshot_update(logs: &[LogEntry]) -> WebSocketUpdate {
    make_update(UpdateType::LogSnapshot, &logs)
}

pub fn create_failure_snapshot_update(failures: &[LogEntry]) -> WebSocketUpdate {
    make_update(UpdateType::FailureSnapshot, &failures)
}

pub fn create_connectivity_update(snapshot: &ConnectivitySnapshot) -> WebSocketUpdate {
    make_update(UpdateType::Connectivity, snapshot)
}

pub fn create_services_update(services: &[ApiStatus]) -> WebSocketUpdate {
    make_update(UpdateType::Services, &services)
}

pub fn create_scan_progress_update(
    index: usize,
    total: usize,
    result: &ApiTestResult,
) -> WebSocketUpdate {
    make_update(
        UpdateType::ScanProgress,
        &Progress {
            index,
            total,
            item: result,
        },
    )
}

pub fn create_audit_progress_update(
    index: usize,
    total: usize,
    audit: &ComponentAudit,
) -> WebSocketUpdate {
    make_update(
        UpdateType::AuditProgress,
        &Progress {
            index,
            total,
            item: audit,
        },
    )
}
