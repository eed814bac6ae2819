//! Monitor command implementation

use crate::cli::MonitorArgs;
use crate::health::{ConnectivityMonitor, ConnectivitySnapshot, ConnectivityStatus};
use colored::Colorize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One line per published connectivity change
pub fn format_status_line(snapshot: &ConnectivitySnapshot) -> String {
    let status = match snapshot.status {
        ConnectivityStatus::Connected => "connected".green(),
        ConnectivityStatus::Disconnected => "disconnected".red(),
        ConnectivityStatus::Reconnecting => "reconnecting".yellow(),
        ConnectivityStatus::Scanning => "scanning".cyan(),
    };
    let mut line = format!(
        "{} {}",
        chrono::Utc::now().format("%H:%M:%S"),
        status
    );
    if snapshot.latency_ms >= 0 {
        line.push_str(&format!(" {}ms", snapshot.latency_ms));
    }
    if snapshot.status == ConnectivityStatus::Disconnected {
        if let Some(incident) = &snapshot.last_incident {
            line.push_str(&format!(" ({})", incident.details));
        }
    }
    line
}

/// Handle `livego monitor` command
///
/// Polls liveness at the configured interval and prints every status change
/// until interrupted, or until `--polls` polls have completed.
pub async fn handle_monitor(args: &MonitorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = args.target.load_config()?;
    if let Some(interval) = args.interval {
        config.monitor.interval_seconds = interval.max(1);
    }

    let monitor = Arc::new(ConnectivityMonitor::new(
        &config.api.base_url,
        config.monitor.clone(),
    ));
    let mut rx = monitor.subscribe();

    println!(
        "Monitoring {}{} every {}s",
        config.api.base_url, config.monitor.liveness_path, config.monitor.interval_seconds
    );

    let cancel_token = CancellationToken::new();
    let handle = Arc::clone(&monitor).start(cancel_token.clone());

    // Each poll publishes at least once; Reconnecting while down is extra
    let mut polls = 0u32;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if snapshot.status == ConnectivityStatus::Reconnecting {
                    continue;
                }
                println!("{}", format_status_line(&snapshot));
                polls += 1;
                if args.polls.is_some_and(|limit| polls >= limit) {
                    break;
                }
            }
        }
    }

    cancel_token.cancel();
    handle.await?;

    let incidents = monitor.incidents();
    if !incidents.is_empty() {
        println!("{} incident(s) recorded", incidents.len());
    }
    Ok(())
}
