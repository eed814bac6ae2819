//! Output formatting helpers for CLI commands

use crate::auditor::{AuditStatus, ComponentAudit};
use crate::client::EndpointDescriptor;
use crate::health::{ApiStatus, ConnectivitySnapshot, ConnectivityStatus, ServiceStatus};
use crate::metrics::AuditStats;
use crate::scanner::{ApiTestResult, CheckStatus, ScanSummary};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Icon for one check dimension
pub fn check_icon(status: CheckStatus) -> String {
    match status {
        CheckStatus::Ok => "✓".green().to_string(),
        CheckStatus::Fail => "✗".red().to_string(),
    }
}

fn flag_icon(ok: bool) -> String {
    check_icon(CheckStatus::from_bool(ok))
}

fn duration_cell(ms: Option<u64>) -> String {
    ms.map(|ms| format!("{}ms", ms)).unwrap_or_else(|| "-".to_string())
}

/// Format scan results as a table followed by a totals line
pub fn format_scan_table(results: &[ApiTestResult]) -> String {
    let mut table = new_table(vec![
        "Endpoint", "Group", "Import", "Call", "Data", "Time", "Error",
    ]);

    for r in results {
        table.add_row(vec![
            Cell::new(&r.path),
            Cell::new(&r.group),
            Cell::new(check_icon(r.import_status)),
            Cell::new(check_icon(r.call_status)),
            Cell::new(check_icon(r.data_status)),
            Cell::new(duration_cell(r.response_time_ms)),
            Cell::new(r.error.as_deref().unwrap_or("")),
        ]);
    }

    let summary = ScanSummary::from_results(results);
    format!(
        "{}\n{} healthy, {} unwired, {} call failures, {} empty payloads ({} total)",
        table, summary.healthy, summary.unwired, summary.call_failures, summary.empty_payloads,
        summary.total
    )
}

/// Format scan results as JSON
pub fn format_scan_json(results: &[ApiTestResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "summary": ScanSummary::from_results(results),
        "results": results,
    }))
}

fn audit_status_cell(status: AuditStatus) -> String {
    match status {
        AuditStatus::Ok => "OK".green().to_string(),
        AuditStatus::Fail => "FAIL".red().to_string(),
        AuditStatus::Pending => "PENDING".yellow().to_string(),
    }
}

/// Format component audits as a table followed by a totals line
pub fn format_audit_table(audits: &[ComponentAudit], stats: &AuditStats) -> String {
    let mut table = new_table(vec![
        "Component", "Status", "Import", "Call", "Payload", "Dependencies", "Errors",
    ]);

    for a in audits {
        table.add_row(vec![
            Cell::new(&a.name),
            Cell::new(audit_status_cell(a.status)),
            Cell::new(flag_icon(a.import_verified)),
            Cell::new(flag_icon(a.call_verified)),
            Cell::new(flag_icon(a.payload_valid)),
            Cell::new(a.api_dependencies.join(", ")),
            Cell::new(a.error_log.as_deref().unwrap_or("")),
        ]);
    }

    format!(
        "{}\n{}/{} components ok",
        table, stats.ok, stats.total
    )
}

/// Format component audits as JSON
pub fn format_audit_json(audits: &[ComponentAudit], stats: &AuditStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "summary": stats,
        "components": audits,
    }))
}

fn connectivity_label(status: ConnectivityStatus) -> String {
    match status {
        ConnectivityStatus::Connected => "Connected".green().to_string(),
        ConnectivityStatus::Disconnected => "Disconnected".red().to_string(),
        ConnectivityStatus::Reconnecting => "Reconnecting".yellow().to_string(),
        ConnectivityStatus::Scanning => "Scanning".cyan().to_string(),
    }
}

/// Format a forensic sweep as text
pub fn format_forensics_pretty(snapshot: &ConnectivitySnapshot, services: &[ApiStatus]) -> String {
    let latency = if snapshot.latency_ms >= 0 {
        format!("{}ms", snapshot.latency_ms)
    } else {
        "-".to_string()
    };

    let mut table = new_table(vec!["Service", "Endpoint", "Status", "Last Error"]);
    for s in services {
        let status = match s.status {
            ServiceStatus::Online => "Online".green().to_string(),
            ServiceStatus::Offline => "Offline".red().to_string(),
            ServiceStatus::Error => "Error".yellow().to_string(),
        };
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.endpoint),
            Cell::new(status),
            Cell::new(s.last_error.as_deref().unwrap_or("")),
        ]);
    }

    let mut output = format!(
        "Backend: {} (latency {})\n",
        connectivity_label(snapshot.status),
        latency
    );
    if let Some(incident) = &snapshot.last_incident {
        output.push_str(&format!(
            "Last incident: {} at {} ({})\n",
            incident.cause,
            incident.time.format("%Y-%m-%d %H:%M:%S UTC"),
            incident.details
        ));
    }
    output.push('\n');
    output.push_str(&table.to_string());
    output
}

/// Format a forensic sweep as JSON
pub fn format_forensics_json(
    snapshot: &ConnectivitySnapshot,
    services: &[ApiStatus],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "connectivity": snapshot,
        "services": services,
    }))
}

/// Format the endpoint registry as a table
pub fn format_endpoints_table(endpoints: &[EndpointDescriptor]) -> String {
    let mut table = new_table(vec!["Endpoint", "Group", "Method", "Route"]);
    for e in endpoints {
        table.add_row(vec![
            Cell::new(e.path),
            Cell::new(e.group),
            Cell::new(e.method),
            Cell::new(e.route),
        ]);
    }
    format!("{}\n{} endpoints", table, endpoints.len())
}

/// Format the endpoint registry as JSON
pub fn format_endpoints_json(endpoints: &[EndpointDescriptor]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "endpoints": endpoints
    }))
}
