//! Audit command implementation

use crate::auditor::{AppAuditor, AuditStatus, ComponentAudit, SamplingPolicy};
use crate::cli::output::{format_audit_json, format_audit_table};
use crate::cli::{build_client, AuditArgs};
use crate::client::ApiSurface;
use crate::metrics::handler::compute_audit_stats;
use colored::Colorize;
use std::sync::Arc;

fn progress_line(index: usize, total: usize, audit: &ComponentAudit) -> String {
    let verdict = match audit.status {
        AuditStatus::Ok => "ok".green(),
        AuditStatus::Fail => "fail".red(),
        AuditStatus::Pending => "pending".yellow(),
    };
    format!("[{:>2}/{}] {} {}", index, total, audit.name, verdict)
}

/// Handle `livego audit` command
pub async fn handle_audit(args: &AuditArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = args.target.load_config()?;
    if let Some(ref sampling) = args.sampling {
        config.audit.sampling = sampling.parse::<SamplingPolicy>()?;
    }
    let client = build_client(&config)?;

    let surface: Arc<dyn ApiSurface> = client;
    let auditor = AppAuditor::new(surface, config.audit.clone());

    let total = auditor.components().len();
    let mut index = 0;
    let quiet = args.json;
    let audits = auditor
        .run_full_app_audit(|audit| {
            index += 1;
            if !quiet {
                eprintln!("{}", progress_line(index, total, audit));
            }
        })
        .await?;

    let stats = compute_audit_stats(&audits);
    if args.json {
        Ok(format_audit_json(&audits, &stats)?)
    } else {
        Ok(format_audit_table(&audits, &stats))
    }
}
