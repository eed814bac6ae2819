//! Forensics command implementation

use crate::cli::output::{format_forensics_json, format_forensics_pretty};
use crate::cli::ForensicsArgs;
use crate::health::ConnectivityMonitor;

/// Handle `livego forensics` command
///
/// Polls liveness once, then sweeps the critical services. Always talks to
/// the configured base URL, whatever the API mode.
pub async fn handle_forensics(args: &ForensicsArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = args.target.load_config()?;
    let monitor = ConnectivityMonitor::new(&config.api.base_url, config.monitor.clone());

    monitor.check_once().await;
    let services = monitor.run_api_forensics().await;
    let snapshot = monitor.snapshot();

    if args.json {
        Ok(format_forensics_json(&snapshot, &services)?)
    } else {
        Ok(format_forensics_pretty(&snapshot, &services))
    }
}
