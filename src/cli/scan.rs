//! Scan command implementation

use crate::cli::endpoints::select_endpoints;
use crate::cli::output::{check_icon, format_scan_json, format_scan_table};
use crate::cli::{build_client, ScanArgs};
use crate::client::ApiSurface;
use crate::scanner::{ApiTestResult, IntegrityScanner};
use std::sync::Arc;

/// One progress line for a probed endpoint
fn progress_line(index: usize, total: usize, result: &ApiTestResult) -> String {
    format!(
        "[{:>3}/{}] {} {}{}{}",
        index,
        total,
        result.path,
        check_icon(result.import_status),
        check_icon(result.call_status),
        check_icon(result.data_status),
    )
}

/// Handle `livego scan` command
pub async fn handle_scan(args: &ScanArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = args.target.load_config()?;
    let registry = select_endpoints(args.group.as_deref())?;
    let client = build_client(&config)?;

    let surface: Arc<dyn ApiSurface> = client;
    let scanner = IntegrityScanner::new(surface, config.scan.clone()).with_registry(registry);

    let total = scanner.registry().len();
    let mut index = 0;
    let quiet = args.json;
    let results = scanner
        .run_full_scan(|result| {
            index += 1;
            if !quiet {
                eprintln!("{}", progress_line(index, total, result));
            }
        })
        .await?;

    if args.json {
        Ok(format_scan_json(&results)?)
    } else {
        Ok(format_scan_table(&results))
    }
}
