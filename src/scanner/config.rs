//! Configuration for the integrity scanner.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Budget for each probed call
    pub call_timeout_ms: u64,
    /// Delay after each endpoint so progress renders incrementally
    pub pacing_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 5_000,
            pacing_ms: 50,
        }
    }
}
