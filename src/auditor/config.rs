//! Configuration for the component auditor.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which dependencies of a component are actually called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Call only the first declared dependency
    #[default]
    FirstDependency,
    /// Call every declared dependency
    AllDependencies,
}

impl FromStr for SamplingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first" | "first_dependency" => Ok(SamplingPolicy::FirstDependency),
            "all" | "all_dependencies" => Ok(SamplingPolicy::AllDependencies),
            _ => Err(format!("Invalid sampling policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Delay after each component with dependencies
    pub pacing_ms: u64,
    /// Delay after each component without dependencies
    pub trivial_pacing_ms: u64,
    /// Budget for each sampled call
    pub call_timeout_ms: u64,
    pub sampling: SamplingPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 350,
            trivial_pacing_ms: 100,
            call_timeout_ms: 5_000,
            sampling: SamplingPolicy::FirstDependency,
        }
    }
}
