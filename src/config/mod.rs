//! Configuration module for LiveGo diagnostics
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LIVEGO_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use livego::config::LivegoConfig;
//!
//! let toml = r#"
//! [api]
//! mode = "live"
//! base_url = "https://api.example.com"
//! "#;
//! let config: LivegoConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "https://api.example.com");
//! assert_eq!(config.scan.call_timeout_ms, 5000);
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod server;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

// Section types owned by their subsystems
pub use crate::auditor::{AuditConfig, SamplingPolicy};
pub use crate::health::MonitorConfig;
pub use crate::scanner::ScanConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LivegoConfig {
    /// Diagnostics HTTP surface
    pub server: ServerConfig,
    /// Backend connection and dispatcher
    pub api: ApiConfig,
    /// Connectivity monitor
    pub monitor: MonitorConfig,
    /// Integrity scanner
    pub scan: ScanConfig,
    /// Component auditor
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

impl LivegoConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply `LIVEGO_*` environment overrides.
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("LIVEGO_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(mode) = std::env::var("LIVEGO_API_MODE") {
            if let Ok(m) = mode.parse() {
                self.api.mode = m;
            }
        }

        if let Ok(port) = std::env::var("LIVEGO_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("LIVEGO_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("LIVEGO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LIVEGO_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(monitor) = std::env::var("LIVEGO_MONITOR") {
            self.monitor.enabled = monitor.to_lowercase() == "true";
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "URL cannot be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "api.base_url",
                "URL must start with http:// or https://",
            ));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "api.request_timeout_ms",
                "timeout must be non-zero",
            ));
        }
        if self.api.tracker_capacity == 0 {
            return Err(ConfigError::invalid(
                "api.tracker_capacity",
                "capacity must be at least 1",
            ));
        }

        if self.monitor.interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "monitor.interval_seconds",
                "interval must be non-zero",
            ));
        }
        if !self.monitor.liveness_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "monitor.liveness_path",
                "path must start with '/'",
            ));
        }

        for (field, value) in [
            ("monitor.liveness_timeout_ms", self.monitor.liveness_timeout_ms),
            ("monitor.forensic_timeout_ms", self.monitor.forensic_timeout_ms),
            ("scan.call_timeout_ms", self.scan.call_timeout_ms),
            ("audit.call_timeout_ms", self.audit.call_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "timeout must be non-zero"));
            }
        }

        Ok(())
    }
}
