//! CLI module for LiveGo diagnostics
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the diagnostics HTTP surface with live monitoring
//! - `scan` - Probe every registered endpoint once
//! - `audit` - Audit UI components against their endpoints
//! - `forensics` - Check backend reachability and critical services
//! - `monitor` - Watch backend connectivity until interrupted
//! - `endpoints` - List the endpoint registry
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Scan the in-memory backend
//! livego scan
//!
//! # Audit a real backend, calling every dependency
//! livego audit --live --base-url https://api.example.com/api --sampling all
//!
//! # Generate shell completions
//! livego completions bash > ~/.bash_completion.d/livego
//! ```

pub mod audit;
pub mod completions;
pub mod config;
pub mod endpoints;
pub mod forensics;
pub mod monitor;
pub mod output;
pub mod scan;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::client::ApiClient;
use crate::config::LivegoConfig;
use crate::dispatch::{ApiMode, Dispatcher};
use crate::session::SessionStore;
use crate::tracker::ApiTracker;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_CONFIG: &str = "livego.toml";

/// LiveGo diagnostics
#[derive(Parser, Debug)]
#[command(
    name = "livego",
    version,
    about = "Diagnostics for the LiveGo streaming backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the diagnostics server
    Serve(ServeArgs),
    /// Probe every registered endpoint
    Scan(ScanArgs),
    /// Audit UI components
    Audit(AuditArgs),
    /// Check backend reachability and critical services
    Forensics(ForensicsArgs),
    /// Watch backend connectivity
    Monitor(MonitorArgs),
    /// List registered endpoints
    Endpoints(EndpointsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where the backend lives and how to reach it.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override the backend base URL
    #[arg(short, long, env = "LIVEGO_BASE_URL")]
    pub base_url: Option<String>,

    /// Talk to the real backend instead of the in-memory one
    #[arg(long, conflicts_with = "mock")]
    pub live: bool,

    /// Force the in-memory backend
    #[arg(long)]
    pub mock: bool,
}

impl TargetArgs {
    /// Load configuration and apply environment then CLI overrides.
    pub fn load_config(&self) -> Result<LivegoConfig, Box<dyn std::error::Error>> {
        let mut config = if self.config.exists() {
            LivegoConfig::load(Some(&self.config))?
        } else {
            tracing::debug!("Config file not found, using defaults");
            LivegoConfig::default()
        };

        config = config.with_env_overrides();

        if let Some(ref base_url) = self.base_url {
            config.api.base_url = base_url.clone();
        }
        if self.live {
            config.api.mode = ApiMode::Live;
        }
        if self.mock {
            config.api.mode = ApiMode::Mock;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Override server port
    #[arg(short, long, env = "LIVEGO_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "LIVEGO_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LIVEGO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable periodic connectivity polling
    #[arg(long)]
    pub no_monitor: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only probe endpoints of this group
    #[arg(short, long)]
    pub group: Option<String>,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Which dependencies to call (first, all)
    #[arg(short, long)]
    pub sampling: Option<String>,
}

#[derive(Args, Debug)]
pub struct ForensicsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Override the polling interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Stop after this many polls
    #[arg(long)]
    pub polls: Option<u32>,
}

#[derive(Args, Debug)]
pub struct EndpointsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only list endpoints of this group
    #[arg(short, long)]
    pub group: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Build a standalone API client for one-shot commands.
pub fn build_client(config: &LivegoConfig) -> Result<Arc<ApiClient>, Box<dyn std::error::Error>> {
    let tracker = Arc::new(ApiTracker::with_capacity(config.api.tracker_capacity));
    let session = Arc::new(match &config.api.session_file {
        Some(path) => SessionStore::open(path)?,
        None => SessionStore::in_memory(),
    });
    let dispatcher = Dispatcher::from_config(&config.api, tracker, Arc::clone(&session))?;
    Ok(Arc::new(ApiClient::new(Arc::new(dispatcher), session)))
}
