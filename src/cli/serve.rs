//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::LivegoConfig;
use crate::logging::init_tracing;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<LivegoConfig, Box<dyn std::error::Error>> {
    let mut config = args.target.load_config()?;

    // CLI flags have the highest priority
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_monitor {
        config.monitor.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

/// Wait for SIGINT, SIGTERM or an external cancel, then cancel `cancel_token`
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;
    init_tracing(&config.logging)?;

    tracing::info!(
        mode = ?config.api.mode,
        base_url = %config.api.base_url,
        "Starting LiveGo diagnostics"
    );
    tracing::debug!(?config, "Loaded configuration");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let monitor_enabled = config.monitor.enabled;

    let state = Arc::new(AppState::new(Arc::new(config))?);
    let app = create_router(Arc::clone(&state));

    let cancel_token = CancellationToken::new();
    let monitor_handle = if monitor_enabled {
        tracing::info!("Starting connectivity monitor");
        Some(Arc::clone(&state.monitor).start(cancel_token.clone()))
    } else {
        tracing::info!("Connectivity monitoring disabled");
        None
    };
    let forward_handle = state.forward_connectivity(cancel_token.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Diagnostics server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    if let Some(handle) = monitor_handle {
        tracing::info!("Waiting for connectivity monitor to stop");
        handle.await?;
    }
    forward_handle.await?;

    tracing::info!("Diagnostics server stopped");
    Ok(())
}
