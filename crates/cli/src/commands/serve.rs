//! Serve command implementation
//!
//! This module implements the `tickets serve` command, which runs the REST
//! API until the process is asked to stop.

use anyhow::{Context, Result};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tickets_adapters::{HttpServer, ServerConfig};
use tokio::signal;
use tracing::{error, info, warn};

/// Arguments for the serve command
pub struct ServeArgs {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON file holding the tickets
    pub data: PathBuf,
}

/// Execute the serve command
pub async fn execute_serve_command(args: ServeArgs) -> Result<()> {
    println!("🎫 Starting ticket server...");
    println!("📁 Data file: {}", args.data.display());
    println!("🔌 Port: {}", args.port);
    println!();

    validate_data_path(&args.data)?;

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        data_file: args.data,
    };
    let server = HttpServer::new(config);
    println!("📡 Listening on: {}", server.config().listen_addr());
    println!();

    server
        .run(wait_for_shutdown())
        .await
        .context("Ticket server exited with an error")?;

    println!("✅ Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Validate the data file path.
///
/// The parent directory is created if needed so the first write succeeds;
/// a path that names a directory is rejected.
pub fn validate_data_path(data_path: &Path) -> Result<()> {
    if data_path.is_dir() {
        anyhow::bail!("Data path {} is a directory, expected a file", data_path.display());
    }

    if let Some(parent) = data_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
    }

    Ok(())
}
