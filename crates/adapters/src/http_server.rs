//! HTTP server.
//!
//! Binds the ticket router to a TCP port and serves it until a shutdown
//! signal arrives, letting in-flight requests finish first.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tickets_storage::TicketStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::{build_router, AppState};

/// Default port when none is configured
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON file holding the ticket collection
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_file: PathBuf::from("data.json"),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// The ticket REST server.
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Creates a new [`HttpServer`] backed by the configured data file.
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::new(TicketStore::new(&config.data_file));
        Self { config, state }
    }

    /// Access the configuration associated with this server.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The router serving this server's routes.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr().context("Listener has no local address")?;
        info!("Server listening on port {}", local_addr.port());
        info!("Tickets stored in {}", self.config.data_file.display());

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")?;

        info!("Server stopped");
        Ok(())
    }
}
