//! HTTP surface
//!
//! Thin axum layer over the extraction pipeline. The session manager lives in
//! the router state; when the server stops, for a signal or an error, the
//! shared browser is shut down before returning.

mod handlers;
mod routes;
mod types;

pub use routes::create_router;
pub use types::{CloseResponse, ErrorResponse, ExtractionResponse, HealthResponse};

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::ExtractorConfig;
use crate::session::{BrowserLauncher, SessionManager};

/// Shared state for the web server
pub struct AppState<L: BrowserLauncher> {
    pub manager: Arc<SessionManager<L>>,
    pub config: Arc<ExtractorConfig>,
}

impl<L: BrowserLauncher> AppState<L> {
    #[must_use]
    pub fn new(config: ExtractorConfig, launcher: L) -> Self {
        Self {
            manager: SessionManager::new(launcher),
            config: Arc::new(config),
        }
    }
}

impl<L: BrowserLauncher> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            config: Arc::clone(&self.config),
        }
    }
}

/// Run the server until Ctrl-C or SIGTERM, then close the browser
pub async fn serve<L: BrowserLauncher>(config: ExtractorConfig, launcher: L) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr()))?;

    let state = AppState::new(config, launcher);
    let manager = Arc::clone(&state.manager);
    let app = create_router(state);

    let result = async {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("Video link extractor listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")
    }
    .await;

    info!("Server stopped, closing browser");
    manager.shutdown().await;
    result
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Received Ctrl-C, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl-C, shutting down");
    }
}
