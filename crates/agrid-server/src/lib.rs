//! HTTP boundary for AgriDiagnose.
//!
//! Exposes `POST /chat` and `GET /health` on top of
//! [`agrid_application::AssistantService`]. Upload validation and storage
//! happen here; the assistant only ever receives stored
//! [`agrid_core::ImageRef`]s.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod upload;

use anyhow::Context;
use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::app;
pub use state::{AppState, SharedState};
pub use upload::UploadStore;

use agrid_application::AssistantService;

/// Binds `config.address()` and serves until Ctrl-C.
pub async fn serve(config: ServerConfig, assistant: AssistantService) -> anyhow::Result<()> {
    let uploads = UploadStore::new(&config.upload_dir);
    uploads
        .ensure_dir()
        .await
        .with_context(|| format!("failed to create upload dir {}", config.upload_dir.display()))?;

    let state = AppState::new(assistant, uploads);
    let router = app(state, &config);

    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!("[Server] Listening on http://{}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("[Server] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("[Server] Failed to listen for shutdown signal: {}", e);
    }
}
