use std::path::Path;

use agrid_server::ServerConfig;
use anyhow::Result;

use super::utils::build_assistant;

pub async fn run(config_path: Option<&Path>, server: ServerConfig) -> Result<()> {
    let assistant = build_assistant(config_path)?;
    let status = assistant.status();
    tracing::info!(
        "[Startup] Assistant ready in {} mode (remote configured: {})",
        status.mode,
        status.remote_configured
    );
    agrid_server::serve(server, assistant).await
}
