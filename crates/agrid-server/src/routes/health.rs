use agrid_core::ChatMode;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: ChatMode,
    pub remote_configured: bool,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = state.assistant.status();
    Json(HealthResponse {
        status: "healthy",
        mode: status.mode,
        remote_configured: status.remote_configured,
    })
}
