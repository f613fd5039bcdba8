use agrid_core::ImageRef;
use axum::Json;
use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::SharedState;
use crate::upload::UploadStore;

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /chat`
///
/// Accepts a JSON body `{"message": ...}`, a url-encoded form, or multipart
/// form data with a `message` field and any number of `image` files.
pub async fn chat(
    State(state): State<SharedState>,
    request: Request,
) -> Result<Json<ChatResponse>, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let (message, images) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_multipart(multipart, &state.uploads).await?
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(body) = Form::<ChatRequest>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        (body.message, Vec::new())
    } else {
        let Json(body) = Json::<ChatRequest>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        (body.message, Vec::new())
    };

    tracing::info!(
        "[Server] Chat request ({} chars, {} image(s))",
        message.chars().count(),
        images.len()
    );

    let response = state.assistant.ask(&message, &images).await?;
    Ok(Json(ChatResponse { response }))
}

async fn read_multipart(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<(String, Vec<ImageRef>), ApiError> {
    let mut message = String::new();
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some("message") => {
                message = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if filename.is_empty() || bytes.is_empty() {
                    continue;
                }
                let stored = uploads
                    .save(&filename, &bytes)
                    .await
                    .map_err(|e| ApiError::Internal(format!("An error occurred: {e}")))?;
                images.extend(stored);
            }
            _ => {}
        }
    }

    Ok((message, images))
}
