//! OpenRouterApiAgent - REST client for OpenRouter's OpenAI-compatible
//! chat completions API.
//!
//! Every call sends the system prompt, the retained history and the new
//! user message, makes exactly one attempt bounded by the configured
//! timeout, and maps failures onto [`RemoteCallError`] from the HTTP status
//! and the structured error body.

use agrid_core::config::{AssistantConfig, RemoteCredentials};
use agrid_core::{CompletionClient, RemoteCallError, Turn};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Completion client that talks to the OpenRouter HTTP API.
#[derive(Clone)]
pub struct OpenRouterApiAgent {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
    referer: Option<String>,
    app_title: Option<String>,
}

impl OpenRouterApiAgent {
    /// Creates an agent from the assistant configuration and a resolved
    /// credential. A model named in the credential overrides the config.
    pub fn new(config: &AssistantConfig, credentials: RemoteCredentials) -> Result<Self, RemoteCallError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| RemoteCallError::Transport {
                message: format!("Failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            client,
            api_key: credentials.api_key,
            endpoint: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                COMPLETIONS_PATH
            ),
            model: credentials.model.unwrap_or_else(|| config.model.clone()),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, history: &[Turn], message: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: self.system_prompt.clone(),
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, RemoteCallError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json");
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.app_title {
            request = request.header("X-Title", title);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenRouter error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                map_transport_error(err)
            } else {
                RemoteCallError::InvalidResponse(format!(
                    "Failed to parse OpenRouter response: {err}"
                ))
            }
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionClient for OpenRouterApiAgent {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, history: &[Turn], message: &str) -> Result<String, RemoteCallError> {
        let request = self.build_request(history, message);
        tracing::debug!(
            "[OpenRouter] Sending {} message(s) to model {}",
            request.messages.len(),
            self.model
        );
        self.send_request(&request).await
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    r#type: Option<String>,
    // OpenRouter sends a numeric code, OpenAI a string one.
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ErrorBody {
    fn mentions_quota(&self) -> bool {
        let code = self
            .code
            .as_ref()
            .map(|value| match value {
                serde_json::Value::String(s) => s.to_lowercase(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        let kind = self.r#type.as_deref().unwrap_or_default().to_lowercase();
        ["insufficient_quota", "billing", "credits"]
            .iter()
            .any(|needle| code.contains(needle) || kind.contains(needle))
    }
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, RemoteCallError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| {
            RemoteCallError::InvalidResponse(
                "OpenRouter API returned no content in the response".into(),
            )
        })
}

fn map_transport_error(err: reqwest::Error) -> RemoteCallError {
    if err.is_timeout() {
        RemoteCallError::Timeout {
            message: format!("OpenRouter API request timed out: {err}"),
        }
    } else {
        RemoteCallError::Transport {
            message: format!("OpenRouter API request failed: {err}"),
        }
    }
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> RemoteCallError {
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
    let quota_hint = parsed
        .as_ref()
        .map(|wrapper| wrapper.error.mentions_quota())
        .unwrap_or(false);
    let message = parsed
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteCallError::Auth { message },
        StatusCode::PAYMENT_REQUIRED => RemoteCallError::Quota { message },
        StatusCode::TOO_MANY_REQUESTS if quota_hint => RemoteCallError::Quota { message },
        StatusCode::TOO_MANY_REQUESTS => RemoteCallError::RateLimited {
            message,
            retry_after,
        },
        _ => RemoteCallError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}
