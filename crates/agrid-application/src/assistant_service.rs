//! Process-wide assistant session.
//!
//! The historical design shares one conversation across all callers. This
//! service keeps that single session but serializes every request on a
//! mutex, so concurrent HTTP requests cannot interleave history or mode
//! updates. Status reads go through a snapshot published after every
//! mutation and never wait for a request in flight.

use std::sync::Arc;

use agrid_core::config::{AssistantConfig, RemoteCredentials};
use agrid_core::{AgridError, ChatMode, CompletionClient, ImageRef, Session, Turn};
use agrid_interaction::OpenRouterApiAgent;
use serde::Serialize;
use tokio::sync::{Mutex, watch};

use crate::orchestrator::ResponseOrchestrator;

/// Snapshot reported by health checks and the REPL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantStatus {
    pub mode: ChatMode,
    /// Whether a remote client was configured at startup
    pub remote_configured: bool,
    pub history_len: usize,
}

/// Shared handle to the assistant; cheap to clone.
#[derive(Clone)]
pub struct AssistantService {
    orchestrator: Arc<ResponseOrchestrator>,
    session: Arc<Mutex<Session>>,
    snapshot: Arc<watch::Sender<AssistantStatus>>,
}

impl AssistantService {
    pub fn new(orchestrator: ResponseOrchestrator, history_window: usize) -> Self {
        let session = orchestrator.new_session(history_window);
        let status = AssistantStatus {
            mode: session.mode(),
            remote_configured: orchestrator.has_remote(),
            history_len: 0,
        };
        Self {
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(Mutex::new(session)),
            snapshot: Arc::new(watch::Sender::new(status)),
        }
    }

    /// Builds the service from configuration and the credential resolved at
    /// startup.
    ///
    /// A missing credential, or a client that cannot be built, starts the
    /// session in `Local` mode for the lifetime of the process.
    pub fn from_config(
        config: &AssistantConfig,
        credentials: agrid_core::Result<RemoteCredentials>,
    ) -> Self {
        let remote: Option<Arc<dyn CompletionClient>> = match credentials {
            Ok(credentials) => match OpenRouterApiAgent::new(config, credentials) {
                Ok(agent) => {
                    tracing::info!(
                        "[Startup] OpenRouter client initialized with model {}",
                        agent.model()
                    );
                    Some(Arc::new(agent))
                }
                Err(e) => {
                    tracing::warn!(
                        "[Startup] OpenRouter initialization error: {}. Falling back to rule-based responses.",
                        e
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!("[Startup] {}. Falling back to rule-based responses.", e);
                None
            }
        };

        Self::new(ResponseOrchestrator::new(remote), config.history_window)
    }

    /// Answers one user message.
    ///
    /// Empty or whitespace-only messages are rejected with
    /// [`AgridError::EmptyInput`]; every other message gets a reply.
    pub async fn ask(&self, message: &str, images: &[ImageRef]) -> agrid_core::Result<String> {
        if message.trim().is_empty() {
            return Err(AgridError::EmptyInput);
        }

        let mut session = self.session.lock().await;
        let reply = self
            .orchestrator
            .get_response(&mut session, message, images)
            .await;
        self.publish(&session);
        Ok(reply)
    }

    /// Current mode, as of the last completed request.
    pub fn mode(&self) -> ChatMode {
        self.snapshot.borrow().mode
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.session.lock().await.history().to_vec()
    }

    pub async fn clear_history(&self) {
        let mut session = self.session.lock().await;
        session.clear_history();
        self.publish(&session);
    }

    /// Status as of the last completed request.
    ///
    /// Does not wait for a request in flight.
    pub fn status(&self) -> AssistantStatus {
        self.snapshot.borrow().clone()
    }

    fn publish(&self, session: &Session) {
        self.snapshot.send_replace(AssistantStatus {
            mode: session.mode(),
            remote_configured: self.orchestrator.has_remote(),
            history_len: session.history().len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_service() -> AssistantService {
        AssistantService::from_config(
            &AssistantConfig::default(),
            Err(AgridError::config("OPENROUTER_API_KEY not found")),
        )
    }

    #[tokio::test]
    async fn test_missing_credentials_start_local() {
        let service = local_service();
        assert_eq!(
            service.status(),
            AssistantStatus {
                mode: ChatMode::Local,
                remote_configured: false,
                history_len: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_credentials_start_remote() {
        let service = AssistantService::from_config(
            &AssistantConfig::default(),
            Ok(RemoteCredentials {
                api_key: "test-key".into(),
                model: None,
            }),
        );
        let status = service.status();
        assert_eq!(status.mode, ChatMode::Remote);
        assert!(status.remote_configured);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let service = local_service();
        let err = service.ask("   \n", &[]).await.unwrap_err();
        assert!(err.is_empty_input());
    }

    #[tokio::test]
    async fn test_local_reply_is_non_empty() {
        let service = local_service();
        let reply = service.ask("hello", &[]).await.unwrap();
        assert!(!reply.is_empty());
        // Local answers are not recorded in the history.
        assert!(service.history().await.is_empty());
    }
}
