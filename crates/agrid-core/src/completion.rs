//! Remote completion contract and its failure taxonomy.
//!
//! Provider implementations live in `agrid-interaction`; the orchestrator
//! only depends on the [`CompletionClient`] trait and reacts to the
//! [`FailureClass`] of a [`RemoteCallError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display;
use thiserror::Error;

use crate::session::Turn;

/// A hosted chat-completion endpoint.
///
/// Implementations make exactly one attempt per call and must be bounded
/// by a timeout. They are stateless with respect to the conversation: the
/// caller passes the retained history and records the exchange itself.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Sends the system instruction, `history` and the new user `message`
    /// and returns the completion text.
    async fn complete(&self, history: &[Turn], message: &str) -> Result<String, RemoteCallError>;
}

/// Failure of a single remote completion call, classified at the call site
/// from the provider's status code and structured error body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteCallError {
    /// Credential rejected by the provider.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Usage limit or billing problem.
    #[error("Quota exceeded: {message}")]
    Quota { message: String },

    /// Request throttled; may succeed later.
    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Connection or other transport-level failure.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The provider answered with a body that carried no usable completion.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Any other non-success status.
    #[error("Provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },
}

impl RemoteCallError {
    /// Maps the error onto the class that drives the mode transition.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::Auth { .. } => FailureClass::Auth,
            Self::Quota { .. } => FailureClass::Quota,
            Self::RateLimited { .. } => FailureClass::RateLimited,
            Self::Timeout { .. }
            | Self::Transport { .. }
            | Self::InvalidResponse(_)
            | Self::Provider { .. } => FailureClass::Unknown,
        }
    }
}

/// Category of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureClass {
    Auth,
    Quota,
    RateLimited,
    Unknown,
}

impl FailureClass {
    /// Whether this failure switches the session to `Local` for good.
    ///
    /// Rate limiting only affects the current call.
    pub fn demotes_permanently(&self) -> bool {
        !matches!(self, Self::RateLimited)
    }
}
