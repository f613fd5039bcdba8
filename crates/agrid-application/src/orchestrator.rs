//! Response orchestration.
//!
//! Chooses between the remote provider and the local rule engine for each
//! request, merges image context into the outgoing prompt and applies the
//! mode transition when a remote call fails.

use std::sync::Arc;

use agrid_core::{ChatMode, CompletionClient, FailureClass, ImageRef, Session};
use agrid_interaction::{ImageSummarizer, IntentClassifier, TemplateResponder};

/// Composes the remote client, the rule engine and the image summarizer
/// into one `get_response` contract.
///
/// The orchestrator itself is stateless; all conversation state lives in
/// the [`Session`] passed to [`ResponseOrchestrator::get_response`].
pub struct ResponseOrchestrator {
    remote: Option<Arc<dyn CompletionClient>>,
    classifier: IntentClassifier,
    responder: TemplateResponder,
    summarizer: ImageSummarizer,
}

impl ResponseOrchestrator {
    /// Creates an orchestrator with the default rule engine.
    ///
    /// `remote` is `None` when no valid credential was configured.
    pub fn new(remote: Option<Arc<dyn CompletionClient>>) -> Self {
        Self {
            remote,
            classifier: IntentClassifier::new(),
            responder: TemplateResponder::default(),
            summarizer: ImageSummarizer::new(),
        }
    }

    /// Replaces the local rule engine.
    pub fn with_rule_engine(mut self, classifier: IntentClassifier, responder: TemplateResponder) -> Self {
        self.classifier = classifier;
        self.responder = responder;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn responder(&self) -> &TemplateResponder {
        &self.responder
    }

    /// A fresh session: `Remote` when a client is configured, `Local`
    /// otherwise.
    pub fn new_session(&self, history_window: usize) -> Session {
        let mode = if self.has_remote() {
            ChatMode::Remote
        } else {
            ChatMode::Local
        };
        Session::new(mode, history_window)
    }

    /// Produces one reply for `message`.
    ///
    /// Never fails: remote failures are absorbed into a local answer. The
    /// caller is responsible for rejecting empty messages.
    pub async fn get_response(
        &self,
        session: &mut Session,
        message: &str,
        images: &[ImageRef],
    ) -> String {
        let summary = if images.is_empty() {
            String::new()
        } else {
            self.summarizer.summarize(images)
        };

        if session.mode().is_remote() {
            match &self.remote {
                Some(remote) => {
                    let prompt = augment_with_images(message, &summary);
                    match remote.complete(session.history(), &prompt).await {
                        Ok(reply) => {
                            session.record_exchange(prompt, reply.clone());
                            return reply;
                        }
                        Err(err) => {
                            let class = err.failure_class();
                            tracing::warn!(
                                "[Orchestrator] {} call failed ({}): {}",
                                remote.name(),
                                class,
                                err
                            );
                            if class.demotes_permanently() && session.demote_to_local() {
                                tracing::info!(
                                    "[Orchestrator] Switched to local mode after {} failure",
                                    class
                                );
                            }
                            return format!(
                                "{} {}",
                                apology(class),
                                self.local_response(message, &summary)
                            );
                        }
                    }
                }
                None => {
                    tracing::warn!(
                        "[Orchestrator] Session is in remote mode without a client, switching to local mode"
                    );
                    session.demote_to_local();
                }
            }
        }

        self.local_response(message, &summary)
    }

    /// Rule-based answer for `message`.
    ///
    /// Classification always uses the original message. When images came
    /// with the request their summary leads the reply.
    pub fn local_response(&self, message: &str, image_summary: &str) -> String {
        let category = self.classifier.classify(&message.to_lowercase());
        tracing::debug!("[Orchestrator] Local reply for intent {}", category);
        let reply = self.responder.respond(category);
        if image_summary.is_empty() {
            reply
        } else {
            format!("{image_summary}\n\n{reply}")
        }
    }
}

/// Builds the remote prompt: the plain message, or the message followed by
/// the image context when there is any.
pub fn augment_with_images(message: &str, image_summary: &str) -> String {
    if image_summary.is_empty() {
        message.to_string()
    } else {
        format!("Query: {message}\nImage context: {image_summary}")
    }
}

fn apology(class: FailureClass) -> &'static str {
    match class {
        FailureClass::Auth => {
            "I'm having trouble with my API configuration. Let me help you with my built-in agricultural knowledge instead!"
        }
        FailureClass::Quota => {
            "I've reached my usage limit for now. Don't worry though - I can still provide agricultural advice using my built-in farming knowledge!"
        }
        FailureClass::RateLimited => {
            "I'm being rate limited at the moment. Here's my agricultural advice using built-in knowledge:"
        }
        FailureClass::Unknown => {
            "I'm experiencing some technical difficulties, but I can still help with your agricultural needs!"
        }
    }
}
