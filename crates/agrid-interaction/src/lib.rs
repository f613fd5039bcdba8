//! Interaction layer for AgriDiagnose.
//!
//! - [`OpenRouterApiAgent`]: the remote completion client
//! - [`rule_based`]: the local intent classifier and template responder
//! - [`ImageSummarizer`]: placeholder image context for the prompt

pub mod image_summarizer;
pub mod openrouter_api_agent;
pub mod rule_based;

pub use image_summarizer::ImageSummarizer;
pub use openrouter_api_agent::OpenRouterApiAgent;
pub use rule_based::{
    FixedSequence, IntentClassifier, RandomSource, ResponsePool, SeededRandom, TemplateResponder,
    ThreadRandom,
};
