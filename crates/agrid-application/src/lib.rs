//! Application layer for AgriDiagnose.
//!
//! [`ResponseOrchestrator`] implements the `get_response` use case over an
//! explicit [`agrid_core::Session`]. [`AssistantService`] owns the single
//! process-wide session and serializes access to it.

pub mod assistant_service;
pub mod orchestrator;

pub use assistant_service::{AssistantService, AssistantStatus};
pub use orchestrator::{ResponseOrchestrator, augment_with_images};
