//! Image context for prompts.
//!
//! No vision inference happens yet: the summary depends only on how many
//! images were uploaded. A real analyzer must keep the same shape (no I/O
//! failures surface to the caller, empty input yields an empty string).

use agrid_core::ImageRef;

const SINGLE_IMAGE_SUMMARY: &str = "I can see you've uploaded a crop image! Advanced plant disease detection and analysis is coming soon. For now, please describe what you're observing in your crops and I'll provide agricultural guidance.";

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSummarizer;

impl ImageSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Returns a short description of `images`, or `""` when there are none.
    pub fn summarize(&self, images: &[ImageRef]) -> String {
        match images.len() {
            0 => String::new(),
            1 => SINGLE_IMAGE_SUMMARY.to_string(),
            count => format!(
                "I can see you've uploaded {count} crop images! Multi-image agricultural analysis is coming soon. Please describe the issues you're seeing in your crops and I'll help with diagnosis and treatment recommendations."
            ),
        }
    }
}
