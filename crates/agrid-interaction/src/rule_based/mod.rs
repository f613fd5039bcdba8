//! Local, rule-based reply generation used when the remote provider is
//! unavailable.
//!
//! - `classifier`: ordered regex patterns -> [`agrid_core::IntentCategory`]
//! - `pool`: the fixed reply templates per category
//! - `random`: injectable randomness for template selection
//! - `responder`: picks one template for a category

mod classifier;
mod pool;
mod random;
mod responder;

pub use classifier::{DEFAULT_PATTERNS, IntentClassifier};
pub use pool::ResponsePool;
pub use random::{FixedSequence, RandomSource, SeededRandom, ThreadRandom};
pub use responder::TemplateResponder;
