//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation turn types (`TurnRole`, `Turn`)
//! - `mode`: Response source selection (`ChatMode`)
//! - `model`: The bounded conversation state (`Session`)

mod message;
mod mode;
mod model;

// Re-export public API
pub use message::{Turn, TurnRole};
pub use mode::ChatMode;
pub use model::{DEFAULT_HISTORY_WINDOW, Session};
