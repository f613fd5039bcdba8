//! Domain layer for AgriDiagnose.
//!
//! Holds the conversation state (`Session`, `Turn`, `ChatMode`), the
//! classification vocabulary shared by the rule engines, the typed remote
//! failure taxonomy and the configuration loaders. Nothing in this crate
//! performs network I/O.

pub mod completion;
pub mod config;
pub mod error;
pub mod image;
pub mod intent;
pub mod session;

pub use completion::{CompletionClient, FailureClass, RemoteCallError};
pub use error::{AgridError, Result};
pub use image::ImageRef;
pub use intent::IntentCategory;
pub use session::{ChatMode, Session, Turn, TurnRole};
