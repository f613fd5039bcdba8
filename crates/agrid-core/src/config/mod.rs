//! Configuration for AgriDiagnose.
//!
//! - `assistant`: tunables of the assistant and its remote provider,
//!   loaded from `~/.config/agrid/config.toml`
//! - `secret`: provider credentials, loaded once at startup from
//!   `~/.config/agrid/secret.json` or the environment

mod assistant;
mod secret;

use std::path::PathBuf;

use crate::error::{AgridError, Result};

pub use assistant::{
    AssistantConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
pub use secret::{
    API_KEY_ENV, MODEL_NAME_ENV, OpenRouterSecret, RemoteCredentials, SecretConfig, SecretStorage,
    resolve_credentials,
};

/// Returns the configuration directory: `~/.config/agrid`
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AgridError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("agrid"))
}
