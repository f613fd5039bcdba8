use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::config_dir;
use crate::error::{AgridError, Result};

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const MODEL_NAME_ENV: &str = "OPENROUTER_MODEL_NAME";

const SECRET_FILE_NAME: &str = "secret.json";

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openrouter: Option<OpenRouterSecret>,
}

/// OpenRouter entry of `secret.json`.
#[derive(Clone, Deserialize)]
pub struct OpenRouterSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl fmt::Debug for OpenRouterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterSecret")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// Credential for the remote provider, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    pub api_key: String,
    /// Overrides the configured model when set
    pub model: Option<String>,
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Read-only access to `secret.json`.
///
/// The file is plaintext JSON and should be readable by the owner only.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Storage at the default location (`~/.config/agrid/secret.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: config_dir()?.join(SECRET_FILE_NAME),
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<SecretConfig> {
        if !self.exists() {
            return Err(AgridError::config(format!(
                "Secret file not found at: {}",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Resolves the provider credential.
///
/// Priority:
/// 1. `secret.json` (when `storage` is given and the file holds an
///    `openrouter` entry)
/// 2. `OPENROUTER_API_KEY` / `OPENROUTER_MODEL_NAME` as returned by `env`
///
/// A missing or blank key is a `Config` error; callers treat it as
/// "start in Local mode".
pub fn resolve_credentials<F>(storage: Option<&SecretStorage>, env: F) -> Result<RemoteCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(storage) = storage {
        if storage.exists() {
            match storage.load() {
                Ok(SecretConfig {
                    openrouter: Some(secret),
                }) if !secret.api_key.trim().is_empty() => {
                    return Ok(RemoteCredentials {
                        api_key: secret.api_key.trim().to_string(),
                        model: secret.model_name,
                    });
                }
                Ok(_) => {
                    tracing::debug!(
                        "[Config] {} has no openrouter key, checking environment",
                        storage.path().display()
                    );
                }
                Err(e) => {
                    tracing::warn!("[Config] Ignoring unreadable secret file: {}", e);
                }
            }
        }
    }

    let api_key = env(API_KEY_ENV)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            AgridError::config(format!(
                "{API_KEY_ENV} not found in secret.json or environment variables"
            ))
        })?;

    Ok(RemoteCredentials {
        api_key,
        model: env(MODEL_NAME_ENV).filter(|model| !model.trim().is_empty()),
    })
}
