use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::config_dir;
use crate::error::{AgridError, Result};
use crate::session::DEFAULT_HISTORY_WINDOW;

pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.2-3b-instruct:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert agricultural AI assistant specializing in crop diagnosis, plant disease identification, pest management, soil health, and farming advice. Provide practical, actionable guidance for farmers and agricultural professionals. Be specific and helpful with agricultural recommendations.";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Tunables for the assistant and its completion provider.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to override:
///
/// ```toml
/// model = "meta-llama/llama-3.1-8b-instruct"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Provider model identifier
    pub model: String,
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound for one completion call, in seconds
    pub timeout_secs: u64,
    /// Maximum number of retained conversation turns
    pub history_window: usize,
    pub system_prompt: String,
    /// Sent as `HTTP-Referer` for provider attribution
    pub referer: Option<String>,
    /// Sent as `X-Title` for provider attribution
    pub app_title: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_window: DEFAULT_HISTORY_WINDOW,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            referer: None,
            app_title: Some("AgriDiagnose Assistant".to_string()),
        }
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// `~/.config/agrid/config.toml` is used when present and defaults
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = config_dir()?.join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    tracing::debug!(
                        "[Config] No config file at {}, using defaults",
                        default_path.display()
                    );
                    Ok(Self::default())
                }
            }
        }
    }

    /// Rejects values that would make the assistant unusable: a zero
    /// timeout fails every remote call, a zero window keeps no history.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AgridError::config("timeout_secs must be greater than 0"));
        }
        if self.history_window == 0 {
            return Err(AgridError::config("history_window must be greater than 0"));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AgridError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!("[Config] Loaded assistant config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_provider_settings() {
        let config = AssistantConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.history_window, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 5\nmodel = \"test-model\"\n").unwrap();

        let config = AssistantConfig::load(Some(&path)).expect("Should load config");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.model, "test-model");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.history_window, 10);
    }

    #[test]
    fn test_explicit_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = AssistantConfig::load(Some(&temp_dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_zero_values_are_config_errors() {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in [
            ("timeout.toml", "timeout_secs = 0\n"),
            ("window.toml", "history_window = 0\n"),
        ] {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).unwrap();

            let err = AssistantConfig::load(Some(&path)).unwrap_err();
            assert!(err.is_config(), "{content}: {err}");
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AssistantConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = AssistantConfig::load(Some(&path)).unwrap_err();
        assert!(err.is_serialization());
    }
}
