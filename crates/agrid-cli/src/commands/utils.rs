use std::path::Path;

use agrid_application::AssistantService;
use agrid_core::ImageRef;
use agrid_core::config::{AssistantConfig, SecretStorage, resolve_credentials};
use agrid_server::upload::allowed_file;
use anyhow::{Context, Result, bail};

/// Loads the assistant config and resolves the OpenRouter credential.
///
/// A missing credential is not an error: the assistant then runs on the
/// rule-based engine only.
pub fn build_assistant(config_path: Option<&Path>) -> Result<AssistantService> {
    let config = AssistantConfig::load(config_path).context("Failed to load assistant config")?;

    let storage = match SecretStorage::new() {
        Ok(storage) => Some(storage),
        Err(e) => {
            tracing::debug!("[Startup] Secret file location unavailable: {}", e);
            None
        }
    };
    let credentials = resolve_credentials(storage.as_ref(), |key| std::env::var(key).ok());

    Ok(AssistantService::from_config(&config, credentials))
}

/// Checks that `path` is an existing file with an accepted image extension.
pub fn image_from_path(path: &Path) -> Result<ImageRef> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid image path: {}", path.display()))?;
    if !allowed_file(name) {
        bail!("Unsupported image type: {name} (expected png, jpg, jpeg, gif or webp)");
    }
    if !path.is_file() {
        bail!("Image not found: {}", path.display());
    }
    Ok(ImageRef::new(path))
}
