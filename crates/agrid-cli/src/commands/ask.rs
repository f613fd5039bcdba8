use std::path::{Path, PathBuf};

use anyhow::Result;

use super::utils::{build_assistant, image_from_path};

pub async fn run(config_path: Option<&Path>, message: &str, images: &[PathBuf]) -> Result<()> {
    let images = images
        .iter()
        .map(|path| image_from_path(path))
        .collect::<Result<Vec<_>>>()?;

    let assistant = build_assistant(config_path)?;
    let reply = assistant.ask(message, &images).await?;
    println!("{reply}");
    Ok(())
}
