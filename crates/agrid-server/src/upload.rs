//! Upload validation and storage.

use std::io;
use std::path::{Path, PathBuf};

use agrid_core::ImageRef;
use tokio::io::AsyncWriteExt;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

const MAX_NAME_ATTEMPTS: usize = 1000;

/// Whether `filename` carries an allowed image extension.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduces a client-supplied filename to a safe basename.
///
/// Directory components are dropped, whitespace becomes `_`, anything
/// outside ASCII alphanumerics and `._-` is removed, and leading or
/// trailing dots and underscores are stripped.
pub fn secure_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Stores accepted uploads as `<unix-seconds>_<sanitized-name>`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Validates and stores one file.
    ///
    /// Returns `Ok(None)` when the file is rejected (no usable name or a
    /// disallowed extension). Files are created exclusively; when
    /// `<unix-seconds>_<name>` is taken, a counter is inserted
    /// (`<unix-seconds>_<n>_<name>`), so several files with the same name
    /// in one request never overwrite each other.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<Option<ImageRef>> {
        let safe_name = secure_filename(filename);
        if safe_name.is_empty() || !allowed_file(&safe_name) {
            tracing::debug!("[Server] Skipping upload with rejected name {:?}", filename);
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().timestamp();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let stored_name = if attempt == 0 {
                format!("{timestamp}_{safe_name}")
            } else {
                format!("{timestamp}_{attempt}_{safe_name}")
            };
            let path = self.dir.join(stored_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };
            file.write_all(bytes).await?;
            file.flush().await?;

            tracing::info!("[Server] Stored upload at {}", path.display());
            return Ok(Some(ImageRef::new(path)));
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free upload name for {safe_name}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_allowed_extensions() {
        assert!(allowed_file("leaf.png"));
        assert!(allowed_file("LEAF.JPEG"));
        assert!(allowed_file("a.b.webp"));
        assert!(!allowed_file("notes.txt"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("archive.png.exe"));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("my leaf photo.jpg"), "my_leaf_photo.jpg");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\crop.png"), "crop.png");
        assert_eq!(secure_filename(".hidden.png"), "hidden.png");
        assert_eq!(secure_filename("épi$.gif"), "pi.gif");
        assert_eq!(secure_filename("..."), "");
    }

    #[tokio::test]
    async fn test_save_prefixes_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());

        let image = store
            .save("tomato leaf.png", b"fake-png")
            .await
            .unwrap()
            .expect("Should accept png");

        let name = image.path().file_name().unwrap().to_str().unwrap().to_string();
        let (prefix, rest) = name.split_once('_').unwrap();
        assert!(prefix.parse::<i64>().is_ok());
        assert_eq!(rest, "tomato_leaf.png");
        assert_eq!(std::fs::read(image.path()).unwrap(), b"fake-png");
    }

    #[tokio::test]
    async fn test_same_name_in_one_request_gets_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());

        let first = store.save("leaf.png", b"first").await.unwrap().unwrap();
        let second = store.save("leaf.png", b"second").await.unwrap().unwrap();
        let third = store.save("leaf.png", b"third").await.unwrap().unwrap();

        assert_ne!(first.path(), second.path());
        assert_ne!(second.path(), third.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"first");
        assert_eq!(std::fs::read(second.path()).unwrap(), b"second");
        assert_eq!(std::fs::read(third.path()).unwrap(), b"third");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_save_rejects_disallowed_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(temp_dir.path());

        assert!(store.save("script.sh", b"#!/bin/sh").await.unwrap().is_none());
        assert!(store.save("", b"").await.unwrap().is_none());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
