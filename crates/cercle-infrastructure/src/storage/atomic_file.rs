//! Atomic file writes for small state files.
//!
//! Updates are all-or-nothing: content goes to a sibling temp file, is synced,
//! then renamed over the target.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use cercle_core::CercleError;
use cercle_core::error::Result;

/// A handle to a state file that is always replaced atomically.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
    /// Unix permission bits applied after each write.
    mode: Option<u32>,
}

impl AtomicFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, mode: None }
    }

    /// A file readable and writable by the owner only (mode 600 on Unix).
    pub fn private(path: PathBuf) -> Self {
        Self {
            path,
            mode: Some(0o600),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(content))`: file exists and is not blank
    /// - `Ok(None)`: file doesn't exist or is empty
    /// - `Err`: failed to read
    pub async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CercleError::io(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Writes the file atomically via temp file + rename.
    pub async fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(content.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        self.apply_mode(&tmp_path).await?;
        fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }

    /// Deletes the file. Succeeds if it does not exist.
    pub async fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| CercleError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| CercleError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }

    #[cfg(unix)]
    async fn apply_mode(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        if let Some(mode) = self.mode {
            fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn apply_mode(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("state.json"));

        file.write(r#"{"a":1}"#).await.unwrap();

        assert_eq!(file.read().await.unwrap().as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn test_read_missing_and_blank() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("missing.json"));
        assert!(file.read().await.unwrap().is_none());

        file.write("   \n").await.unwrap();
        assert!(file.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("state.json");
        let file = AtomicFile::new(path.clone());

        file.write("{}").await.unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join(".state.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("state.json"));

        file.write("{}").await.unwrap();
        file.remove().await.unwrap();
        file.remove().await.unwrap();

        assert!(file.read().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let file = AtomicFile::private(path.clone());

        file.write("{}").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
