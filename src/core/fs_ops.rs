// src/core/fs_ops.rs
//! File system helpers with uniform error context

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_bytes_safe(path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write file, creating the parent directory first
    pub async fn write_bytes_safe(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        app_log!(debug, "Written file: {}", path.display());
        Ok(())
    }

    pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to remove file: {}", path.display()))?;
        Ok(true)
    }

    /// Get file extension safely
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// File name component as an owned string, `fallback` when there is none
    pub fn file_name_or(path: &Path, fallback: &str) -> String {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Timestamped file path inside `dir`, e.g. `question_20240101_120000_123.mp3`
    pub fn timestamped_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
        dir.join(format!(
            "{}_{}.{}",
            stem,
            chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f"),
            ext
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension() {
        assert_eq!(FsOps::get_extension(Path::new("cv.PDF")), Some("pdf".to_string()));
        assert_eq!(FsOps::get_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_timestamped_path() {
        let path = FsOps::timestamped_path(Path::new("/tmp/audio"), "question", "mp3");
        let name = FsOps::file_name_or(&path, "");
        assert!(name.starts_with("question_"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/audio")));
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clip.wav");

        FsOps::write_bytes_safe(&path, b"RIFF").await.unwrap();
        assert_eq!(FsOps::read_bytes_safe(&path).await.unwrap(), b"RIFF".to_vec());

        assert!(FsOps::remove_file_if_exists(&path).await.unwrap());
        assert!(!FsOps::remove_file_if_exists(&path).await.unwrap());
    }
}
