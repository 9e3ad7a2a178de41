// src/core/storage.rs
//! Durable client state: a single `resumeData` key holding the ResumeData JSON

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::fs_ops::FsOps;
use crate::app_log;
use crate::types::ResumeData;

pub const RESUME_KEY: &str = "resumeData";

#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

impl ResumeStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(format!("{}.json", RESUME_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored resume, `None` when nothing was uploaded yet
    pub async fn load(&self) -> Result<Option<ResumeData>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = FsOps::read_file_safe(&self.path).await?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("Corrupted resume data in {}", self.path.display()))?;
        Ok(Some(data))
    }

    /// Like [`load`](Self::load) but treats unreadable data as absent
    pub async fn load_or_none(&self) -> Option<ResumeData> {
        match self.load().await {
            Ok(data) => data,
            Err(e) => {
                app_log!(warn, "Ignoring stored resume: {:#}", e);
                None
            }
        }
    }

    pub async fn save(&self, data: &ResumeData) -> Result<()> {
        let json = serde_json::to_string(data).context("Failed to serialize resume data")?;
        FsOps::write_bytes_safe(&self.path, json.as_bytes()).await
    }

    pub async fn clear(&self) -> Result<bool> {
        FsOps::remove_file_if_exists(&self.path).await
    }
}
