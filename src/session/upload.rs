// src/session/upload.rs
//! Resume upload and bootstrap of the stored resume data

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Page;
use crate::app_log;
use crate::core::{service_client::resume_content_type, CoachApi, FsOps, ResumeStore};

pub const UPLOAD_ERROR: &str = "Failed to upload resume. Please try again.";

pub struct UploadPage {
    api: Arc<dyn CoachApi>,
    store: ResumeStore,
    file: Option<PathBuf>,
    error: Option<String>,
    detected_role: Option<String>,
}

impl UploadPage {
    pub fn new(api: Arc<dyn CoachApi>, store: ResumeStore) -> Self {
        Self {
            api,
            store,
            file: None,
            error: None,
            detected_role: None,
        }
    }

    pub fn select_file(&mut self, path: &Path) {
        self.file = Some(path.to_path_buf());
        self.error = None;
    }

    /// Upload the selected file. On success the resume is stored and the page
    /// moves on to the interview; on failure the error banner is set.
    pub async fn upload(&mut self) -> Option<Page> {
        let file = self.file.clone()?;
        self.error = None;

        match self.try_upload(&file).await {
            Ok(role) => {
                self.detected_role = Some(role);
                Some(Page::Interview)
            }
            Err(e) => {
                app_log!(error, "Upload of {} failed: {:#}", file.display(), e);
                self.error = Some(UPLOAD_ERROR.to_string());
                None
            }
        }
    }

    async fn try_upload(&self, file: &Path) -> anyhow::Result<String> {
        let file_name = FsOps::file_name_or(file, "resume");
        resume_content_type(&file_name)?;

        let bytes = FsOps::read_bytes_safe(file).await?;
        let data = self.api.upload_resume(&file_name, bytes).await?;
        self.store.save(&data).await?;

        // Show what a later page will actually read back
        let stored = self
            .store
            .load()
            .await?
            .ok_or_else(|| anyhow::anyhow!("Resume data missing after save"))?;
        app_log!(info, "Resume stored, detected role: {}", stored.detected_role);
        Ok(stored.detected_role)
    }

    /// Inline error banner text
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn detected_role(&self) -> Option<&str> {
        self.detected_role.as_deref()
    }
}
