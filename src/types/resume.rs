// src/types/resume.rs
use serde::{Deserialize, Serialize};

/// Resume bundle produced by the backend from an uploaded file.
///
/// This is the only entity the client keeps between pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    pub text: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub detected_role: String,
}

impl ResumeData {
    /// Skills used to seed the quiz, `["General"]` when the resume listed none
    pub fn quiz_skills(&self) -> Vec<String> {
        if self.skills.is_empty() {
            vec!["General".to_string()]
        } else {
            self.skills.clone()
        }
    }

    /// Role label for server prompts: explicit override, detected role, then fallback
    pub fn role_label(&self, explicit: Option<&str>, fallback: &str) -> String {
        explicit
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .or_else(|| Some(self.detected_role.trim()).filter(|r| !r.is_empty()))
            .unwrap_or(fallback)
            .to_string()
    }
}
