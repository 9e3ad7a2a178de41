// src/session/arena.rs
//! Coding challenge page reached after the interview

use std::sync::Arc;

use super::{Loaded, Page, ViewState};
use crate::app_log;
use crate::core::{CoachApi, ResumeStore};
use crate::types::{ArenaProblem, CodeReview};

const DEFAULT_CODE: &str = "# Write your solution here";

pub struct ArenaSession {
    api: Arc<dyn CoachApi>,
    problem: Option<ArenaProblem>,
    code: String,
    review: Option<CodeReview>,
}

impl ArenaSession {
    pub async fn start(
        api: Arc<dyn CoachApi>,
        store: &ResumeStore,
        role: Option<&str>,
        default_role: &str,
    ) -> Loaded<Self> {
        let Some(resume) = store.load_or_none().await else {
            return Loaded::Redirect(Page::Upload);
        };

        let role = resume.role_label(role, default_role);
        let problem = match api.arena_problem(&resume.text, &role).await {
            Ok(problem) => Some(problem),
            Err(e) => {
                app_log!(error, "Arena error: {:#}", e);
                None
            }
        };

        let code = problem
            .as_ref()
            .map(|p| p.starter_code.as_str())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CODE)
            .to_string();

        Loaded::Ready(Self {
            api,
            problem,
            code,
            review: None,
        })
    }

    pub fn problem(&self) -> Option<&ArenaProblem> {
        self.problem.as_ref()
    }

    /// Current editor contents
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn review(&self) -> Option<&CodeReview> {
        self.review.as_ref()
    }

    /// Submit `code` for review. Without a loaded problem nothing is sent. A
    /// failed review returns `None`; the previous one stays in [`Self::review`].
    pub async fn submit(&mut self, code: String) -> Option<&CodeReview> {
        self.code = code;

        let Some(problem) = self.problem.as_ref() else {
            app_log!(warn, "No arena problem loaded, nothing to submit");
            return None;
        };

        match self.api.arena_submit(&problem.description, &self.code).await {
            Ok(review) => {
                app_log!(info, "Arena review: correct={} rating={}", review.is_correct, review.rating);
                Some(&*self.review.insert(review))
            }
            Err(e) => {
                app_log!(error, "Arena submit error: {:#}", e);
                None
            }
        }
    }

    pub fn state(&self) -> ViewState {
        if self.review.is_some() {
            ViewState::ShowingResult
        } else {
            ViewState::Interactive
        }
    }

    /// The arena hands over to the skill quiz
    pub fn finish(&self) -> Page {
        Page::Quiz
    }
}
