// src/core/api.rs
//! The backend contract as seen by the pages

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{
    response::InteractionLog, ArenaProblem, CodeReview, DashboardRecord, Evaluation,
    HistoryEntry, Question, QuizQuestion, ResumeData,
};

/// A recorded audio clip ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

/// Evaluation of the last answer plus the follow-up question, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub evaluation: Evaluation,
    pub next_question: Option<Question>,
}

/// Every call the client makes to the coach backend.
///
/// [`ServiceClient`](super::ServiceClient) is the HTTP implementation; pages only
/// depend on this trait.
#[async_trait]
pub trait CoachApi: Send + Sync {
    async fn upload_resume(&self, file_name: &str, bytes: Vec<u8>) -> Result<ResumeData>;

    async fn start_interview(&self, resume_text: &str, role: &str) -> Result<Question>;

    async fn next_question(
        &self,
        resume_text: &str,
        history: &[HistoryEntry],
        last_answer: &str,
        skipped: bool,
    ) -> Result<Turn>;

    async fn generate_questions(
        &self,
        resume_text: &str,
        role: &str,
        difficulty: &str,
        count: u32,
    ) -> Result<Vec<Question>>;

    async fn evaluate(&self, question: &str, user_answer: &str) -> Result<Evaluation>;

    async fn arena_problem(&self, resume_text: &str, role: &str) -> Result<ArenaProblem>;

    async fn arena_submit(&self, problem: &str, code: &str) -> Result<CodeReview>;

    async fn quiz(&self, skills: &[String]) -> Result<Vec<QuizQuestion>>;

    async fn log_interaction(&self, entry: &InteractionLog) -> Result<()>;

    async fn speak(&self, text: &str) -> Result<Vec<u8>>;

    async fn listen(&self, clip: AudioClip) -> Result<String>;

    async fn dashboard(&self) -> Result<Vec<DashboardRecord>>;
}
