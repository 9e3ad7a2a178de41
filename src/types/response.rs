// src/types/response.rs
//! Request bodies and response envelopes for the coach backend endpoints

use serde::{Deserialize, Serialize};

use super::{
    interview::{Evaluation, HistoryEntry, Question},
    quiz::QuizQuestion,
    resume::ResumeData,
};

// ===== Request Types =====

/// Body for `/api/interview/start` and `/api/arena/problem`
#[derive(Debug, Serialize)]
pub struct ResumeRoleRequest<'a> {
    pub resume_text: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NextQuestionRequest<'a> {
    pub resume_text: &'a str,
    pub history: &'a [HistoryEntry],
    pub last_answer: &'a str,
    pub skipped: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsRequest<'a> {
    pub resume_text: &'a str,
    pub role: &'a str,
    pub difficulty: &'a str,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct EvaluateRequest<'a> {
    pub question: &'a str,
    pub user_answer: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ArenaSubmitRequest<'a> {
    pub problem: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct QuizRequest<'a> {
    pub skills: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct SpeakRequest<'a> {
    pub text: &'a str,
}

/// Fire-and-forget record sent to `/api/log`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionLog {
    pub role: String,
    pub difficulty: String,
    pub question: String,
    pub answer: String,
    pub feedback: String,
    pub rating: f32,
    #[serde(rename = "type")]
    pub kind: String,
}

// ===== Service Response Types =====

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub data: ResumeData,
}

#[derive(Debug, Deserialize)]
pub struct NextQuestionResponse {
    #[serde(default)]
    pub evaluation: Evaluation,
    #[serde(default)]
    pub next_question: Option<Question>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct QuizResponse {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub text: String,
}
