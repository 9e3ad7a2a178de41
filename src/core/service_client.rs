// src/core/service_client.rs
//! HTTP client for the coach backend - JSON for everything except uploads and audio

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::api::{AudioClip, CoachApi, Turn};
use crate::app_log;
use crate::types::{
    response::{
        ArenaSubmitRequest, EvaluateRequest, GenerateQuestionsRequest, InteractionLog,
        NextQuestionRequest, NextQuestionResponse, QuestionsResponse, QuizRequest, QuizResponse,
        ResumeRoleRequest, SpeakRequest, TranscriptResponse, UploadResponse,
    },
    ArenaProblem, CodeReview, DashboardRecord, Evaluation, HistoryEntry, Question, QuizQuestion,
    ResumeData,
};

const UPLOAD_ENDPOINT: &str = "/api/upload";
const INTERVIEW_START_ENDPOINT: &str = "/api/interview/start";
const INTERVIEW_NEXT_ENDPOINT: &str = "/api/interview/next";
const GENERATE_QUESTIONS_ENDPOINT: &str = "/api/generate-questions";
const EVALUATE_ENDPOINT: &str = "/api/evaluate";
const ARENA_PROBLEM_ENDPOINT: &str = "/api/arena/problem";
const ARENA_SUBMIT_ENDPOINT: &str = "/api/arena/submit";
const QUIZ_ENDPOINT: &str = "/api/quiz";
const LOG_ENDPOINT: &str = "/api/log";
const SPEAK_ENDPOINT: &str = "/api/speak";
const LISTEN_ENDPOINT: &str = "/api/listen";
const DASHBOARD_ENDPOINT: &str = "/api/dashboard";

/// Extensions the backend resume parser accepts
pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

#[derive(Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Create new service client with configuration
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Generic POST request with JSON
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);
        app_log!(debug, "POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        Self::read_json(response, &url).await
    }

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);
        app_log!(debug, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        Self::read_json(response, &url).await
    }

    /// Multipart POST with a single `file` part
    async fn post_file<R>(&self, endpoint: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);

        let form = Form::new().part(
            "file",
            Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime)
                .context("Failed to create multipart")?,
        );

        app_log!(info, "Uploading {} to {}", file_name, url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("HTTP request failed")?;

        Self::read_json(response, &url).await
    }

    async fn read_json<R>(response: reqwest::Response, url: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        app_log!(trace, "Response status from {}: {}", url, status);

        if status.is_success() {
            let response_text = response
                .text()
                .await
                .context("Failed to read response text")?;

            serde_json::from_str(&response_text).with_context(|| {
                format!("Failed to parse response from {}. Raw response: {}", url, response_text)
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            app_log!(error, "Coach service error response from {}: {}", url, error_text);
            anyhow::bail!("HTTP {} error: {}", status, error_text)
        }
    }
}

#[async_trait]
impl CoachApi for ServiceClient {
    async fn upload_resume(&self, file_name: &str, bytes: Vec<u8>) -> Result<ResumeData> {
        let content_type = resume_content_type(file_name)?;
        let response: UploadResponse = self
            .post_file(UPLOAD_ENDPOINT, file_name, content_type, bytes)
            .await?;
        Ok(response.data)
    }

    async fn start_interview(&self, resume_text: &str, role: &str) -> Result<Question> {
        self.post_json(INTERVIEW_START_ENDPOINT, &ResumeRoleRequest { resume_text, role })
            .await
    }

    async fn next_question(
        &self,
        resume_text: &str,
        history: &[HistoryEntry],
        last_answer: &str,
        skipped: bool,
    ) -> Result<Turn> {
        let payload = NextQuestionRequest {
            resume_text,
            history,
            last_answer,
            skipped,
        };
        let response: NextQuestionResponse =
            self.post_json(INTERVIEW_NEXT_ENDPOINT, &payload).await?;

        Ok(Turn {
            evaluation: response.evaluation,
            next_question: response.next_question,
        })
    }

    async fn generate_questions(
        &self,
        resume_text: &str,
        role: &str,
        difficulty: &str,
        count: u32,
    ) -> Result<Vec<Question>> {
        let payload = GenerateQuestionsRequest {
            resume_text,
            role,
            difficulty,
            count,
        };
        let response: QuestionsResponse =
            self.post_json(GENERATE_QUESTIONS_ENDPOINT, &payload).await?;
        Ok(response.questions)
    }

    async fn evaluate(&self, question: &str, user_answer: &str) -> Result<Evaluation> {
        self.post_json(EVALUATE_ENDPOINT, &EvaluateRequest { question, user_answer })
            .await
    }

    async fn arena_problem(&self, resume_text: &str, role: &str) -> Result<ArenaProblem> {
        self.post_json(ARENA_PROBLEM_ENDPOINT, &ResumeRoleRequest { resume_text, role })
            .await
    }

    async fn arena_submit(&self, problem: &str, code: &str) -> Result<CodeReview> {
        self.post_json(ARENA_SUBMIT_ENDPOINT, &ArenaSubmitRequest { problem, code })
            .await
    }

    async fn quiz(&self, skills: &[String]) -> Result<Vec<QuizQuestion>> {
        let response: QuizResponse = self.post_json(QUIZ_ENDPOINT, &QuizRequest { skills }).await?;
        Ok(response.questions)
    }

    async fn log_interaction(&self, entry: &InteractionLog) -> Result<()> {
        let url = self.url(LOG_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(entry)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Interaction log rejected with status {}", status);
        }
        Ok(())
    }

    async fn speak(&self, text: &str) -> Result<Vec<u8>> {
        let url = self.url(SPEAK_ENDPOINT);
        app_log!(info, "Requesting speech synthesis ({} chars)", text.len());

        let response = self
            .client
            .post(&url)
            .json(&SpeakRequest { text })
            .send()
            .await
            .context("Failed to call speech service")?;

        let status = response.status();
        if status.is_success() {
            let audio = response
                .bytes()
                .await
                .context("Failed to read audio body")?;
            Ok(audio.to_vec())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Speech synthesis failed with status {}: {}", status, error_text)
        }
    }

    async fn listen(&self, clip: AudioClip) -> Result<String> {
        let response: TranscriptResponse = self
            .post_file(LISTEN_ENDPOINT, &clip.file_name, &clip.mime, clip.bytes)
            .await?;
        Ok(response.text)
    }

    async fn dashboard(&self) -> Result<Vec<DashboardRecord>> {
        self.get(DASHBOARD_ENDPOINT).await
    }
}

/// Content type for a resume upload, rejecting formats the parser cannot read
pub fn resume_content_type(file_name: &str) -> Result<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", file_name))?;

    match ext.as_str() {
        "pdf" => Ok("application/pdf"),
        "docx" => Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Ok("text/plain"),
        _ => anyhow::bail!(
            "Unsupported file format: {}. Allowed: {:?}",
            file_name,
            RESUME_EXTENSIONS
        ),
    }
}

/// Content type for a recorded clip, defaulting to webm like browser recorders
pub fn audio_content_type(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "audio/webm",
    }
}
