// src/session/testing.rs
//! Scripted in-memory backend for page tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::{AudioClip, CoachApi, ResumeStore, Turn};
use crate::types::{
    response::InteractionLog, ArenaProblem, CodeReview, DashboardRecord, Evaluation,
    HistoryEntry, Question, QuizQuestion, ResumeData,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload { file_name: String, len: usize },
    Start { resume_text: String, role: String },
    Next { history: Vec<HistoryEntry>, last_answer: String, skipped: bool },
    Generate { role: String, difficulty: String, count: u32 },
    Evaluate { question: String, answer: String },
    Problem { role: String },
    Submit { problem: String, code: String },
    Quiz { skills: Vec<String> },
    Log(InteractionLog),
    Speak { text: String },
    Listen(AudioClip),
    Dashboard,
}

/// `None` replies (or an exhausted turn queue) fail like a dead network
#[derive(Default)]
pub struct FakeApi {
    pub upload_reply: Option<ResumeData>,
    pub start_reply: Option<Question>,
    pub turns: Mutex<VecDeque<Option<Turn>>>,
    pub questions_reply: Option<Vec<Question>>,
    pub evaluate_reply: Option<Evaluation>,
    pub problem_reply: Option<ArenaProblem>,
    pub review_reply: Option<CodeReview>,
    pub quiz_reply: Option<Vec<QuizQuestion>>,
    pub log_ok: bool,
    pub speak_reply: Option<Vec<u8>>,
    pub transcript_reply: Option<String>,
    pub dashboard_reply: Option<Vec<DashboardRecord>>,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_turn(&self, turn: Option<Turn>) {
        self.turns.lock().unwrap().push_back(turn);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn reply<T: Clone>(value: &Option<T>) -> Result<T> {
    value.clone().ok_or_else(|| anyhow!("connection refused"))
}

#[async_trait]
impl CoachApi for FakeApi {
    async fn upload_resume(&self, file_name: &str, bytes: Vec<u8>) -> Result<ResumeData> {
        self.record(Call::Upload {
            file_name: file_name.to_string(),
            len: bytes.len(),
        });
        reply(&self.upload_reply)
    }

    async fn start_interview(&self, resume_text: &str, role: &str) -> Result<Question> {
        self.record(Call::Start {
            resume_text: resume_text.to_string(),
            role: role.to_string(),
        });
        reply(&self.start_reply)
    }

    async fn next_question(
        &self,
        _resume_text: &str,
        history: &[HistoryEntry],
        last_answer: &str,
        skipped: bool,
    ) -> Result<Turn> {
        self.record(Call::Next {
            history: history.to_vec(),
            last_answer: last_answer.to_string(),
            skipped,
        });
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    async fn generate_questions(
        &self,
        _resume_text: &str,
        role: &str,
        difficulty: &str,
        count: u32,
    ) -> Result<Vec<Question>> {
        self.record(Call::Generate {
            role: role.to_string(),
            difficulty: difficulty.to_string(),
            count,
        });
        reply(&self.questions_reply)
    }

    async fn evaluate(&self, question: &str, user_answer: &str) -> Result<Evaluation> {
        self.record(Call::Evaluate {
            question: question.to_string(),
            answer: user_answer.to_string(),
        });
        reply(&self.evaluate_reply)
    }

    async fn arena_problem(&self, _resume_text: &str, role: &str) -> Result<ArenaProblem> {
        self.record(Call::Problem {
            role: role.to_string(),
        });
        reply(&self.problem_reply)
    }

    async fn arena_submit(&self, problem: &str, code: &str) -> Result<CodeReview> {
        self.record(Call::Submit {
            problem: problem.to_string(),
            code: code.to_string(),
        });
        reply(&self.review_reply)
    }

    async fn quiz(&self, skills: &[String]) -> Result<Vec<QuizQuestion>> {
        self.record(Call::Quiz {
            skills: skills.to_vec(),
        });
        reply(&self.quiz_reply)
    }

    async fn log_interaction(&self, entry: &InteractionLog) -> Result<()> {
        self.record(Call::Log(entry.clone()));
        if self.log_ok {
            Ok(())
        } else {
            Err(anyhow!("log endpoint unavailable"))
        }
    }

    async fn speak(&self, text: &str) -> Result<Vec<u8>> {
        self.record(Call::Speak {
            text: text.to_string(),
        });
        reply(&self.speak_reply)
    }

    async fn listen(&self, clip: AudioClip) -> Result<String> {
        self.record(Call::Listen(clip));
        reply(&self.transcript_reply)
    }

    async fn dashboard(&self) -> Result<Vec<DashboardRecord>> {
        self.record(Call::Dashboard);
        reply(&self.dashboard_reply)
    }
}

pub fn sample_resume() -> ResumeData {
    ResumeData {
        text: "Five years building payment APIs in Rust and Go".to_string(),
        skills: vec!["rust".to_string(), "sql".to_string()],
        detected_role: "Backend Developer".to_string(),
    }
}

pub fn question(text: &str) -> Question {
    Question {
        question: text.to_string(),
        kind: "Technical".to_string(),
        topic: "General".to_string(),
        hints: vec![],
    }
}

pub fn rated(rating: f32) -> Evaluation {
    Evaluation {
        rating,
        feedback: format!("rated {}", rating),
        ..Default::default()
    }
}

/// Store in a fresh temp dir, optionally pre-seeded with a resume
pub async fn store_with(resume: Option<ResumeData>) -> (tempfile::TempDir, ResumeStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ResumeStore::new(dir.path());
    if let Some(data) = resume {
        store.save(&data).await.unwrap();
    }
    (dir, store)
}

pub fn shared(api: FakeApi) -> Arc<FakeApi> {
    Arc::new(api)
}
