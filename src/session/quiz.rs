// src/session/quiz.rs
//! Skill quiz seeded from the resume's skills, scored locally

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Loaded, Page, ViewState};
use crate::app_log;
use crate::core::{CoachApi, ResumeStore};
use crate::types::{response::InteractionLog, QuizQuestion};

pub struct QuizSession {
    api: Arc<dyn CoachApi>,
    role: String,
    skills: Vec<String>,
    questions: Vec<QuizQuestion>,
    answers: BTreeMap<usize, String>,
    score: Option<u32>,
}

impl QuizSession {
    pub async fn start(api: Arc<dyn CoachApi>, store: &ResumeStore, default_role: &str) -> Loaded<Self> {
        let Some(resume) = store.load_or_none().await else {
            return Loaded::Redirect(Page::Upload);
        };

        let skills = resume.quiz_skills();
        let questions = match api.quiz(&skills).await {
            Ok(questions) => questions,
            Err(e) => {
                app_log!(error, "Quiz Error: {:#}", e);
                Vec::new()
            }
        };

        Loaded::Ready(Self {
            api,
            role: resume.role_label(None, default_role),
            skills,
            questions,
            answers: BTreeMap::new(),
            score: None,
        })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// Record a choice; ignored once results are showing or for unknown questions
    pub fn select(&mut self, index: usize, option: &str) -> bool {
        if self.score.is_some() || index >= self.questions.len() {
            return false;
        }
        self.answers.insert(index, option.to_string());
        true
    }

    /// Submission stays blocked until every question has an answer
    pub fn can_submit(&self) -> bool {
        self.score.is_none() && self.answers.len() >= self.questions.len()
    }

    /// Score the quiz and report the result to the backend log
    pub async fn submit(&mut self) -> Result<u32> {
        if self.score.is_some() {
            anyhow::bail!("Quiz already submitted");
        }
        if !self.can_submit() {
            anyhow::bail!(
                "Answer all {} questions before submitting ({} answered)",
                self.questions.len(),
                self.answers.len()
            );
        }

        let score = self
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(i).is_some_and(|a| q.is_correct(a)))
            .count() as u32;
        self.score = Some(score);

        let entry = self.log_entry(score);
        if let Err(e) = self.api.log_interaction(&entry).await {
            app_log!(warn, "Failed to log quiz result: {:#}", e);
        }

        Ok(score)
    }

    fn log_entry(&self, score: u32) -> InteractionLog {
        let total = self.questions.len() as u32;
        let rating = if total == 0 {
            0.0
        } else {
            (score as f32 * 100.0 / total as f32).round() / 10.0
        };

        InteractionLog {
            role: self.role.clone(),
            difficulty: "Mixed".to_string(),
            question: format!("Skill quiz: {}", self.skills.join(", ")),
            answer: format!("{}/{}", score, total),
            feedback: format!("Scored {} out of {}", score, total),
            rating,
            kind: "Quiz".to_string(),
        }
    }

    pub fn score(&self) -> Option<u32> {
        self.score
    }

    /// Whether question `index` was answered correctly, once results are showing
    pub fn outcome(&self, index: usize) -> Option<bool> {
        self.score?;
        let question = self.questions.get(index)?;
        Some(self.answer(index).is_some_and(|a| question.is_correct(a)))
    }

    pub fn state(&self) -> ViewState {
        if self.score.is_some() {
            ViewState::ShowingResult
        } else {
            ViewState::Interactive
        }
    }

    pub fn finish(&self) -> Page {
        Page::Dashboard
    }
}
