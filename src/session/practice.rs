// src/session/practice.rs
//! Fixed-length practice round: a generated question set, each answer evaluated
//! on its own and logged to the performance history

use anyhow::Result;
use std::sync::Arc;

use super::{Loaded, Page, ViewState};
use crate::app_log;
use crate::core::{CoachApi, ResumeStore};
use crate::types::{response::InteractionLog, Evaluation, Question};

pub const DEFAULT_DIFFICULTY: &str = "Medium";
pub const DEFAULT_COUNT: u32 = 3;

pub struct PracticeSession {
    api: Arc<dyn CoachApi>,
    role: String,
    difficulty: String,
    questions: Vec<Question>,
    index: usize,
    feedback: Option<Evaluation>,
    score: u32,
}

impl PracticeSession {
    pub async fn start(
        api: Arc<dyn CoachApi>,
        store: &ResumeStore,
        role: Option<&str>,
        default_role: &str,
        difficulty: &str,
        count: u32,
    ) -> Loaded<Self> {
        let Some(resume) = store.load_or_none().await else {
            return Loaded::Redirect(Page::Upload);
        };

        let role = resume.role_label(role, default_role);
        let questions = match api
            .generate_questions(&resume.text, &role, difficulty, count)
            .await
        {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                app_log!(warn, "No practice questions generated, using fallback");
                vec![Question::fallback()]
            }
            Err(e) => {
                app_log!(error, "Error generating questions: {:#}", e);
                vec![Question::fallback()]
            }
        };

        Loaded::Ready(Self {
            api,
            role,
            difficulty: difficulty.to_string(),
            questions,
            index: 0,
            feedback: None,
            score: 0,
        })
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.questions.len())
    }

    pub async fn submit_answer(&mut self, answer: &str) -> Result<&Evaluation> {
        if self.feedback.is_some() {
            anyhow::bail!("Answer already submitted; move to the next question first");
        }
        let answer = answer.trim();
        if answer.is_empty() {
            anyhow::bail!("Answer is empty");
        }

        let question = self.questions[self.index].clone();
        let result = self.api.evaluate(&question.question, answer).await;
        let evaluation = match result {
            Ok(evaluation) => {
                self.log_answer(question, answer, &evaluation).await;
                evaluation
            }
            Err(e) => {
                app_log!(error, "Evaluation error: {:#}", e);
                Evaluation::unavailable()
            }
        };

        if evaluation.is_win() {
            self.score += 1;
        }

        Ok(&*self.feedback.insert(evaluation))
    }

    /// Only server-produced evaluations reach the history
    async fn log_answer(&self, question: Question, answer: &str, evaluation: &Evaluation) {
        let entry = InteractionLog {
            role: self.role.clone(),
            difficulty: self.difficulty.clone(),
            question: question.question,
            answer: answer.to_string(),
            feedback: evaluation.feedback.clone(),
            rating: evaluation.rating,
            kind: if question.kind.is_empty() {
                "Practice".to_string()
            } else {
                question.kind
            },
        };
        if let Err(e) = self.api.log_interaction(&entry).await {
            app_log!(warn, "Failed to log practice answer: {:#}", e);
        }
    }

    /// Next question, or the dashboard after the last one
    pub fn advance(&mut self) -> Option<Page> {
        self.feedback.take()?;
        if self.index + 1 < self.questions.len() {
            self.index += 1;
            None
        } else {
            Some(Page::Dashboard)
        }
    }

    pub fn feedback(&self) -> Option<&Evaluation> {
        self.feedback.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> ViewState {
        if self.feedback.is_some() {
            ViewState::ShowingResult
        } else {
            ViewState::Interactive
        }
    }
}
