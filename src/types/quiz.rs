// src/types/quiz.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Strict equality against the server-supplied answer
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }
}
