// src/types/interview.rs
//! Interview question/answer/evaluation structures

use serde::{Deserialize, Deserializer, Serialize};

/// Ratings at or above this value count as a win
pub const WIN_THRESHOLD: f32 = 7.0;

const FALLBACK_QUESTION: &str = "Could you tell me a little bit about yourself?";
const FALLBACK_FEEDBACK: &str = "Could not evaluate answer at this time.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Question {
    /// Canned opener used whenever the server cannot produce a question
    pub fn fallback() -> Self {
        Self {
            question: FALLBACK_QUESTION.to_string(),
            kind: "Behavioral".to_string(),
            topic: "Intro".to_string(),
            hints: vec!["Elevator pitch".to_string()],
        }
    }
}

/// Server-side scoring of an answer or a code submission.
///
/// The server sends `{}` when it skipped evaluation, so every field is optional
/// on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: f32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_complexity: Option<String>,
}

impl Evaluation {
    /// Zero-rated stand-in shown when the evaluator could not be reached
    pub fn unavailable() -> Self {
        Self {
            rating: 0.0,
            feedback: FALLBACK_FEEDBACK.to_string(),
            ..Default::default()
        }
    }

    pub fn is_win(&self) -> bool {
        self.rating >= WIN_THRESHOLD
    }
}

/// One answered (or skipped) question, replayed to the server on every turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

/// Accepts `8`, `7.5`, `"8"`, `"8/10"` or `null`; clamps to 0..=10
pub(crate) fn lenient_rating<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let rating = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0) as f32,
        Some(serde_json::Value::String(s)) => s
            .split('/')
            .next()
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(rating.clamp(0.0, 10.0))
}
