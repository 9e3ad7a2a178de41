// src/types/dashboard.rs
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::interview::lenient_rating;

/// One historical interaction as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRow")]
pub struct DashboardRecord {
    pub question: String,
    pub user_answer: String,
    pub rating: f32,
    pub topic: String,
    pub feedback: String,
    pub timestamp: Option<String>,
}

/// Wire shape of a history row. The database-backed server returns its
/// `interactions` columns (`answer`, `type`, nullable text), the mock server
/// returns `user_answer` and `topic`.
#[derive(Deserialize)]
struct StoredRow {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    user_answer: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    rating: f32,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<StoredRow> for DashboardRecord {
    fn from(row: StoredRow) -> Self {
        Self {
            question: row.question.unwrap_or_default(),
            user_answer: row.user_answer.or(row.answer).unwrap_or_default(),
            rating: row.rating,
            topic: row
                .topic
                .filter(|t| !t.is_empty())
                .or(row.kind)
                .unwrap_or_default(),
            feedback: row.feedback.unwrap_or_default(),
            timestamp: row.timestamp,
        }
    }
}

impl DashboardRecord {
    /// Parse the backend timestamp (RFC 3339 or naive ISO form)
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}
