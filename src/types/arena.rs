// src/types/arena.rs
use serde::{Deserialize, Serialize};

use super::interview::lenient_rating;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaProblem {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub starter_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReview {
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: f32,
    #[serde(default)]
    pub time_complexity: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_code: Option<String>,
}
