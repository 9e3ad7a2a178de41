// src/types/mod.rs
//! Wire and client-state data structures shared by the service client and pages

pub mod arena;
pub mod dashboard;
pub mod interview;
pub mod quiz;
pub mod response;
pub mod resume;

pub use arena::{ArenaProblem, CodeReview};
pub use dashboard::DashboardRecord;
pub use interview::{Evaluation, HistoryEntry, Question, WIN_THRESHOLD};
pub use quiz::QuizQuestion;
pub use resume::ResumeData;
