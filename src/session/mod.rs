// src/session/mod.rs
//! Page view-models: each page owns its state and moves between pages only by
//! returning a navigation target

pub mod arena;
pub mod dashboard;
pub mod interview;
pub mod practice;
pub mod quiz;
pub mod upload;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

pub use arena::ArenaSession;
pub use dashboard::Dashboard;
pub use interview::{InterviewSession, MAX_EXCHANGES};
pub use practice::PracticeSession;
pub use quiz::QuizSession;
pub use upload::UploadPage;
pub use voice::{AudioCapture, AudioSink, AudioSource, VoiceRecorder};

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Upload,
    Interview,
    Arena,
    Quiz,
    Dashboard,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Page::Upload => "upload",
            Page::Interview => "interview",
            Page::Arena => "arena",
            Page::Quiz => "quiz",
            Page::Dashboard => "dashboard",
        };
        f.write_str(name)
    }
}

/// Outcome of opening a page that needs stored resume data
#[derive(Debug)]
pub enum Loaded<T> {
    Ready(T),
    Redirect(Page),
}

impl<T> Loaded<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Loaded::Ready(page) => Some(page),
            Loaded::Redirect(_) => None,
        }
    }
}

/// What an interactive page is currently showing; loading is the pending future
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Interactive,
    ShowingResult,
}
