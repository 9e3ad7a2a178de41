// src/session/interview.rs
//! Turn-based interview loop against the remote evaluator

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use super::voice::{self, AudioSink};
use super::{Loaded, Page, ViewState};
use crate::app_log;
use crate::core::{CoachApi, ResumeStore};
use crate::types::{Evaluation, HistoryEntry, Question, ResumeData};

/// Exchanges after which the interview hands over to the arena
pub const MAX_EXCHANGES: usize = 10;

pub struct InterviewSession {
    id: Uuid,
    api: Arc<dyn CoachApi>,
    resume: ResumeData,
    role: String,
    current: Question,
    next: Option<Question>,
    feedback: Option<Evaluation>,
    history: Vec<HistoryEntry>,
    score: u32,
}

impl InterviewSession {
    /// Open the interview: needs stored resume data, then asks for the first question.
    /// A failed request falls back to a canned opener.
    pub async fn start(
        api: Arc<dyn CoachApi>,
        store: &ResumeStore,
        role: Option<&str>,
        default_role: &str,
    ) -> Loaded<Self> {
        let Some(resume) = store.load_or_none().await else {
            app_log!(info, "No resume stored, redirecting to upload");
            return Loaded::Redirect(Page::Upload);
        };

        let id = Uuid::new_v4();
        let role = resume.role_label(role, default_role);
        app_log!(info, "Starting interview {} for role {}", id, role);

        let current = match api.start_interview(&resume.text, &role).await {
            Ok(q) if !q.question.trim().is_empty() => q,
            Ok(_) => {
                app_log!(warn, "Server returned an empty opening question");
                Question::fallback()
            }
            Err(e) => {
                app_log!(error, "Error starting interview: {:#}", e);
                Question::fallback()
            }
        };

        Loaded::Ready(Self {
            id,
            api,
            resume,
            role,
            current,
            next: None,
            feedback: None,
            history: Vec::new(),
            score: 0,
        })
    }

    /// Send the answer with the full history; the reply carries its evaluation and
    /// the follow-up question. Failures produce a zero-rated evaluation and keep the
    /// current question queued so the session never gets stuck.
    pub async fn submit_answer(&mut self, answer: &str, skipped: bool) -> Result<&Evaluation> {
        if self.feedback.is_some() {
            anyhow::bail!("Answer already submitted; move to the next question first");
        }

        let answer = if skipped { "" } else { answer.trim() };
        if answer.is_empty() && !skipped {
            anyhow::bail!("Answer is empty");
        }

        // The server evaluates the last history item, so the pending entry goes in first
        self.history.push(HistoryEntry {
            question: self.current.question.clone(),
            answer: answer.to_string(),
            skipped,
            evaluation: None,
        });

        let reply = self
            .api
            .next_question(&self.resume.text, &self.history, answer, skipped)
            .await;

        let (evaluation, next) = match reply {
            Ok(turn) => (
                turn.evaluation,
                turn.next_question
                    .filter(|q| !q.question.trim().is_empty()),
            ),
            Err(e) => {
                app_log!(error, "Interview {} evaluation failed: {:#}", self.id, e);
                (Evaluation::unavailable(), Some(self.current.clone()))
            }
        };

        if evaluation.is_win() {
            self.score += 1;
        }
        app_log!(
            info,
            "Interview {} exchange {} rated {}",
            self.id,
            self.history.len(),
            evaluation.rating
        );

        if let Some(entry) = self.history.last_mut() {
            entry.evaluation = Some(evaluation.clone());
        }
        self.next = next;

        Ok(&*self.feedback.insert(evaluation))
    }

    /// Move past the shown feedback. Returns the page to navigate to once the
    /// exchange cap is hit or the server has no further question.
    pub fn advance(&mut self) -> Option<Page> {
        self.feedback.take()?;

        if self.history.len() >= MAX_EXCHANGES {
            app_log!(info, "Interview {} reached {} exchanges", self.id, MAX_EXCHANGES);
            return Some(Page::Arena);
        }

        match self.next.take() {
            Some(question) => {
                self.current = question;
                None
            }
            None => {
                app_log!(info, "Interview {} has no further questions", self.id);
                Some(Page::Arena)
            }
        }
    }

    /// Play the current question through `sink`; failures are only logged
    pub async fn speak_question(&self, sink: &mut dyn AudioSink) -> bool {
        voice::speak_text(self.api.as_ref(), &self.current.question, sink).await
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn current_question(&self) -> &Question {
        &self.current
    }

    /// Feedback for the last answer, present until [`advance`](Self::advance)
    pub fn feedback(&self) -> Option<&Evaluation> {
        self.feedback.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn exchange_count(&self) -> usize {
        self.history.len()
    }

    /// 1-based number of the question on screen
    pub fn question_number(&self) -> usize {
        if self.feedback.is_some() {
            self.history.len()
        } else {
            self.history.len() + 1
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Turn;
    use crate::session::testing::{question, rated, sample_resume, shared, store_with, Call, FakeApi};

    fn turn(rating: f32, next: Option<&str>) -> Option<Turn> {
        Some(Turn {
            evaluation: rated(rating),
            next_question: next.map(question),
        })
    }

    async fn started(api: Arc<FakeApi>) -> InterviewSession {
        let (_dir, store) = store_with(Some(sample_resume())).await;
        InterviewSession::start(api, &store, None, "Software Engineer")
            .await
            .ready()
            .expect("resume is stored")
    }

    #[tokio::test]
    async fn test_missing_resume_redirects_to_upload() {
        let api = shared(FakeApi::default());
        let (_dir, store) = store_with(None).await;

        let loaded = InterviewSession::start(api.clone(), &store, None, "Software Engineer").await;
        assert!(matches!(loaded, Loaded::Redirect(Page::Upload)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_sends_detected_role() {
        let api = shared(FakeApi {
            start_reply: Some(question("Walk me through a payment outage.")),
            ..Default::default()
        });
        let session = started(api.clone()).await;

        assert_eq!(session.current_question().question, "Walk me through a payment outage.");
        assert_eq!(session.question_number(), 1);
        assert_eq!(
            api.calls(),
            vec![Call::Start {
                resume_text: sample_resume().text,
                role: "Backend Developer".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_start_failure_uses_fallback_question() {
        let api = shared(FakeApi::default());
        let session = started(api).await;

        assert_eq!(session.current_question(), &Question::fallback());
        assert_eq!(session.state(), ViewState::Interactive);
    }

    #[tokio::test]
    async fn test_submit_sends_history_and_scores_wins() {
        let api = shared(FakeApi {
            start_reply: Some(question("Q1")),
            ..Default::default()
        });
        api.push_turn(turn(8.0, Some("Q2")));
        api.push_turn(turn(6.0, Some("Q3")));

        let mut session = started(api.clone()).await;

        let eval = session.submit_answer("  I led the migration.  ", false).await.unwrap();
        assert_eq!(eval.rating, 8.0);
        assert_eq!(session.score(), 1);
        assert_eq!(session.state(), ViewState::ShowingResult);
        assert_eq!(session.advance(), None);
        assert_eq!(session.current_question().question, "Q2");
        assert!(session.feedback().is_none());

        session.submit_answer("Not sure.", false).await.unwrap();
        assert_eq!(session.score(), 1);

        let calls = api.calls();
        let Call::Next { history, last_answer, skipped } = &calls[2] else {
            panic!("expected second next call, got {:?}", calls[2]);
        };
        assert_eq!(last_answer, "Not sure.");
        assert!(!skipped);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "Q1");
        assert_eq!(history[0].answer, "I led the migration.");
        assert_eq!(history[0].evaluation.as_ref().map(|e| e.rating), Some(8.0));
        assert_eq!(history[1].question, "Q2");
        assert_eq!(history[1].evaluation, None);

        assert_eq!(session.history()[1].evaluation.as_ref().map(|e| e.rating), Some(6.0));
    }

    #[tokio::test]
    async fn test_skip_sends_empty_answer() {
        let api = shared(FakeApi {
            start_reply: Some(question("Q1")),
            ..Default::default()
        });
        api.push_turn(Some(Turn {
            evaluation: Evaluation::default(),
            next_question: Some(question("Q2")),
        }));

        let mut session = started(api.clone()).await;
        let eval = session.submit_answer("ignored", true).await.unwrap();
        assert_eq!(eval.rating, 0.0);

        let calls = api.calls();
        assert!(matches!(
            &calls[1],
            Call::Next { last_answer, skipped: true, .. } if last_answer.is_empty()
        ));
        assert!(session.history()[0].skipped);
    }

    #[tokio::test]
    async fn test_blank_answer_and_double_submit_rejected() {
        let api = shared(FakeApi::default());
        api.push_turn(turn(5.0, Some("Q2")));
        let mut session = started(api.clone()).await;

        assert!(session.submit_answer("   ", false).await.is_err());
        assert!(session.history().is_empty());

        session.submit_answer("answer", false).await.unwrap();
        assert!(session.submit_answer("again", false).await.is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_next_yields_zero_rating_and_stays_interactive() {
        let api = shared(FakeApi {
            start_reply: Some(question("Q1")),
            ..Default::default()
        });
        api.push_turn(None);

        let mut session = started(api).await;
        let eval = session.submit_answer("my answer", false).await.unwrap().clone();

        assert_eq!(eval, Evaluation::unavailable());
        assert_eq!(eval.rating, 0.0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.history().len(), 1);

        assert_eq!(session.advance(), None);
        assert_eq!(session.state(), ViewState::Interactive);
        assert_eq!(session.current_question().question, "Q1");
    }

    #[tokio::test]
    async fn test_null_next_question_ends_interview() {
        let api = shared(FakeApi::default());
        api.push_turn(turn(9.0, None));

        let mut session = started(api).await;
        session.submit_answer("done", false).await.unwrap();
        assert_eq!(session.advance(), Some(Page::Arena));
    }

    #[tokio::test]
    async fn test_cap_of_ten_exchanges_ends_interview() {
        let api = shared(FakeApi::default());
        for i in 0..MAX_EXCHANGES {
            api.push_turn(turn(7.0, Some(&format!("Q{}", i + 2))));
        }

        let mut session = started(api).await;
        for i in 1..=MAX_EXCHANGES {
            session.submit_answer("answer", false).await.unwrap();
            assert_eq!(session.question_number(), i);
            let nav = session.advance();
            if i < MAX_EXCHANGES {
                assert_eq!(nav, None, "navigated early at exchange {}", i);
            } else {
                assert_eq!(nav, Some(Page::Arena));
            }
        }
        assert_eq!(session.exchange_count(), MAX_EXCHANGES);
        assert_eq!(session.score(), MAX_EXCHANGES as u32);
    }

    #[tokio::test]
    async fn test_advance_without_feedback_is_noop() {
        let api = shared(FakeApi {
            start_reply: Some(question("Q1")),
            ..Default::default()
        });
        let mut session = started(api).await;
        assert_eq!(session.advance(), None);
        assert_eq!(session.current_question().question, "Q1");
    }
}
