use log::info;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::{AnswerRecord, Session, SessionPhase};
use crate::error::{AppError, Result};

/// Token-keyed map of active questionnaire runs. One run per token; starting
/// a new run for a token discards whatever state that token had.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a fresh session for the token, discarding any prior run.
    pub fn start(&self, token: &str) -> Session {
        let session = Session::new(token);
        let mut sessions = self.sessions.lock();
        if sessions.insert(token.to_string(), session.clone()).is_some() {
            info!("Session {} restarted; prior answers discarded", token);
        }
        session
    }

    /// Index of the question awaiting an answer.
    pub fn current_index(&self, token: &str) -> Result<usize> {
        let sessions = self.sessions.lock();
        let session = sessions.get(token).ok_or(AppError::NoSession)?;
        match session.phase() {
            SessionPhase::AwaitingAnswer(index) => Ok(index),
            SessionPhase::Complete => Err(AppError::AlreadyComplete),
        }
    }

    /// Appends a record, guarding against out-of-order submissions, and
    /// returns the phase the session moved into.
    pub fn push_record(
        &self,
        token: &str,
        expected_index: usize,
        record: AnswerRecord,
    ) -> Result<SessionPhase> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(token).ok_or(AppError::NoSession)?;
        match session.phase() {
            SessionPhase::Complete => Err(AppError::AlreadyComplete),
            SessionPhase::AwaitingAnswer(index) if index != expected_index => {
                Err(AppError::IndexConflict)
            }
            SessionPhase::AwaitingAnswer(_) => {
                session.records.push(record);
                Ok(session.phase())
            }
        }
    }

    pub fn set_summary(&self, token: &str, summary: String) -> Result<()> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(token).ok_or(AppError::NoSession)?;
        session.summary = Some(summary);
        Ok(())
    }

    pub fn summary(&self, token: &str) -> Option<String> {
        self.sessions.lock().get(token).and_then(|s| s.summary.clone())
    }

    pub fn snapshot(&self, token: &str) -> Option<Session> {
        self.sessions.lock().get(token).cloned()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{EmotionLabel, SentimentLabel};
    use crate::questions;
    use std::path::PathBuf;

    fn record(n: usize) -> AnswerRecord {
        AnswerRecord {
            question: questions::get(n).unwrap_or_default().to_string(),
            answer: format!("answer {}", n),
            sentiment: SentimentLabel::Neutral,
            emotion: EmotionLabel::Neutral,
            image_path: PathBuf::from(format!("q{}.jpg", n + 1)),
        }
    }

    #[test]
    fn index_tracks_record_count_through_a_full_run() {
        let store = SessionStore::new();
        store.start("t");
        for n in 0..questions::total() {
            assert_eq!(store.current_index("t").unwrap(), n);
            let phase = store.push_record("t", n, record(n)).unwrap();
            if n + 1 < questions::total() {
                assert_eq!(phase, SessionPhase::AwaitingAnswer(n + 1));
            } else {
                assert_eq!(phase, SessionPhase::Complete);
            }
        }
        let session = store.snapshot("t").unwrap();
        assert_eq!(session.records.len(), questions::total());
        assert_eq!(session.index(), questions::total());
    }

    #[test]
    fn submissions_past_the_end_are_rejected() {
        let store = SessionStore::new();
        store.start("t");
        for n in 0..questions::total() {
            store.push_record("t", n, record(n)).unwrap();
        }
        assert!(matches!(
            store.current_index("t"),
            Err(AppError::AlreadyComplete)
        ));
        assert!(matches!(
            store.push_record("t", questions::total(), record(0)),
            Err(AppError::AlreadyComplete)
        ));
    }

    #[test]
    fn out_of_order_submission_is_a_conflict() {
        let store = SessionStore::new();
        store.start("t");
        store.push_record("t", 0, record(0)).unwrap();
        assert!(matches!(
            store.push_record("t", 0, record(0)),
            Err(AppError::IndexConflict)
        ));
    }

    #[test]
    fn unknown_token_has_no_session() {
        let store = SessionStore::new();
        assert!(matches!(
            store.current_index("ghost"),
            Err(AppError::NoSession)
        ));
        assert!(store.snapshot("ghost").is_none());
    }

    #[test]
    fn restart_discards_prior_state() {
        let store = SessionStore::new();
        store.start("t");
        store.push_record("t", 0, record(0)).unwrap();
        store.set_summary("t", "partial".to_string()).unwrap();

        let fresh = store.start("t");
        assert_eq!(fresh.index(), 0);
        assert_eq!(store.current_index("t").unwrap(), 0);
        assert!(store.summary("t").is_none());
    }

    #[test]
    fn summary_exists_only_after_completion() {
        let store = SessionStore::new();
        store.start("t");
        assert!(store.summary("t").is_none());
        for n in 0..questions::total() {
            store.push_record("t", n, record(n)).unwrap();
        }
        store.set_summary("t", "done".to_string()).unwrap();
        assert_eq!(store.summary("t").as_deref(), Some("done"));
    }
}
