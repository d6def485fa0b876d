pub mod store;

pub use store::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analysis::{EmotionLabel, SentimentLabel};
use crate::questions;

/// One per answered question. Created when the submission for that question
/// index is processed, never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub sentiment: SentimentLabel,
    pub emotion: EmotionLabel,
    pub image_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingAnswer(usize),
    Complete,
}

/// One questionnaire run. The current question index is always the number of
/// accumulated records; the summary exists only once every question is
/// answered.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    pub token: String,
    pub started_at: DateTime<Utc>,
    pub records: Vec<AnswerRecord>,
    pub summary: Option<String>,
}

impl Session {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            started_at: Utc::now(),
            records: Vec::new(),
            summary: None,
        }
    }

    pub fn index(&self) -> usize {
        self.records.len()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.records.len() >= questions::total() {
            SessionPhase::Complete
        } else {
            SessionPhase::AwaitingAnswer(self.records.len())
        }
    }

    pub fn sentiment_labels(&self) -> Vec<SentimentLabel> {
        self.records.iter().map(|r| r.sentiment).collect()
    }

    pub fn emotion_labels(&self) -> Vec<EmotionLabel> {
        self.records.iter().map(|r| r.emotion).collect()
    }
}
