pub mod analysis;
pub mod capture;
pub mod config;
pub mod error;
pub mod questions;
pub mod report;
pub mod routes;
pub mod session;

use crate::analysis::{
    FacialEmotionClassifier, OnnxEmotionModel, SeetaFaceDetector, SentimentAnalyzer,
};
use crate::config::AppConfig;
use crate::error::Result;
use crate::session::SessionStore;

/// Shared application state, passed by reference through every handler.
pub struct AppState {
    pub settings: AppConfig,
    pub store: SessionStore,
    pub sentiment: SentimentAnalyzer,
    pub emotion: FacialEmotionClassifier,
}

impl AppState {
    /// Loads both pretrained models and prepares the capture directory.
    pub fn initialize(settings: AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&settings.capture_dir)?;
        let detector = SeetaFaceDetector::from_file(&settings.face_model)?;
        let model = OnnxEmotionModel::from_file(&settings.emotion_model)?;
        let emotion = FacialEmotionClassifier::new(Box::new(detector), Box::new(model));
        Ok(Self::with_classifier(settings, emotion))
    }

    /// Assembles state around an existing classifier, so tests can substitute
    /// doubles for the pretrained models.
    pub fn with_classifier(settings: AppConfig, emotion: FacialEmotionClassifier) -> Self {
        Self {
            settings,
            store: SessionStore::new(),
            sentiment: SentimentAnalyzer::new(),
            emotion,
        }
    }
}
