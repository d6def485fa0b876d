use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No active session")]
    NoSession,
    #[error("Questionnaire already complete")]
    AlreadyComplete,
    #[error("Submission out of order for current question")]
    IndexConflict,
    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
    #[error("Model loading failed: {0}")]
    ModelLoad(String),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Report generation failed: {0}")]
    Report(String),
    #[error("Report has not been generated yet")]
    ReportNotReady,
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoSession | AppError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyComplete | AppError::IndexConflict => StatusCode::CONFLICT,
            AppError::ReportNotReady => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
