use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;

/// Runtime settings, loaded from `mindscreen.toml` (optional) and
/// `MINDSCREEN_*` environment variables, with working defaults for
/// local development.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Directory where per-session capture frames are stored.
    pub capture_dir: PathBuf,
    /// Output path of the generated PDF report. Overwritten per completed run.
    pub report_path: PathBuf,
    /// SeetaFace frontal detection model (binary format).
    pub face_model: PathBuf,
    /// 7-class facial emotion classifier in ONNX format, 48x48 grayscale input.
    pub emotion_model: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind_addr", "127.0.0.1:8000")?
            .set_default("capture_dir", "static/captures")?
            .set_default("report_path", "report.pdf")?
            .set_default("face_model", "models/seeta_fd_frontal_v1.0.bin")?
            .set_default("emotion_model", "models/emotion.onnx")?
            .add_source(File::with_name("mindscreen").required(false))
            .add_source(Environment::with_prefix("MINDSCREEN"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
