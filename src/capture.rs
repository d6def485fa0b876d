//! Decoding and persistence of captured webcam frames.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Decodes a base64 data-URL (`data:image/...;base64,<payload>`). A bare
/// base64 string without the header is accepted too.
pub fn decode_data_url(payload: &str) -> Result<Vec<u8>> {
    let encoded = payload.split_once(',').map_or(payload, |(_, rest)| rest);
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::InvalidImage(format!("base64 decode failed: {}", e)))
}

/// Writes the frame under `<capture_dir>/<token>/q<n>.jpg`, named by the
/// 1-based question ordinal. Paths are token-scoped so concurrent runs
/// cannot clobber each other's captures.
pub fn store_capture(
    capture_dir: &Path,
    token: &str,
    question_index: usize,
    bytes: &[u8],
) -> Result<PathBuf> {
    let session_dir = capture_dir.join(token);
    fs::create_dir_all(&session_dir)?;
    let path = session_dir.join(format!("q{}.jpg", question_index + 1));
    fs::write(&path, bytes)?;
    debug!("Stored capture for question {} at {}", question_index + 1, path.display());
    Ok(path)
}
