use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tract_onnx::prelude::*;

use crate::analysis::face::{DetectionPass, FaceDetector, FaceRegion};
use crate::error::{AppError, Result};

/// Model input side length; faces are cropped and resized to this square.
pub const FACE_INPUT_SIZE: u32 = 48;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmotionLabel {
    Angry,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprise,
    /// Degraded state: both detection passes found no face. Not an emotion.
    #[serde(rename = "No face detected")]
    NoFace,
}

impl EmotionLabel {
    /// Classifier output classes, indexed by model output position.
    pub const CLASSES: [EmotionLabel; 7] = [
        EmotionLabel::Angry,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Sad,
        EmotionLabel::Surprise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Angry => "Angry",
            EmotionLabel::Disgust => "Disgust",
            EmotionLabel::Fear => "Fear",
            EmotionLabel::Happy => "Happy",
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::Sad => "Sad",
            EmotionLabel::Surprise => "Surprise",
            EmotionLabel::NoFace => "No face detected",
        }
    }

    /// Whether this label counts toward the negative-signal tally.
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            EmotionLabel::Sad | EmotionLabel::Fear | EmotionLabel::Angry | EmotionLabel::Disgust
        )
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw 7-class scorer over a normalized 48x48 grayscale face.
pub trait EmotionModel: Send + Sync {
    /// `face` is row-major, length `FACE_INPUT_SIZE * FACE_INPUT_SIZE`,
    /// values in [0, 1]. Returns one score per class in `EmotionLabel::CLASSES`
    /// order.
    fn predict(&self, face: &[f32]) -> Result<Vec<f32>>;
}

type OnnxPlan = TypedSimplePlan<TypedModel>;

pub struct OnnxEmotionModel {
    plan: OnnxPlan,
}

impl OnnxEmotionModel {
    pub fn from_file(path: &Path) -> Result<Self> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, 48, 48, 1]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                AppError::ModelLoad(format!("emotion model {}: {}", path.display(), e))
            })?;
        info!("Emotion classification model loaded from {}", path.display());
        Ok(Self { plan })
    }
}

impl EmotionModel for OnnxEmotionModel {
    fn predict(&self, face: &[f32]) -> Result<Vec<f32>> {
        let input = tract_ndarray::Array4::from_shape_vec((1, 48, 48, 1), face.to_vec())
            .map_err(|e| AppError::Inference(format!("bad face buffer shape: {}", e)))?;
        let outputs = self
            .plan
            .run(tvec!(Tensor::from(input).into()))
            .map_err(|e| AppError::Inference(e.to_string()))?;
        let scores = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| AppError::Inference(e.to_string()))?;
        Ok(scores.iter().copied().collect())
    }
}

/// Full facial pipeline: localize, crop, normalize, classify. Both stages are
/// injected so tests can stand in doubles for the pretrained models.
pub struct FacialEmotionClassifier {
    detector: Box<dyn FaceDetector>,
    model: Box<dyn EmotionModel>,
}

impl FacialEmotionClassifier {
    pub fn new(detector: Box<dyn FaceDetector>, model: Box<dyn EmotionModel>) -> Self {
        Self { detector, model }
    }

    /// Classifies the first detected face, or returns the `NoFace` sentinel
    /// when both detection passes come up empty.
    pub fn classify(&self, image: &DynamicImage) -> Result<EmotionLabel> {
        let gray = image.to_luma8();
        let region = self
            .detector
            .detect(&gray, DetectionPass::Strict)
            .into_iter()
            .next()
            .or_else(|| {
                self.detector
                    .detect(&gray, DetectionPass::Relaxed)
                    .into_iter()
                    .next()
            });

        let Some(region) = region else {
            debug!("No face found in either detection pass");
            return Ok(EmotionLabel::NoFace);
        };

        let face = normalized_face(&gray, &region);
        let scores = self.model.predict(&face)?;
        if scores.len() != EmotionLabel::CLASSES.len() {
            return Err(AppError::Inference(format!(
                "expected {} class scores, got {}",
                EmotionLabel::CLASSES.len(),
                scores.len()
            )));
        }
        Ok(EmotionLabel::CLASSES[argmax(&scores)])
    }
}

/// Crops the region (clamped to image bounds), resizes to the model input
/// square and scales pixel values to [0, 1].
fn normalized_face(gray: &GrayImage, region: &FaceRegion) -> Vec<f32> {
    let x = region.x.min(gray.width() - 1);
    let y = region.y.min(gray.height() - 1);
    let width = region.width.clamp(1, gray.width() - x);
    let height = region.height.clamp(1, gray.height() - y);

    let face = imageops::crop_imm(gray, x, y, width, height).to_image();
    let resized = imageops::resize(&face, FACE_INPUT_SIZE, FACE_INPUT_SIZE, FilterType::Triangle);
    resized
        .into_raw()
        .into_iter()
        .map(|pixel| pixel as f32 / 255.0)
        .collect()
}

/// Index of the maximum score; ties resolve to the lowest index.
fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = index;
        }
    }
    best
}
