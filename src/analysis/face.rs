use crossbeam::channel::{bounded, unbounded, Sender};
use image::GrayImage;
use log::{error, info};
use rustface::ImageData;
use std::path::Path;
use std::thread;

use crate::error::{AppError, Result};

/// Detection runs a strict pass first; the relaxed pass is the fallback when
/// the strict pass finds nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionPass {
    Strict,
    Relaxed,
}

/// Axis-aligned face bounding box in image pixel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Face localization pre-filter. Implementations return detections in scan
/// order; callers take the first region.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &GrayImage, pass: DetectionPass) -> Vec<FaceRegion>;
}

struct DetectJob {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    pass: DetectionPass,
    reply: Sender<Vec<FaceRegion>>,
}

/// SeetaFace frontal detector. The underlying detector is stateful and takes
/// `&mut self`, so a dedicated worker thread owns it and requests are fed
/// through a channel.
pub struct SeetaFaceDetector {
    jobs: Sender<DetectJob>,
}

impl SeetaFaceDetector {
    pub fn from_file(model_path: &Path) -> Result<Self> {
        let path = model_path
            .to_str()
            .ok_or_else(|| AppError::ModelLoad("face model path is not valid UTF-8".to_string()))?
            .to_string();
        let display = model_path.display().to_string();

        // The detector is created on the worker thread itself; it is not
        // required to be Send. Startup success is reported back once.
        let (jobs, queue) = unbounded::<DetectJob>();
        let (ready, started) = bounded::<std::result::Result<(), String>>(1);
        thread::Builder::new()
            .name("face-detector".to_string())
            .spawn(move || {
                let mut detector = match rustface::create_detector(&path) {
                    Ok(detector) => {
                        let _ = ready.send(Ok(()));
                        detector
                    }
                    Err(e) => {
                        let _ = ready.send(Err(e.to_string()));
                        return;
                    }
                };
                detector.set_pyramid_scale_factor(0.8);
                detector.set_slide_window_step(4, 4);

                while let Ok(job) = queue.recv() {
                    let (min_face_size, score_thresh) = match job.pass {
                        DetectionPass::Strict => (40, 2.0),
                        DetectionPass::Relaxed => (20, 0.95),
                    };
                    detector.set_min_face_size(min_face_size);
                    detector.set_score_thresh(score_thresh);

                    let mut image = ImageData::new(&job.pixels, job.width, job.height);
                    let regions = detector
                        .detect(&mut image)
                        .iter()
                        .map(|face| {
                            let bbox = face.bbox();
                            FaceRegion {
                                x: bbox.x().max(0) as u32,
                                y: bbox.y().max(0) as u32,
                                width: bbox.width(),
                                height: bbox.height(),
                            }
                        })
                        .collect();
                    let _ = job.reply.send(regions);
                }
            })
            .map_err(|e| AppError::ModelLoad(format!("failed to spawn detector thread: {}", e)))?;

        started
            .recv()
            .map_err(|_| {
                AppError::ModelLoad("face detector worker exited before startup".to_string())
            })?
            .map_err(|e| AppError::ModelLoad(format!("face detection model {}: {}", display, e)))?;

        info!("Face detection model loaded from {}", display);
        Ok(Self { jobs })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&self, image: &GrayImage, pass: DetectionPass) -> Vec<FaceRegion> {
        let (reply, response) = bounded(1);
        let job = DetectJob {
            pixels: image.as_raw().clone(),
            width: image.width(),
            height: image.height(),
            pass,
            reply,
        };

        if self.jobs.send(job).is_err() {
            error!("Face detector worker is gone; treating frame as faceless");
            return Vec::new();
        }
        match response.recv() {
            Ok(regions) => regions,
            Err(_) => {
                error!("Face detector worker dropped a request; treating frame as faceless");
                Vec::new()
            }
        }
    }
}
