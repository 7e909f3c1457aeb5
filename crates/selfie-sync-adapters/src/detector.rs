//! SeetaFace frontal-face detector adapter.
//!
//! Wraps the pretrained funnel-structured cascade from the `rustface` crate.
//! Detection runs on the grayscale plane the cropper hands in; boxes come
//! back in detector order with negative edges clamped to the image origin.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use image::GrayImage;
use rustface::ImageData;
use selfie_sync_core::domain::FaceBox;
use selfie_sync_core::ports::FaceDetector;
use tracing::debug;

/// Cascade tuning parameters.
#[derive(Debug, Clone)]
pub struct DetectorParams {
    /// Smallest face edge considered, in pixels.
    pub min_face_size: u32,
    /// Classifier score threshold.
    pub score_thresh: f64,
    /// Image pyramid scale factor.
    pub pyramid_scale_factor: f32,
    /// Sliding window step in x and y.
    pub slide_window_step: (u32, u32),
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: (4, 4),
        }
    }
}

/// Frontal-face detector backed by a pretrained SeetaFace model.
pub struct SeetaDetector {
    // rustface detection mutates internal pyramid buffers.
    inner: Mutex<Box<dyn rustface::Detector>>,
}

// SAFETY: `rustface::create_detector` returns the crate's `FuStDetector`,
// which owns only `Vec`s and primitives (no `Rc`, interior mutability, or
// raw-pointer fields), so it is `Send` in all but name; the trait object
// merely erases that. All mutation goes through the `Mutex`.
unsafe impl Send for SeetaDetector {}
unsafe impl Sync for SeetaDetector {}

impl SeetaDetector {
    /// Loads the cascade model from disk and applies the given parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file is missing or malformed.
    pub fn from_file(model: &Path, params: &DetectorParams) -> Result<Self> {
        let model_str = model
            .to_str()
            .with_context(|| format!("non-UTF-8 model path {}", model.display()))?;
        let mut detector = rustface::create_detector(model_str)
            .map_err(|e| anyhow::anyhow!("failed to load detector model {model_str}: {e:?}"))?;

        detector.set_min_face_size(params.min_face_size);
        detector.set_score_thresh(params.score_thresh);
        detector.set_pyramid_scale_factor(params.pyramid_scale_factor);
        let (step_x, step_y) = params.slide_window_step;
        detector.set_slide_window_step(step_x, step_y);
        debug!("Loaded face detector model from {}", model.display());

        Ok(Self {
            inner: Mutex::new(detector),
        })
    }
}

impl FaceDetector for SeetaDetector {
    fn detect(&self, image: &GrayImage) -> Result<Vec<FaceBox>> {
        let mut data = ImageData::new(image.as_raw(), image.width(), image.height());
        let mut detector = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let faces = detector.detect(&mut data);

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                #[allow(clippy::cast_sign_loss)]
                FaceBox {
                    x: bbox.x().max(0) as u32,
                    y: bbox.y().max(0) as u32,
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect())
    }
}
