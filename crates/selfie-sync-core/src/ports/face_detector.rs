//! Face detector port.

use image::GrayImage;

use crate::domain::FaceBox;

/// Port for frontal-face detection on a grayscale image.
pub trait FaceDetector: Send + Sync {
    /// Detects faces, returned in detector order. The cropper uses only the
    /// first box.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying detector fails.
    fn detect(&self, image: &GrayImage) -> anyhow::Result<Vec<FaceBox>>;
}
