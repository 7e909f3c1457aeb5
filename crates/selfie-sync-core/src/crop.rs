//! Face cropping engine: drains the crop queue.
//!
//! The queue is processed as a snapshot; each entry is removed after its
//! attempt regardless of outcome, so the on-disk queue shrinks monotonically
//! within a run. An image goes `queued -> {cropped, no-face, unreadable}`,
//! all terminal, no retries.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::CropOutcome;
use crate::ports::{FaceDetector, ProgressEvent, ProgressSink, StateStore};

/// Suffix inserted before the extension of cropped output files.
pub const CROP_SUFFIX: &str = "_CROPPED";

/// Settings for one crop run.
#[derive(Debug, Clone)]
pub struct CropOptions {
    /// Directory cropped faces are written to; created if absent.
    pub cropped_dir: PathBuf,
}

impl CropOptions {
    /// Creates options for the given output directory.
    #[must_use]
    pub fn new(cropped_dir: impl Into<PathBuf>) -> Self {
        Self {
            cropped_dir: cropped_dir.into(),
        }
    }
}

/// Summary of one crop run.
#[derive(Debug, Default)]
pub struct CropReport {
    /// Entries that produced a cropped output file.
    pub cropped: usize,
    /// Entries where the detector found no face.
    pub no_face: usize,
    /// Entries whose image could not be read.
    pub unreadable: usize,
    /// Entries that failed during detection or writing.
    pub errors: usize,
}

impl CropReport {
    /// Total queue entries processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.cropped + self.no_face + self.unreadable + self.errors
    }
}

/// Drains the crop queue, cropping the first detected face of each image.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or the state
/// store fails to persist. Per-image failures are absorbed and counted.
pub fn crop_pending(
    store: &mut dyn StateStore,
    detector: &dyn FaceDetector,
    opts: &CropOptions,
    progress: &dyn ProgressSink,
) -> Result<CropReport> {
    fs::create_dir_all(&opts.cropped_dir).with_context(|| {
        format!(
            "failed to create cropped directory {}",
            opts.cropped_dir.display()
        )
    })?;

    let pending = store.list_pending();
    info!("Cropping {} queued images", pending.len());

    let mut report = CropReport::default();
    let total = pending.len();
    for (index, path) in pending.into_iter().enumerate() {
        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let outcome = match crop_one(&path, detector, opts) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Cropping {} failed: {e:#}", path.display());
                report.errors += 1;
                store.complete(&path)?;
                continue;
            }
        };
        // Terminal either way: the entry leaves the queue after one attempt.
        store.complete(&path)?;

        match &outcome {
            CropOutcome::Cropped { output } => {
                info!("Cropped face saved to {}", output.display());
                report.cropped += 1;
            }
            CropOutcome::NoFace => {
                info!("No face found in {}", path.display());
                report.no_face += 1;
            }
            CropOutcome::Unreadable => {
                warn!("Could not read {}", path.display());
                report.unreadable += 1;
            }
        }
        progress.on_event(ProgressEvent::Completed { path, outcome });
    }

    progress.on_event(ProgressEvent::Finished {
        processed: report.processed(),
    });
    Ok(report)
}

/// Attempts to crop a single queued image.
fn crop_one(path: &Path, detector: &dyn FaceDetector, opts: &CropOptions) -> Result<CropOutcome> {
    // image::open handles non-ASCII paths; decode failures and missing files
    // both end up as Unreadable.
    let Ok(img) = image::open(path) else {
        return Ok(CropOutcome::Unreadable);
    };

    let gray = img.to_luma8();
    let faces = detector.detect(&gray)?;
    // Only the first detected face is used.
    let Some(face) = faces.first() else {
        return Ok(CropOutcome::NoFace);
    };
    let Some(face) = face.clamped(img.width(), img.height()) else {
        return Ok(CropOutcome::NoFace);
    };

    let output = opts.cropped_dir.join(output_filename(path));
    let cropped = face.crop(&img);
    cropped
        .save(&output)
        .with_context(|| format!("failed to save {}", output.display()))?;
    Ok(CropOutcome::Cropped { output })
}

/// Builds the output filename: original stem plus [`CROP_SUFFIX`] before the
/// extension.
fn output_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}{CROP_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{CROP_SUFFIX}"),
    }
}
