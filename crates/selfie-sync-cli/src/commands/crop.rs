//! Crop command - drain the crop queue through the face detector.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use selfie_sync_adapters::{models, DetectorParams, JsonStateStore, SeetaDetector};
use selfie_sync_core::ports::StateStore;
use selfie_sync_core::{crop_pending, CropOptions, CropReport};
use tracing::info;

use crate::config::AppConfig;
use crate::output::ProgressBar;

/// Hardcoded default output directory.
mod defaults {
    pub const CROPPED_DIR: &str = "src/assets/selfiescropped";
}

/// Arguments for the crop command.
#[derive(Args, Clone)]
pub struct CropArgs {
    /// Directory cropped faces land in
    #[arg(long, value_name = "DIR")]
    pub cropped_dir: Option<PathBuf>,

    /// Path of the cascade model file (defaults to the cached download)
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Smallest face edge considered, in pixels
    #[arg(long, value_name = "PX")]
    pub min_face_size: Option<u32>,

    /// Classifier score threshold
    #[arg(long, value_name = "SCORE")]
    pub score_thresh: Option<f64>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CropArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.cropped_dir = args
            .cropped_dir
            .or_else(|| config.paths.cropped_dir.clone());
        args.model = args.model.or_else(|| config.detector.model.clone());
        args.min_face_size = args.min_face_size.or(config.detector.min_face_size);
        args.score_thresh = args.score_thresh.or(config.detector.score_thresh);
        args
    }
}

/// Run the crop command.
///
/// Per-image failures are absorbed into the report; a missing detector model
/// is a run-level error.
pub fn run(args: &CropArgs, state_dir: Option<&Path>) -> Result<CropReport> {
    let config = AppConfig::load();
    let args = CropArgs::with_config(args.clone(), &config);

    let cropped_dir = args
        .cropped_dir
        .unwrap_or_else(|| PathBuf::from(defaults::CROPPED_DIR));
    let state_dir = super::sync::resolve_state_dir(state_dir, &config);

    let model = args.model.unwrap_or_else(models::model_path);
    if !model.is_file() {
        anyhow::bail!(
            "detector model not found at {}; run `selfie-sync models fetch` first",
            model.display()
        );
    }

    let mut params = DetectorParams::default();
    if let Some(size) = args.min_face_size {
        params.min_face_size = size;
    }
    if let Some(thresh) = args.score_thresh {
        params.score_thresh = thresh;
    }
    let detector = SeetaDetector::from_file(&model, &params)
        .with_context(|| format!("failed to load detector from {}", model.display()))?;

    let mut store = JsonStateStore::open(state_dir)?;
    let total = store.list_pending().len();
    info!("Cropping {total} queued images into {}", cropped_dir.display());

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total as u64, args.quiet, show_progress);

    let opts = CropOptions::new(cropped_dir);
    let report = crop_pending(&mut store, &detector, &opts, &progress)?;
    println!(
        "{} processed: {} cropped, {} without a face, {} unreadable, {} errors",
        report.processed(),
        report.cropped,
        report.no_face,
        report.unreadable,
        report.errors
    );
    Ok(report)
}
