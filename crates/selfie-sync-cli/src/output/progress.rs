//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use selfie_sync_core::domain::CropOutcome;
use selfie_sync_core::ports::{ProgressEvent, ProgressSink};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of queue entries
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-item status
    #[must_use]
    pub fn new(total: u64, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = if show_bar {
            let bar = IndicatifBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            Some(bar)
        } else {
            None
        };

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { path, index, total } => {
                if let Some(bar) = &self.bar {
                    bar.set_length(total as u64);
                    bar.set_position(index as u64);
                    bar.set_message(path.display().to_string());
                }
            }
            ProgressEvent::Completed { path, outcome } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                } else {
                    match outcome {
                        CropOutcome::Cropped { output } => {
                            eprintln!("{} -> {}", path.display(), output.display());
                        }
                        CropOutcome::NoFace => {
                            eprintln!("{}: no face", path.display());
                        }
                        CropOutcome::Unreadable => {
                            eprintln!("WARN: could not read {}", path.display());
                        }
                    }
                }
            }
            ProgressEvent::Finished { processed } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!("Done: {processed} processed"));
                }
            }
        }
    }
}
