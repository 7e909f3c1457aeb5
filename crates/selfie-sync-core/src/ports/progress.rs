//! Progress reporting port for the crop drain.

use std::path::PathBuf;

use crate::domain::CropOutcome;

/// Events emitted while the crop queue is drained.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Cropping started for one queued image.
    Started {
        /// Path of the queued image.
        path: PathBuf,
        /// Index in the snapshot (0-based).
        index: usize,
        /// Snapshot length.
        total: usize,
    },
    /// A queue entry reached its terminal state.
    Completed {
        /// Path of the queued image.
        path: PathBuf,
        /// Terminal state.
        outcome: CropOutcome,
    },
    /// The whole snapshot has been processed.
    Finished {
        /// Number of entries processed.
        processed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called for every progress event.
    fn on_event(&self, event: ProgressEvent);
}

/// Sink that discards all events.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}
