//! Selfie Sync Core - Domain logic and pipeline engines.
//!
//! This crate contains the domain types, the port traits for roster fetching,
//! drive downloads, state persistence and face detection, and the two engines
//! that drive the pipeline: roster synchronization and face cropping.

pub mod crop;
pub mod domain;
pub mod ports;
pub mod sync;

pub use crop::{crop_pending, CropOptions, CropReport};
pub use domain::{
    sanitize_name, CropOutcome, DriveFileId, FaceBox, LedgerEntry, RosterRow, RowAction, RowResult,
};
pub use ports::{
    DriveClient, DriveFetch, FaceDetector, NoProgress, ProgressEvent, ProgressSink, RosterSource,
    StateStore,
};
pub use sync::{sync_roster, SyncOptions, SyncReport};
