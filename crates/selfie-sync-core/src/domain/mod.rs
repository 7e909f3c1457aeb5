//! Core domain types for the selfie synchronization pipeline.

mod face;
mod ledger;
mod outcome;
mod roster;

pub use face::FaceBox;
pub use ledger::LedgerEntry;
pub use outcome::{CropOutcome, RowAction, RowResult};
pub use roster::{sanitize_name, DriveFileId, RosterRow};
