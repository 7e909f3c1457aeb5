//! Per-item outcomes of the sync and crop engines.

use std::path::PathBuf;

/// What the sync engine did for one roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Ledger already maps the name to this file id; no network call made.
    Unchanged,
    /// Fresh download from the drive service.
    Downloaded {
        /// Local path the body was written to.
        path: PathBuf,
        /// Whether the bytes differ from what was on disk before.
        changed: bool,
    },
    /// Another name already held the same file id; its local file was copied.
    Copied {
        /// Local path of the new copy.
        path: PathBuf,
    },
    /// Download failed (non-200 or transport error); the fallback sentinel
    /// filename stands in and no state was mutated.
    Failed,
    /// Row had no usable selfie URL or no extractable file id.
    Skipped,
}

/// Sync outcome for a single named row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    /// Roster name the row belongs to.
    pub name: String,
    /// Action taken.
    pub action: RowAction,
}

/// Terminal state of one crop queue entry. Every variant removes the entry
/// from the queue; there are no retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    /// A face was found and the cropped region written out.
    Cropped {
        /// Path of the cropped output file.
        output: PathBuf,
    },
    /// The detector found no face; no output file is produced.
    NoFace,
    /// The image could not be read or decoded.
    Unreadable,
}
