//! State store port: ledger, crop queue and changed list behind one handle.
//!
//! Callers pass an explicit store instead of relying on ambient files. Every
//! mutating method persists eagerly before returning; there is no transaction
//! spanning the ledger and the queue, so a crash between two calls can leave
//! them inconsistent (accepted, single sequential run assumed).

use std::path::{Path, PathBuf};

use crate::domain::{DriveFileId, LedgerEntry};

/// Port over the persisted pipeline state.
pub trait StateStore {
    /// Looks up the ledger entry for a roster name.
    fn get(&self, name: &str) -> Option<LedgerEntry>;

    /// Inserts or overwrites the ledger entry for a name. Entries are never
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    fn put(&mut self, name: &str, entry: LedgerEntry) -> anyhow::Result<()>;

    /// Finds any name already mapped to the given file id.
    fn find_by_file_id(&self, id: &DriveFileId) -> Option<(String, LedgerEntry)>;

    /// Appends a path to the crop queue unless it is already pending.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    fn enqueue(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Returns a snapshot of the paths awaiting cropping, in append order.
    fn list_pending(&self) -> Vec<PathBuf>;

    /// Removes a path from the crop queue. Called exactly once per attempt,
    /// whatever its outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    fn complete(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Records a path whose content changed during this sync run.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    fn record_changed(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Returns the changed paths recorded so far.
    fn list_changed(&self) -> Vec<PathBuf>;

    /// Clears the changed list at the start of a sync run.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    fn clear_changed(&mut self) -> anyhow::Result<()>;
}
