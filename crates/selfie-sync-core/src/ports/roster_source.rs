//! Roster source port.

use crate::domain::RosterRow;

/// Port for fetching the roster of (name, selfie URL) pairs.
pub trait RosterSource: Send + Sync {
    /// Fetches all roster rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be retrieved or parsed; a failed
    /// roster fetch aborts the whole sync run.
    fn rows(&self) -> anyhow::Result<Vec<RosterRow>>;
}
