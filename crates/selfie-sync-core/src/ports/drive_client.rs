//! Drive download port.

use crate::domain::DriveFileId;

/// Result of one drive fetch.
///
/// A non-200 response is an expected outcome, not an error; `Err` from
/// [`DriveClient::fetch`] is reserved for transport-level failures.
#[derive(Debug, Clone)]
pub enum DriveFetch {
    /// The service returned the file body.
    Success {
        /// Declared content type, if any.
        content_type: Option<String>,
        /// Full response body.
        bytes: Vec<u8>,
    },
    /// The service answered with a non-200 status.
    Failed {
        /// HTTP status code.
        status: u16,
    },
}

/// Port for resolving a drive file id to its bytes.
pub trait DriveClient: Send + Sync {
    /// Downloads the file behind `id`.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport-level failure (DNS, connect,
    /// truncated body). HTTP-level failures come back as
    /// [`DriveFetch::Failed`].
    fn fetch(&self, id: &DriveFileId) -> anyhow::Result<DriveFetch>;
}
