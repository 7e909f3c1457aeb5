//! Roster rows and Google Drive file identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the remote roster sheet.
///
/// Rows come back from the spreadsheet service as loosely typed JSON; both
/// fields default to empty strings when absent so a partially filled sheet
/// does not abort the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterRow {
    /// Display name, also the join key for deduplication.
    #[serde(default)]
    pub name: String,
    /// Shareable Google Drive URL of the selfie, may be empty.
    #[serde(default)]
    pub selfie: String,
}

impl RosterRow {
    /// Creates a row from name and selfie URL.
    #[must_use]
    pub fn new(name: impl Into<String>, selfie: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selfie: selfie.into(),
        }
    }
}

/// Identifier extracted from a shareable Google Drive URL.
///
/// Used to detect content changes without re-downloading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveFileId(String);

impl DriveFileId {
    /// Wraps a raw file id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extracts the file id from a shareable drive URL.
    ///
    /// Supports both the `.../open?id=<ID>` and `.../file/d/<ID>/view`
    /// formats. Returns `None` when neither marker is present.
    #[must_use]
    pub fn from_share_url(url: &str) -> Option<Self> {
        if let Some((_, rest)) = url.split_once("id=") {
            let id = rest.split('&').next().unwrap_or(rest);
            if !id.is_empty() {
                return Some(Self(id.to_string()));
            }
        }
        if let Some((_, rest)) = url.split_once("/file/d/") {
            let id = rest.split('/').next().unwrap_or(rest);
            if !id.is_empty() {
                return Some(Self(id.to_string()));
            }
        }
        None
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriveFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives a local file stem from a roster name.
///
/// Keeps alphanumerics (any script), spaces, underscores and hyphens, trims
/// trailing whitespace and replaces the remaining spaces with underscores.
/// Two distinct names can sanitize identically; the last one written wins.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim_end()
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_from_open_url() {
        let id = DriveFileId::from_share_url("https://drive.google.com/open?id=ABC123");
        assert_eq!(id, Some(DriveFileId::new("ABC123")));
    }

    #[test]
    fn test_file_id_from_uc_url_with_extra_params() {
        let id = DriveFileId::from_share_url("https://drive.google.com/uc?id=ABC123&export=view");
        assert_eq!(id, Some(DriveFileId::new("ABC123")));
    }

    #[test]
    fn test_file_id_from_file_d_url() {
        let id =
            DriveFileId::from_share_url("https://drive.google.com/file/d/XYZ-987/view?usp=sharing");
        assert_eq!(id, Some(DriveFileId::new("XYZ-987")));
    }

    #[test]
    fn test_file_id_missing() {
        assert_eq!(DriveFileId::from_share_url("https://example.com/img.png"), None);
        assert_eq!(DriveFileId::from_share_url(""), None);
    }

    #[test]
    fn test_file_id_empty_id_param() {
        assert_eq!(DriveFileId::from_share_url("https://drive.google.com/open?id="), None);
    }

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_name("Jane Doe"), "Jane_Doe");
        assert_eq!(sanitize_name("jane_doe-2"), "jane_doe-2");
    }

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_name("O'Brien, Pat!"), "OBrien_Pat");
    }

    #[test]
    fn test_sanitize_trailing_whitespace() {
        assert_eq!(sanitize_name("Jane  "), "Jane");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii_letters() {
        assert_eq!(sanitize_name("José Núñez"), "José_Núñez");
    }
}
