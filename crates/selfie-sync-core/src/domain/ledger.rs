//! Ledger entries: the persisted name -> drive file mapping.

use serde::{Deserialize, Serialize};

use super::DriveFileId;

/// The last-synced drive file for one roster name.
///
/// Entries are overwritten on change and never removed. `file` records the
/// resolved local filename (stem plus inferred extension) so deduplication can
/// copy without guessing extensions. Ledgers written by earlier versions store
/// a bare id string; those deserialize with `file` unset and take the
/// extension-probing path instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Drive file id this name was last synced from.
    pub id: DriveFileId,
    /// Resolved local filename, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl LedgerEntry {
    /// Creates an entry with a resolved filename.
    #[must_use]
    pub fn new(id: DriveFileId, file: impl Into<String>) -> Self {
        Self {
            id,
            file: Some(file.into()),
        }
    }

    /// Creates a legacy entry without a resolved filename.
    #[must_use]
    pub const fn legacy(id: DriveFileId) -> Self {
        Self { id, file: None }
    }
}

impl<'de> Deserialize<'de> for LedgerEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            // Bare string written by the original flat ledger format.
            Legacy(String),
            Full {
                id: DriveFileId,
                #[serde(default)]
                file: Option<String>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Legacy(id) => Self::legacy(DriveFileId::new(id)),
            Repr::Full { id, file } => Self { id, file },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_full_entry() {
        let entry = LedgerEntry::new(DriveFileId::new("ABC"), "Alice.png");
        let json = serde_json::to_string(&entry).unwrap();
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_legacy_string_deserializes() {
        let entry: LedgerEntry = serde_json::from_str("\"ABC\"").unwrap();
        assert_eq!(entry.id, DriveFileId::new("ABC"));
        assert!(entry.file.is_none());
    }

    #[test]
    fn test_full_entry_without_file() {
        let entry: LedgerEntry = serde_json::from_str(r#"{"id":"ABC"}"#).unwrap();
        assert_eq!(entry.id, DriveFileId::new("ABC"));
        assert!(entry.file.is_none());
    }
}
