//! JSON flat-file state store.
//!
//! Backs the [`StateStore`] port with three files in a state directory:
//! `downloaded_images.json` (ledger object, name -> entry),
//! `to_crop_images.json` (array of pending paths) and
//! `changed_images.json` (array of paths changed by the last sync run).
//!
//! Every mutation rewrites its file before returning (eager flush, not
//! transactional). At most one pipeline run at a time is assumed; the files
//! carry no lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use selfie_sync_core::domain::{DriveFileId, LedgerEntry};
use selfie_sync_core::ports::StateStore;
use tracing::debug;

const LEDGER_FILE: &str = "downloaded_images.json";
const QUEUE_FILE: &str = "to_crop_images.json";
const CHANGED_FILE: &str = "changed_images.json";

/// Flat-file implementation of the state store.
pub struct JsonStateStore {
    dir: PathBuf,
    ledger: BTreeMap<String, LedgerEntry>,
    queue: Vec<PathBuf>,
    changed: Vec<PathBuf>,
}

impl JsonStateStore {
    /// Opens the store in `dir`, creating the directory if needed and loading
    /// any existing state files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// state file fails to parse.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create state directory {}", dir.display()))?;

        let ledger: BTreeMap<String, LedgerEntry> =
            load_json(&dir.join(LEDGER_FILE))?.unwrap_or_default();
        let queue: Vec<PathBuf> = load_json(&dir.join(QUEUE_FILE))?.unwrap_or_default();
        let changed = load_json(&dir.join(CHANGED_FILE))?.unwrap_or_default();
        debug!(
            "Opened state store in {} ({} ledger entries, {} pending)",
            dir.display(),
            ledger.len(),
            queue.len(),
        );

        Ok(Self {
            dir,
            ledger,
            queue,
            changed,
        })
    }

    /// Path of the ledger file.
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    /// Path of the crop queue file.
    #[must_use]
    pub fn queue_path(&self) -> PathBuf {
        self.dir.join(QUEUE_FILE)
    }

    /// Path of the changed-images file.
    #[must_use]
    pub fn changed_path(&self) -> PathBuf {
        self.dir.join(CHANGED_FILE)
    }

    fn persist_ledger(&self) -> Result<()> {
        write_json(&self.ledger_path(), &self.ledger)
    }

    fn persist_queue(&self) -> Result<()> {
        write_json(&self.queue_path(), &self.queue)
    }

    fn persist_changed(&self) -> Result<()> {
        write_json(&self.changed_path(), &self.changed)
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, name: &str) -> Option<LedgerEntry> {
        self.ledger.get(name).cloned()
    }

    fn put(&mut self, name: &str, entry: LedgerEntry) -> Result<()> {
        self.ledger.insert(name.to_string(), entry);
        self.persist_ledger()
    }

    fn find_by_file_id(&self, id: &DriveFileId) -> Option<(String, LedgerEntry)> {
        self.ledger
            .iter()
            .find(|(_, entry)| entry.id == *id)
            .map(|(name, entry)| (name.clone(), entry.clone()))
    }

    fn enqueue(&mut self, path: &Path) -> Result<()> {
        if self.queue.iter().any(|p| p == path) {
            return Ok(());
        }
        self.queue.push(path.to_path_buf());
        self.persist_queue()
    }

    fn list_pending(&self) -> Vec<PathBuf> {
        self.queue.clone()
    }

    fn complete(&mut self, path: &Path) -> Result<()> {
        self.queue.retain(|p| p != path);
        self.persist_queue()
    }

    fn record_changed(&mut self, path: &Path) -> Result<()> {
        self.changed.push(path.to_path_buf());
        self.persist_changed()
    }

    fn list_changed(&self) -> Vec<PathBuf> {
        self.changed.clone()
    }

    fn clear_changed(&mut self) -> Result<()> {
        self.changed.clear();
        self.persist_changed()
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize state")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
