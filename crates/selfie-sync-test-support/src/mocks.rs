//! Mock implementations of the core port traits.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use image::GrayImage;
use selfie_sync_core::domain::{DriveFileId, FaceBox, LedgerEntry, RosterRow};
use selfie_sync_core::ports::{
    DriveClient, DriveFetch, FaceDetector, ProgressEvent, ProgressSink, RosterSource, StateStore,
};

/// Mock roster source yielding pre-built rows.
pub struct MockRosterSource {
    rows: Vec<RosterRow>,
    fail: bool,
}

impl MockRosterSource {
    /// Creates a source returning the given rows.
    #[must_use]
    pub fn new(rows: Vec<RosterRow>) -> Self {
        Self { rows, fail: false }
    }

    /// Creates a source whose `rows()` always errors.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
        }
    }
}

impl RosterSource for MockRosterSource {
    fn rows(&self) -> anyhow::Result<Vec<RosterRow>> {
        if self.fail {
            anyhow::bail!("mock roster failure");
        }
        Ok(self.rows.clone())
    }
}

enum Programmed {
    Fetch(DriveFetch),
    TransportError,
}

/// Mock drive client with programmed per-id responses.
///
/// Counts every fetch so tests can assert that unchanged or deduplicated rows
/// never hit the network. Unknown ids answer with HTTP 404.
pub struct MockDriveClient {
    responses: HashMap<String, Programmed>,
    fetched: Mutex<Vec<String>>,
}

impl MockDriveClient {
    /// Creates a client with no programmed responses.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Programs a successful fetch for `id`.
    #[must_use]
    pub fn with_success(
        mut self,
        id: &str,
        content_type: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.responses.insert(
            id.to_string(),
            Programmed::Fetch(DriveFetch::Success {
                content_type: Some(content_type.to_string()),
                bytes: bytes.into(),
            }),
        );
        self
    }

    /// Programs a non-200 response for `id`.
    #[must_use]
    pub fn with_failure(mut self, id: &str, status: u16) -> Self {
        self.responses.insert(
            id.to_string(),
            Programmed::Fetch(DriveFetch::Failed { status }),
        );
        self
    }

    /// Programs a transport-level error for `id`.
    #[must_use]
    pub fn with_transport_error(mut self, id: &str) -> Self {
        self.responses
            .insert(id.to_string(), Programmed::TransportError);
        self
    }

    /// Number of fetches performed.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Ids fetched, in order.
    #[must_use]
    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockDriveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveClient for MockDriveClient {
    fn fetch(&self, id: &DriveFileId) -> anyhow::Result<DriveFetch> {
        self.fetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id.as_str().to_string());

        match self.responses.get(id.as_str()) {
            Some(Programmed::Fetch(fetch)) => Ok(fetch.clone()),
            Some(Programmed::TransportError) => anyhow::bail!("mock transport error for {id}"),
            None => Ok(DriveFetch::Failed { status: 404 }),
        }
    }
}

/// In-memory state store with mutation counters.
#[derive(Default)]
pub struct MemoryStateStore {
    ledger: BTreeMap<String, LedgerEntry>,
    queue: Vec<PathBuf>,
    changed: Vec<PathBuf>,
    put_count: usize,
    enqueue_count: usize,
    complete_count: usize,
    fail_persistence: bool,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose per-item mutations (`put`, `enqueue`,
    /// `record_changed`, `complete`) always error, simulating a state
    /// directory that stopped being writable. `clear_changed` still succeeds
    /// so a run reaches its first per-item mutation.
    #[must_use]
    pub fn failing_persistence() -> Self {
        Self {
            fail_persistence: true,
            ..Self::default()
        }
    }

    fn persist(&self) -> anyhow::Result<()> {
        if self.fail_persistence {
            anyhow::bail!("mock persistence failure");
        }
        Ok(())
    }

    /// Seeds a ledger entry.
    pub fn seed_ledger(&mut self, name: &str, entry: LedgerEntry) {
        self.ledger.insert(name.to_string(), entry);
    }

    /// Seeds a pending crop queue entry.
    pub fn seed_pending(&mut self, path: impl Into<PathBuf>) {
        self.queue.push(path.into());
    }

    /// Full ledger snapshot.
    #[must_use]
    pub fn ledger(&self) -> BTreeMap<String, LedgerEntry> {
        self.ledger.clone()
    }

    /// Number of `put` calls since creation.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.put_count
    }

    /// Number of `enqueue` calls since creation.
    #[must_use]
    pub fn enqueue_count(&self) -> usize {
        self.enqueue_count
    }

    /// Number of `complete` calls since creation.
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.complete_count
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, name: &str) -> Option<LedgerEntry> {
        self.ledger.get(name).cloned()
    }

    fn put(&mut self, name: &str, entry: LedgerEntry) -> anyhow::Result<()> {
        self.put_count += 1;
        self.persist()?;
        self.ledger.insert(name.to_string(), entry);
        Ok(())
    }

    fn find_by_file_id(&self, id: &DriveFileId) -> Option<(String, LedgerEntry)> {
        self.ledger
            .iter()
            .find(|(_, entry)| entry.id == *id)
            .map(|(name, entry)| (name.clone(), entry.clone()))
    }

    fn enqueue(&mut self, path: &Path) -> anyhow::Result<()> {
        self.enqueue_count += 1;
        self.persist()?;
        if !self.queue.iter().any(|p| p == path) {
            self.queue.push(path.to_path_buf());
        }
        Ok(())
    }

    fn list_pending(&self) -> Vec<PathBuf> {
        self.queue.clone()
    }

    fn complete(&mut self, path: &Path) -> anyhow::Result<()> {
        self.complete_count += 1;
        self.persist()?;
        self.queue.retain(|p| p != path);
        Ok(())
    }

    fn record_changed(&mut self, path: &Path) -> anyhow::Result<()> {
        self.persist()?;
        self.changed.push(path.to_path_buf());
        Ok(())
    }

    fn list_changed(&self) -> Vec<PathBuf> {
        self.changed.clone()
    }

    fn clear_changed(&mut self) -> anyhow::Result<()> {
        self.changed.clear();
        Ok(())
    }
}

/// Mock face detector returning fixed boxes.
pub struct MockFaceDetector {
    faces: Vec<FaceBox>,
    fail: bool,
    detect_count: Mutex<usize>,
}

impl MockFaceDetector {
    /// Detector returning the given boxes for every image.
    #[must_use]
    pub fn with_faces(faces: Vec<FaceBox>) -> Self {
        Self {
            faces,
            fail: false,
            detect_count: Mutex::new(0),
        }
    }

    /// Detector that never finds a face.
    #[must_use]
    pub fn none() -> Self {
        Self::with_faces(Vec::new())
    }

    /// Detector whose `detect()` always errors.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            faces: Vec::new(),
            fail: true,
            detect_count: Mutex::new(0),
        }
    }

    /// Number of detect calls.
    #[must_use]
    pub fn detect_count(&self) -> usize {
        *self
            .detect_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl FaceDetector for MockFaceDetector {
    fn detect(&self, _image: &GrayImage) -> anyhow::Result<Vec<FaceBox>> {
        if let Ok(mut c) = self.detect_count.lock() {
            *c += 1;
        }
        if self.fail {
            anyhow::bail!("mock detector failure");
        }
        Ok(self.faces.clone())
    }
}

/// Mock progress sink capturing events.
pub struct MockProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MockProgressSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Captured events, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Processed count from the `Finished` event, if seen.
    #[must_use]
    pub fn finished_processed(&self) -> Option<usize> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed } => Some(*processed),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
