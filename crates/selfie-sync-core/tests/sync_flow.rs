//! Sync engine integration tests against mocked ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use selfie_sync_core::domain::{DriveFileId, LedgerEntry, RosterRow, RowAction};
use selfie_sync_core::sync::{sync_roster, SyncOptions};
use selfie_sync_core::StateStore;
use selfie_sync_test_support::{MemoryStateStore, MockDriveClient, MockRosterSource};

const PNG_URL: &str = "https://drive.google.com/uc?id=ABC";

fn options(dir: &tempfile::TempDir) -> SyncOptions {
    SyncOptions::new(dir.path())
}

#[test]
fn fresh_row_downloads_and_updates_ledger_and_queue() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new().with_success("ABC", "image/png", b"png-bytes".to_vec());
    let mut store = MemoryStateStore::new();

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.downloaded, 1);
    let entry = store.get("Alice").expect("ledger entry written");
    assert_eq!(entry.id, DriveFileId::new("ABC"));
    assert_eq!(entry.file.as_deref(), Some("Alice.png"));

    let expected = dir.path().join("Alice.png");
    assert_eq!(store.list_pending(), vec![expected.clone()]);
    assert_eq!(std::fs::read(&expected).unwrap(), b"png-bytes");
    assert_eq!(store.list_changed(), vec![expected]);
}

#[test]
fn unchanged_row_makes_no_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new();
    let mut store = MemoryStateStore::new();
    store.seed_ledger("Alice", LedgerEntry::new(DriveFileId::new("ABC"), "Alice.png"));

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.unchanged, 1);
    assert_eq!(drive.fetch_count(), 0);
    assert_eq!(store.put_count(), 0, "ledger must be untouched");
    assert!(store.list_pending().is_empty());
}

#[test]
fn matching_id_under_other_name_is_copied_not_downloaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bob.png"), b"shared-bytes").unwrap();

    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new();
    let mut store = MemoryStateStore::new();
    store.seed_ledger("Bob", LedgerEntry::new(DriveFileId::new("ABC"), "Bob.png"));

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.copied, 1);
    assert_eq!(drive.fetch_count(), 0, "dedup must never download");

    let dest = dir.path().join("Alice.png");
    assert_eq!(std::fs::read(&dest).unwrap(), b"shared-bytes");
    let entry = store.get("Alice").unwrap();
    assert_eq!(entry.id, DriveFileId::new("ABC"));
    assert_eq!(entry.file.as_deref(), Some("Alice.png"));
    assert_eq!(store.list_pending(), vec![dest]);
}

#[test]
fn legacy_ledger_entry_is_found_by_extension_probe() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bob.jpg"), b"shared-bytes").unwrap();

    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new();
    let mut store = MemoryStateStore::new();
    // Legacy entries carry no resolved filename.
    store.seed_ledger("Bob", LedgerEntry::legacy(DriveFileId::new("ABC")));

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.copied, 1);
    assert_eq!(drive.fetch_count(), 0);
    // The copy keeps the source extension.
    assert_eq!(
        store.get("Alice").unwrap().file.as_deref(),
        Some("Alice.jpg")
    );
}

#[test]
fn missing_local_file_falls_back_to_download() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new().with_success("ABC", "image/jpeg", b"jpg".to_vec());
    let mut store = MemoryStateStore::new();
    // Bob maps to the same id but his file is gone from disk.
    store.seed_ledger("Bob", LedgerEntry::new(DriveFileId::new("ABC"), "Bob.png"));

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(drive.fetch_count(), 1);
    assert_eq!(
        store.get("Alice").unwrap().file.as_deref(),
        Some("Alice.jpg")
    );
}

#[test]
fn failed_download_leaves_ledger_and_queue_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new().with_failure("ABC", 403);
    let mut store = MemoryStateStore::new();

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.failed, 1);
    assert!(store.get("Alice").is_none());
    assert!(store.list_pending().is_empty());
    assert!(store.list_changed().is_empty());
}

#[test]
fn transport_error_is_absorbed_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![
        RosterRow::new("Alice", PNG_URL),
        RosterRow::new("Bob", "https://drive.google.com/uc?id=DEF"),
    ]);
    let drive = MockDriveClient::new()
        .with_transport_error("ABC")
        .with_success("DEF", "image/png", b"ok".to_vec());
    let mut store = MemoryStateStore::new();

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    // Alice fails, Bob still syncs; the run as a whole succeeds.
    assert_eq!(report.failed, 1);
    assert_eq!(report.downloaded, 1);
    assert!(store.get("Bob").is_some());
}

#[test]
fn rows_without_url_or_id_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![
        RosterRow::new("Alice", ""),
        RosterRow::new("", PNG_URL),
        RosterRow::new("Carol", "https://example.com/not-a-drive-url"),
    ]);
    let drive = MockDriveClient::new();
    let mut store = MemoryStateStore::new();

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    assert_eq!(report.skipped, 3);
    assert_eq!(drive.fetch_count(), 0);
}

#[test]
fn repeated_sync_enqueues_path_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let drive = MockDriveClient::new()
        .with_success("ABC", "image/png", b"v1".to_vec())
        .with_success("DEF", "image/png", b"v2".to_vec());
    let mut store = MemoryStateStore::new();

    // First sync downloads ABC; second sync sees a new id for the same name
    // before the queue was drained.
    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();
    let roster = MockRosterSource::new(vec![RosterRow::new(
        "Alice",
        "https://drive.google.com/uc?id=DEF",
    )]);
    sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    let expected = dir.path().join("Alice.png");
    assert_eq!(store.list_pending(), vec![expected]);
    assert_eq!(store.get("Alice").unwrap().id, DriveFileId::new("DEF"));
}

#[test]
fn unchanged_bytes_are_not_recorded_as_changed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Alice.png"), b"same").unwrap();

    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new().with_success("ABC", "image/png", b"same".to_vec());
    let mut store = MemoryStateStore::new();

    let report = sync_roster(&roster, &drive, &mut store, &options(&dir)).unwrap();

    // Re-download happened (id was new to the ledger) but the bytes match.
    assert_eq!(report.downloaded, 1);
    assert!(matches!(
        report.results[0].action,
        RowAction::Downloaded { changed: false, .. }
    ));
    assert!(store.list_changed().is_empty());
    // Still queued for cropping: the ledger entry is new.
    assert_eq!(store.list_pending().len(), 1);
}

#[test]
fn store_persistence_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::new(vec![RosterRow::new("Alice", PNG_URL)]);
    let drive = MockDriveClient::new().with_success("ABC", "image/png", b"png-bytes".to_vec());
    let mut store = MemoryStateStore::failing_persistence();

    let result = sync_roster(&roster, &drive, &mut store, &options(&dir));

    // A store that cannot persist is a run-level error, not a row failure
    // dressed up as a bad download.
    let err = result.expect_err("unwritable store must abort the run");
    assert!(format!("{err:#}").contains("persist"), "unexpected error: {err:#}");
}

#[test]
fn roster_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let roster = MockRosterSource::failing();
    let drive = MockDriveClient::new();
    let mut store = MemoryStateStore::new();

    let result = sync_roster(&roster, &drive, &mut store, &options(&dir));
    assert!(result.is_err());
}
