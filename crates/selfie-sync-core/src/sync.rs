//! Roster synchronization engine.
//!
//! For each roster row: diff the drive file id against the ledger, then skip,
//! copy from an existing local file, or download. Ledger and crop queue are
//! persisted eagerly after each row; per-row failures are logged and absorbed
//! so one bad row never aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::domain::{sanitize_name, DriveFileId, LedgerEntry, RowAction, RowResult};
use crate::ports::{DriveClient, DriveFetch, RosterSource, StateStore};

/// Extensions probed when a legacy ledger entry lacks a resolved filename.
/// Covers every extension [`extension_for_content_type`] can produce.
const KNOWN_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// Default sentinel filename reported when a download fails.
pub const DEFAULT_FALLBACK_IMAGE: &str = "fallback.png";

/// Settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory the selfies are written to; created if absent.
    pub selfie_dir: PathBuf,
    /// Sentinel filename substituted when a download fails.
    pub fallback_image: String,
}

impl SyncOptions {
    /// Creates options with the default fallback sentinel.
    #[must_use]
    pub fn new(selfie_dir: impl Into<PathBuf>) -> Self {
        Self {
            selfie_dir: selfie_dir.into(),
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
        }
    }
}

/// Summary of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Rows skipped because the ledger already matched.
    pub unchanged: usize,
    /// Rows satisfied by a fresh download.
    pub downloaded: usize,
    /// Rows satisfied by copying another name's local file.
    pub copied: usize,
    /// Rows whose download failed.
    pub failed: usize,
    /// Rows with no usable name, URL or file id.
    pub skipped: usize,
    /// Per-row outcomes in roster order.
    pub results: Vec<RowResult>,
}

impl SyncReport {
    /// Total rows seen.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.results.len()
    }

    fn tally(&mut self, name: String, action: RowAction) {
        match action {
            RowAction::Unchanged => self.unchanged += 1,
            RowAction::Downloaded { .. } => self.downloaded += 1,
            RowAction::Copied { .. } => self.copied += 1,
            RowAction::Failed => self.failed += 1,
            RowAction::Skipped => self.skipped += 1,
        }
        self.results.push(RowResult { name, action });
    }
}

/// Runs one synchronization pass over the roster.
///
/// # Errors
///
/// Returns an error if the roster itself cannot be fetched, the selfie
/// directory cannot be created, or the state store fails to persist.
/// Individual row failures are absorbed and reported in the [`SyncReport`].
pub fn sync_roster(
    roster: &dyn RosterSource,
    drive: &dyn DriveClient,
    store: &mut dyn StateStore,
    opts: &SyncOptions,
) -> Result<SyncReport> {
    fs::create_dir_all(&opts.selfie_dir).with_context(|| {
        format!(
            "failed to create selfie directory {}",
            opts.selfie_dir.display()
        )
    })?;
    store.clear_changed()?;

    let rows = roster.rows().context("failed to fetch roster")?;
    info!("Syncing {} roster rows", rows.len());

    let mut report = SyncReport::default();
    for row in rows {
        let name = row.name.trim().to_string();
        let url = row.selfie.trim();

        if name.is_empty() || url.is_empty() {
            debug!("Skipping row without name or selfie URL");
            report.tally(name, RowAction::Skipped);
            continue;
        }
        let Some(id) = DriveFileId::from_share_url(url) else {
            warn!("No drive file id in selfie URL for {name}: {url}");
            report.tally(name, RowAction::Skipped);
            continue;
        };

        let action = sync_row(&name, &id, drive, store, opts)
            .with_context(|| format!("failed to persist state for {name}"))?;
        report.tally(name, action);
    }

    info!(
        "Sync finished: {} unchanged, {} downloaded, {} copied, {} failed, {} skipped",
        report.unchanged, report.downloaded, report.copied, report.failed, report.skipped
    );
    Ok(report)
}

/// Syncs a single row that has a name and a file id.
///
/// Fetch and local file errors are absorbed into [`RowAction::Failed`];
/// errors from the state store propagate and abort the run, so a read-only
/// state directory or full disk is never misreported as a download failure.
fn sync_row(
    name: &str,
    id: &DriveFileId,
    drive: &dyn DriveClient,
    store: &mut dyn StateStore,
    opts: &SyncOptions,
) -> Result<RowAction> {
    if store.get(name).is_some_and(|entry| entry.id == *id) {
        debug!("{name} unchanged, skipping");
        return Ok(RowAction::Unchanged);
    }

    let synced = match fetch_or_copy(name, id, drive, &*store, opts) {
        Ok(Some(synced)) => synced,
        // Non-200, already logged.
        Ok(None) => return Ok(RowAction::Failed),
        Err(e) => {
            warn!(
                "Sync failed for {name}: {e:#}; using {}",
                opts.fallback_image
            );
            return Ok(RowAction::Failed);
        }
    };

    store.put(name, LedgerEntry::new(id.clone(), synced.filename))?;
    store.enqueue(&synced.path)?;
    if synced.changed {
        store.record_changed(&synced.path)?;
    }

    Ok(if synced.copied {
        RowAction::Copied { path: synced.path }
    } else {
        RowAction::Downloaded {
            path: synced.path,
            changed: synced.changed,
        }
    })
}

/// Local file produced for a row, before the store records it.
struct SyncedFile {
    filename: String,
    path: PathBuf,
    changed: bool,
    copied: bool,
}

/// Obtains the row's local file, by dedup copy or by download.
///
/// `Ok(None)` means the drive answered non-200; the row failed but the run
/// continues.
fn fetch_or_copy(
    name: &str,
    id: &DriveFileId,
    drive: &dyn DriveClient,
    store: &dyn StateStore,
    opts: &SyncOptions,
) -> Result<Option<SyncedFile>> {
    // Same file id under another name: copy its local file instead of
    // downloading again.
    if let Some((other, entry)) = store.find_by_file_id(id) {
        if let Some(src) = locate_local_file(&opts.selfie_dir, &other, &entry) {
            return copy_existing(name, &src, opts).map(Some);
        }
        debug!("{other} maps to {id} but has no local file, downloading");
    }

    download(name, id, drive, opts)
}

fn copy_existing(name: &str, src: &Path, opts: &SyncOptions) -> Result<SyncedFile> {
    let ext = src
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let filename = format!("{}{ext}", sanitize_name(name));
    let dest = opts.selfie_dir.join(&filename);

    let bytes = fs::read(src).with_context(|| format!("failed to read {}", src.display()))?;
    let changed = write_file(&dest, &bytes)?;
    info!("Copied {} -> {}", src.display(), dest.display());

    Ok(SyncedFile {
        filename,
        path: dest,
        changed,
        copied: true,
    })
}

fn download(
    name: &str,
    id: &DriveFileId,
    drive: &dyn DriveClient,
    opts: &SyncOptions,
) -> Result<Option<SyncedFile>> {
    match drive.fetch(id)? {
        DriveFetch::Failed { status } => {
            warn!(
                "Failed to download {id}: {status}; using {}",
                opts.fallback_image
            );
            Ok(None)
        }
        DriveFetch::Success {
            content_type,
            bytes,
        } => {
            let ext = extension_for_content_type(content_type.as_deref());
            let mut filename = sanitize_name(name);
            if !filename.ends_with(ext) {
                filename.push_str(ext);
            }
            let dest = opts.selfie_dir.join(&filename);

            let changed = write_file(&dest, &bytes)?;
            debug!("Downloaded {} (changed: {changed})", dest.display());

            Ok(Some(SyncedFile {
                filename,
                path: dest,
                changed,
                copied: false,
            }))
        }
    }
}

/// Maps a declared content type to a file extension.
///
/// Unknown or missing types fall back to `.jpg`.
#[must_use]
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let ct = content_type.unwrap_or("");
    if ct.contains("jpeg") {
        ".jpg"
    } else if ct.contains("png") {
        ".png"
    } else if ct.contains("gif") {
        ".gif"
    } else if ct.contains("webp") {
        ".webp"
    } else if ct.contains("bmp") {
        ".bmp"
    } else {
        ".jpg"
    }
}

/// Finds the local file behind a ledger entry.
///
/// Entries with a resolved filename are looked up directly; legacy entries
/// fall back to probing the known extensions against the sanitized name.
fn locate_local_file(dir: &Path, name: &str, entry: &LedgerEntry) -> Option<PathBuf> {
    if let Some(file) = &entry.file {
        let path = dir.join(file);
        if path.is_file() {
            return Some(path);
        }
    }
    let stem = sanitize_name(name);
    KNOWN_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}{ext}")))
        .find(|path| path.is_file())
}

/// Overwrites `dest` with `bytes`, returning whether the content changed.
fn write_file(dest: &Path, bytes: &[u8]) -> Result<bool> {
    let old_digest = fs::read(dest).ok().map(|old| sha256_hex(&old));
    fs::write(dest, bytes).with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(old_digest.as_deref() != Some(sha256_hex(bytes).as_str()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type(Some("image/jpeg")), ".jpg");
        assert_eq!(extension_for_content_type(Some("image/png")), ".png");
        assert_eq!(extension_for_content_type(Some("image/gif")), ".gif");
        assert_eq!(extension_for_content_type(Some("image/webp")), ".webp");
        assert_eq!(extension_for_content_type(Some("text/html")), ".jpg");
        assert_eq!(extension_for_content_type(None), ".jpg");
    }

    #[test]
    fn test_write_file_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");

        // New file counts as changed.
        assert!(write_file(&path, b"one").unwrap());
        // Same bytes: unchanged.
        assert!(!write_file(&path, b"one").unwrap());
        // Different bytes: changed again.
        assert!(write_file(&path, b"two").unwrap());
    }

    #[test]
    fn test_locate_local_file_prefers_resolved_filename() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bob.webp"), b"x").unwrap();

        let entry = LedgerEntry::new(DriveFileId::new("ABC"), "Bob.webp");
        let found = locate_local_file(dir.path(), "Bob", &entry);
        assert_eq!(found, Some(dir.path().join("Bob.webp")));
    }

    #[test]
    fn test_locate_local_file_probes_for_legacy_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bob.png"), b"x").unwrap();

        let entry = LedgerEntry::legacy(DriveFileId::new("ABC"));
        let found = locate_local_file(dir.path(), "Bob", &entry);
        assert_eq!(found, Some(dir.path().join("Bob.png")));
    }

    #[test]
    fn test_probe_covers_every_inferable_extension() {
        // Any file the downloader can write must be findable by the legacy
        // probe, or dedup would re-download it.
        for ct in ["image/jpeg", "image/png", "image/gif", "image/webp", "image/bmp", "junk"] {
            let ext = extension_for_content_type(Some(ct));
            assert!(KNOWN_EXTENSIONS.contains(&ext), "{ext} missing from probe list");
        }
    }

    #[test]
    fn test_locate_local_file_probes_bmp() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bob.bmp"), b"x").unwrap();

        let entry = LedgerEntry::legacy(DriveFileId::new("ABC"));
        let found = locate_local_file(dir.path(), "Bob", &entry);
        assert_eq!(found, Some(dir.path().join("Bob.bmp")));
    }

    #[test]
    fn test_locate_local_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let entry = LedgerEntry::legacy(DriveFileId::new("ABC"));
        assert_eq!(locate_local_file(dir.path(), "Bob", &entry), None);
    }
}
