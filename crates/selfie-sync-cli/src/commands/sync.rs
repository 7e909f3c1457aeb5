//! Sync command - pull roster selfies down from the spreadsheet and drive.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use selfie_sync_adapters::{HttpDriveClient, JsonStateStore, OpensheetSource};
use selfie_sync_core::{sync_roster, SyncOptions, SyncReport};
use tracing::info;

use crate::config::AppConfig;

/// Hardcoded defaults matching the layout the pipeline was built around.
mod defaults {
    pub const SHEET_NAME: &str = "Sheet1";
    pub const SELFIE_DIR: &str = "src/assets/selfies";
    pub const STATE_DIR: &str = ".";
}

/// Arguments for the sync command.
#[derive(Args, Clone)]
pub struct SyncArgs {
    /// Spreadsheet identifier on the opensheet service
    #[arg(long, value_name = "ID")]
    pub spreadsheet_id: Option<String>,

    /// Sheet (tab) name within the spreadsheet
    #[arg(long, value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Directory downloaded selfies land in
    #[arg(long, value_name = "DIR")]
    pub selfie_dir: Option<PathBuf>,

    /// Sentinel filename reported when a download fails
    #[arg(long, value_name = "FILE")]
    pub fallback_image: Option<String>,
}

impl SyncArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest): hardcoded defaults, config
    /// file, CLI arguments.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.spreadsheet_id = args
            .spreadsheet_id
            .or_else(|| config.sheet.spreadsheet_id.clone());
        args.sheet_name = args.sheet_name.or_else(|| config.sheet.sheet_name.clone());
        args.selfie_dir = args.selfie_dir.or_else(|| config.paths.selfie_dir.clone());
        args.fallback_image = args
            .fallback_image
            .or_else(|| config.sync.fallback_image.clone());
        args
    }
}

/// Resolve the state directory: CLI, then config, then the current directory.
pub fn resolve_state_dir(cli: Option<&Path>, config: &AppConfig) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| config.paths.state_dir.clone())
        .unwrap_or_else(|| PathBuf::from(defaults::STATE_DIR))
}

/// Run the sync command.
///
/// Per-row failures are absorbed into the report; only run-level failures
/// (roster fetch, state persistence) surface as errors.
pub fn run(args: &SyncArgs, state_dir: Option<&Path>) -> Result<SyncReport> {
    let config = AppConfig::load();
    let args = SyncArgs::with_config(args.clone(), &config);

    let Some(spreadsheet_id) = args.spreadsheet_id else {
        anyhow::bail!(
            "no spreadsheet_id configured; pass --spreadsheet-id or set \
             sheet.spreadsheet_id in the config file"
        );
    };
    let sheet_name = args
        .sheet_name
        .unwrap_or_else(|| defaults::SHEET_NAME.to_string());
    let selfie_dir = args
        .selfie_dir
        .unwrap_or_else(|| PathBuf::from(defaults::SELFIE_DIR));
    let state_dir = resolve_state_dir(state_dir, &config);

    info!("Syncing sheet {spreadsheet_id}/{sheet_name} into {}", selfie_dir.display());

    let roster = OpensheetSource::new(spreadsheet_id, sheet_name);
    let drive = HttpDriveClient::new();
    let mut store = JsonStateStore::open(state_dir)?;

    let mut opts = SyncOptions::new(selfie_dir);
    if let Some(fallback) = args.fallback_image {
        opts.fallback_image = fallback;
    }

    let report = sync_roster(&roster, &drive, &mut store, &opts)?;
    println!(
        "{} rows: {} unchanged, {} downloaded, {} copied, {} failed, {} skipped",
        report.rows(),
        report.unchanged,
        report.downloaded,
        report.copied,
        report.failed,
        report.skipped
    );
    Ok(report)
}
