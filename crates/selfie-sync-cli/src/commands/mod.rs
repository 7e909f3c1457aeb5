//! CLI command definitions and handlers.

pub mod crop;
pub mod models;
pub mod sync;

use clap::{Parser, Subcommand};

/// Selfie Sync - roster image synchronization and face cropping
#[derive(Parser)]
#[command(name = "selfie-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the JSON state files
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Sync roster selfies from the spreadsheet and drive
    Sync(sync::SyncArgs),
    /// Crop faces from the queued images
    Crop(crop::CropArgs),
    /// Sync, then crop, in one invocation
    Run(RunArgs),
    /// Manage the face detector model
    Models(models::ModelsArgs),
}

/// Arguments for the combined run.
#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub sync: sync::SyncArgs,

    #[command(flatten)]
    pub crop: crop::CropArgs,
}

/// Process exit codes.
///
/// Per-item failures (bad rows, unreadable images, missing faces) are
/// absorbed and still exit with `Success`; only run-level failures exit
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Run completed (item failures included).
    Success,
    /// The run itself failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::Error => Self::from(1),
        }
    }
}
