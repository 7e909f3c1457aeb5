//! Models command - manage the pretrained face detector model.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use selfie_sync_adapters::models::{ensure_model, model_path, DETECTOR_MODEL};

/// Arguments for the models command
#[derive(Args, Clone)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand, Clone)]
pub enum ModelsCommand {
    /// Download the detector model if missing
    Fetch,
    /// Print the detector model path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs) -> Result<()> {
    match args.command {
        ModelsCommand::Fetch => fetch_model(),
        ModelsCommand::Path => print_path(),
    }
}

fn fetch_model() -> Result<()> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching {}", DETECTOR_MODEL.name));
    pb.enable_steady_tick(Duration::from_millis(100));

    let path = ensure_model()?;

    pb.finish_with_message(format!("Model ready at {}", path.display()));
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path() -> Result<()> {
    println!("{}", model_path().display());
    Ok(())
}
