//! Selfie Sync CLI - roster image synchronization and face cropping.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let state_dir = cli.state_dir.as_deref();

    let exit_code = match cli.command {
        Commands::Sync(ref args) => match commands::sync::run(args, state_dir) {
            Ok(_) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        Commands::Crop(ref args) => match commands::crop::run(args, state_dir) {
            Ok(_) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        Commands::Run(ref args) => {
            let synced = match commands::sync::run(&args.sync, state_dir) {
                Ok(_) => true,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    false
                }
            };
            if synced {
                match commands::crop::run(&args.crop, state_dir) {
                    Ok(_) => ExitCode::Success,
                    Err(e) => {
                        eprintln!("error: {e:#}");
                        ExitCode::Error
                    }
                }
            } else {
                ExitCode::Error
            }
        }
        Commands::Models(ref args) => match commands::models::run(args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
    };

    exit_code.into()
}
