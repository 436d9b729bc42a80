//! Midas: headless-CMS to static-site bridge.
//!
//! # Usage
//!
//! ```text
//! midas --site <file> entry create|update|remove --payload <file|->
//! midas --site <file> entry list [--json]
//! midas --site <file> build [--no-cache]
//! midas --site <file> deploy --settings <file> [--build] [--no-cache]
//! ```
//!
//! Exit status: 0 success, 2 configuration, 3 not found, 4 conflict, 1 anything else.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, deploy::DeployArgs, entry::EntryCommand};
use midas_core::{ConfigError, ErrorKind, PayloadError};
use midas_deploy::DeployError;
use midas_sync::SyncError;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "midas",
    version,
    about = "Render CMS entries into a static site and publish it",
    long_about = None,
)]
struct Cli {
    /// Site configuration file (YAML or JSON).
    #[arg(long, global = true, default_value = "site.yaml", value_name = "FILE")]
    site: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, update, remove or list content entries.
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },

    /// Run the site generator.
    Build(BuildArgs),

    /// Upload the built site to object storage.
    Deploy(DeployArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Entry { command } => commands::entry::run(&cli.site, command),
        Commands::Build(args) => args.run(&cli.site),
        Commands::Deploy(args) => args.run(&cli.site),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Map the first classified error in the chain to an exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    let kind = err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<SyncError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<DeployError>() {
            Some(e.kind())
        } else if cause.is::<ConfigError>() || cause.is::<PayloadError>() {
            Some(ErrorKind::Config)
        } else {
            None
        }
    });
    match kind {
        Some(ErrorKind::Config) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Conflict) => 4,
        Some(ErrorKind::Internal) | None => 1,
    }
}
