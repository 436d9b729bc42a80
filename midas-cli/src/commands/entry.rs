//! `midas entry create|update|remove|list`

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use midas_core::{builtin_constructors, Payload};
use midas_sync::{pipeline, EntryAction, SiteService};

use super::load_site;

/// Apply a CMS change to the site, or list registered entries.
#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    /// Render a new entry and register it.
    Create(PayloadArgs),

    /// Re-render a registered entry, renaming its file if the title changed.
    Update(PayloadArgs),

    /// Delete a registered entry's file and registry record.
    Remove(PayloadArgs),

    /// List registered entries.
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// JSON payload `{"metadata": {...}, "entry": {...}}`; `-` reads stdin.
    #[arg(long, short = 'p', value_name = "FILE")]
    pub payload: PathBuf,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the listing as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(site_path: &Path, cmd: EntryCommand) -> Result<()> {
    match cmd {
        EntryCommand::Create(args) => apply(site_path, EntryAction::Create, &args),
        EntryCommand::Update(args) => apply(site_path, EntryAction::Update, &args),
        EntryCommand::Remove(args) => apply(site_path, EntryAction::Remove, &args),
        EntryCommand::List(args) => list(site_path, &args),
    }
}

fn open_service(site_path: &Path) -> Result<SiteService> {
    let site = load_site(site_path)?;
    SiteService::new(site, &builtin_constructors()).context("failed to open entry registry")
}

fn read_payload(source: &Path) -> Result<Payload> {
    let json = if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read payload {}", source.display()))?
    };
    Payload::from_json(&json).context("invalid payload")
}

fn apply(site_path: &Path, action: EntryAction, args: &PayloadArgs) -> Result<()> {
    let payload = read_payload(&args.payload)?;
    let mut service = open_service(site_path)?;
    let entry_id = service.entry_id(&payload);

    let path = match pipeline::run(&mut service, action, &payload) {
        Ok(path) => path,
        Err(err) => {
            if let Some(written) = err.written_path() {
                eprintln!(
                    "{} {} was written but is not registered",
                    "!".yellow().bold(),
                    written.display()
                );
            }
            return Err(err).with_context(|| format!("entry {action} failed for {entry_id}"));
        }
    };

    let verb = match action {
        EntryAction::Create => "Created",
        EntryAction::Update => "Updated",
        EntryAction::Remove => "Removed",
    };
    println!("{} {verb} {entry_id} ({})", "✓".green().bold(), path.display());
    Ok(())
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "entry")]
    entry: String,
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "on disk")]
    on_disk: String,
}

fn list(site_path: &Path, args: &ListArgs) -> Result<()> {
    let service = open_service(site_path)?;
    let entries = service
        .registry()
        .entries()
        .context("failed to list registry entries")?;

    if args.json {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(id, path)| (id.to_string(), path.display().to_string().into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries registered.");
        return Ok(());
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|(id, path)| EntryRow {
            entry: id.to_string(),
            file: path.display().to_string(),
            on_disk: if path.exists() {
                "yes".green().to_string()
            } else {
                "missing".red().bold().to_string()
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
