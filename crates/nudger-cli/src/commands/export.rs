//! Export command
//!
//! Write vault notes for every project and task in a snapshot.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use nudger_core::config::Config;
use nudger_core::export::VaultExporter;
use nudger_storage::{ApplyOptions, VaultStore};

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Snapshot JSON file with projects and tasks
    #[arg(long, short)]
    pub input: PathBuf,

    /// Vault directory (overrides vault.path from config)
    #[arg(long)]
    pub vault: Option<PathBuf>,

    /// Remove notes from earlier exports whose records are gone
    #[arg(long)]
    pub prune: bool,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the dashboard note
    #[arg(long)]
    pub no_dashboard: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let snapshot = super::load_snapshot(&args.input)?;

    let vault_dir = args.vault.clone().unwrap_or_else(|| config.vault.path.clone());
    let exporter = VaultExporter::new(&config.export)
        .with_dashboard(config.export.include_dashboard && !args.no_dashboard);
    let files = exporter.plan(&snapshot).context("Failed to render notes")?;

    let options = ApplyOptions {
        prune: args.prune || config.sync.prune,
        dry_run: args.dry_run,
    };
    let store = VaultStore::new(&vault_dir);
    let report = store
        .apply(&files, &options)
        .with_context(|| format!("Failed to write vault {}", vault_dir.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let prefix = if args.dry_run { "Would write" } else { "Wrote" };
    for path in &report.written {
        println!("{} {}", "+".green(), path);
    }
    for path in &report.pruned {
        println!("{} {}", "-".red(), path);
    }

    println!(
        "{} {} {} notes to {} ({} unchanged, {} pruned)",
        "✓".green(),
        prefix,
        report.written.len().to_string().yellow(),
        vault_dir.display(),
        report.unchanged.len(),
        report.pruned.len()
    );

    Ok(())
}
