//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod config;
pub mod export;
pub mod render;
pub mod slug;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nudger_core::config::Config;
use nudger_core::Snapshot;
use nudger_storage::SnapshotStore;
use std::path::{Path, PathBuf};

/// nudger - export Project Nudger records into a note vault
#[derive(Debug, Parser)]
#[command(name = "nudger")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NUDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write project, task and dashboard notes into the vault
    Export(export::ExportArgs),

    /// Print a single note to stdout
    #[command(subcommand)]
    Render(render::RenderCommand),

    /// Report data problems in a snapshot
    Check(check::CheckArgs),

    /// Print the slug of a text
    Slug(slug::SlugArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = config::resolve_config_path(cli.config.clone());

    // Dispatch to command handler
    match cli.command {
        Commands::Export(args) => export::execute(args, &load_config(&config_path)?),
        Commands::Render(cmd) => render::execute(cmd, &load_config(&config_path)?),
        Commands::Check(args) => check::execute(args),
        Commands::Slug(args) => slug::execute(args),
        Commands::Config(cmd) => config::execute(cmd, &config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration, falling back to defaults when the file is absent
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Load a snapshot file with a readable error
pub(crate) fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let store = SnapshotStore::new(path);
    let snapshot = store
        .load()
        .with_context(|| format!("Failed to load snapshot {}", store.path().display()))?;
    tracing::info!(
        "Snapshot has {} projects and {} tasks",
        snapshot.projects.len(),
        snapshot.tasks.len()
    );
    Ok(snapshot)
}
