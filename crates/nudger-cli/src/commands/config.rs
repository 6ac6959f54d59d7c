//! Config command
//!
//! Manage nudger configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

use nudger_core::config::{Config, DEFAULT_CONFIG_PATH};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file (a backup is kept)
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Print the configuration file path in use
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Init { force } => init_config(config_path, force),
        ConfigCommand::Validate => validate_config(config_path),
        ConfigCommand::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

/// Config file to use when `--config` is not given: the project file if it
/// exists, then the per-user file, then the project location.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    let project = PathBuf::from(DEFAULT_CONFIG_PATH);
    if project.exists() {
        return project;
    }

    let user = user_config_path();
    if user.exists() {
        return user;
    }

    project
}

/// Per-user configuration file (~/.config/nudger/config.toml on Linux)
fn user_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "nudger", "nudger")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".nudger")
                .join("config.toml")
        })
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = super::load_config(config_path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        let source = if config_path.exists() {
            config_path.display().to_string()
        } else {
            format!("{} (not found, defaults)", config_path.display())
        };
        println!("{}", "Configuration:".bold().underline());
        println!("{}", source.dimmed());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if config_path.exists() {
        if !force {
            eprintln!(
                "{} {} already exists. Use --force to overwrite.",
                "⚠".yellow(),
                config_path.display()
            );
            return Ok(());
        }

        // Backup existing
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Wrote {}", "✓".green(), config_path.display());
    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    use colored::Colorize;

    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            config_path.display()
        );
        return Ok(());
    }

    let config = super::load_config(config_path)?;
    println!("{} Configuration is valid", "✓".green());

    if !config.vault.path.exists() {
        println!(
            "{} Vault directory {} does not exist yet",
            "⚠".yellow(),
            config.vault.path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("custom.toml")));
        assert_eq!(path, PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_user_config_path() {
        assert!(user_config_path().ends_with("config.toml"));
    }
}
