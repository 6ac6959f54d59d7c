//! Configuration management for nudger

use crate::error::{NudgerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Default location of the configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".nudger/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault location
    pub vault: VaultConfig,
    /// Export settings
    pub export: ExportConfig,
    /// Sync settings
    pub sync: SyncConfig,
}

/// Vault-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory of the note vault
    pub path: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vault"),
        }
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the dashboard note
    pub include_dashboard: bool,
    /// Vault-relative path of the dashboard note
    pub dashboard_file: String,
    /// Skip individual notes for completed tasks
    pub skip_completed_tasks: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_dashboard: true,
            dashboard_file: "Dashboard.md".to_string(),
            skip_completed_tasks: false,
        }
    }
}

/// Sync-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Remove notes generated by an earlier export that no longer have a record
    pub prune: bool,
}

impl Config {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| NudgerError::Toml(e.to_string()))?;
        config.validate()?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self).map_err(|e| NudgerError::Toml(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let dashboard = Path::new(&self.export.dashboard_file);

        if !self.export.dashboard_file.ends_with(".md") {
            return Err(NudgerError::Config(format!(
                "export.dashboard_file must end in .md: {}",
                self.export.dashboard_file
            )));
        }

        if !is_vault_relative(dashboard) {
            return Err(NudgerError::Config(format!(
                "export.dashboard_file must be a path inside the vault: {}",
                self.export.dashboard_file
            )));
        }

        Ok(())
    }
}

/// True for relative paths that stay inside their root (no `..`, no prefix)
pub fn is_vault_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().next().is_some()
}
