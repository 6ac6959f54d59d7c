//! Writes planned notes into a vault directory

use chrono::{DateTime, Utc};
use nudger_core::config::is_vault_relative;
use nudger_core::error::{NudgerError, Result};
use nudger_core::export::VaultFile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Current manifest schema version
pub const MANIFEST_SCHEMA_VERSION: &str = "1";

/// Record of the notes the last export wrote, keyed by vault-relative path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub files: BTreeMap<String, String>,
}

impl Manifest {
    fn empty() -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            files: BTreeMap::new(),
        }
    }
}

/// Options for [`VaultStore::apply`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Delete notes from earlier exports that are no longer planned
    pub prune: bool,
    /// Report what would change without touching disk
    pub dry_run: bool,
}

/// Outcome of one apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub pruned: Vec<String>,
}

impl SyncReport {
    /// True when nothing on disk changes
    pub fn is_noop(&self) -> bool {
        self.written.is_empty() && self.pruned.is_empty()
    }
}

/// File system vault
pub struct VaultStore {
    /// Vault root directory
    root: PathBuf,
    /// Manifest location
    manifest_path: PathBuf,
}

impl VaultStore {
    /// Create a store for the vault at `root`. Nothing is created until a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let manifest_path = root.join(".nudger").join("manifest.json");
        Self { root, manifest_path }
    }

    /// Vault root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Manifest file path
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Absolute location of a vault-relative note path
    fn note_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Read the manifest of the previous export, if any
    pub fn load_manifest(&self) -> Result<Option<Manifest>> {
        if !self.manifest_path.exists() {
            return Ok(None);
        }

        let file = fs::File::open(&self.manifest_path)?;
        let manifest: Manifest = serde_json::from_reader(BufReader::new(file))?;

        if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
            return Err(NudgerError::UnsupportedSchemaVersion(manifest.schema_version));
        }

        Ok(Some(manifest))
    }

    /// Write changed notes, optionally prune stale ones, and record the manifest
    pub fn apply(&self, files: &[VaultFile], options: &ApplyOptions) -> Result<SyncReport> {
        for file in files {
            if !is_vault_relative(Path::new(&file.path)) {
                return Err(NudgerError::Validation(format!(
                    "note path must stay inside the vault: {}",
                    file.path
                )));
            }
        }

        let previous = self.load_manifest()?.unwrap_or_else(Manifest::empty);
        let mut next = Manifest::empty();
        let mut report = SyncReport::default();

        let mut seen = HashSet::new();
        for file in files {
            let first = seen.insert(file.path.as_str());
            if !first {
                warn!("Multiple notes planned for {}, the last one wins", file.path);
            }

            let hash = file.content_hash();
            let unchanged = previous.files.get(&file.path) == Some(&hash)
                && self.note_path(&file.path).exists();

            if unchanged {
                if first {
                    report.unchanged.push(file.path.clone());
                }
            } else {
                if !options.dry_run {
                    self.atomic_write(&file.path, &file.content)?;
                }
                if first {
                    report.written.push(file.path.clone());
                }
            }
            next.files.insert(file.path.clone(), hash);
        }

        for (path, hash) in &previous.files {
            if seen.contains(path.as_str()) {
                continue;
            }
            if !is_vault_relative(Path::new(path)) {
                warn!("Ignoring manifest entry outside the vault: {}", path);
                continue;
            }
            if !options.prune {
                // Still ours; a later prune may remove it
                next.files.insert(path.clone(), hash.clone());
                continue;
            }

            let note = self.note_path(path);
            if note.exists() {
                if !options.dry_run {
                    fs::remove_file(&note)?;
                    debug!("Pruned {:?}", note);
                }
                report.pruned.push(path.clone());
            }
        }

        if !options.dry_run {
            self.write_manifest(&next)?;
        }

        info!(
            "Vault sync: {} written, {} unchanged, {} pruned",
            report.written.len(),
            report.unchanged.len(),
            report.pruned.len()
        );
        Ok(report)
    }

    /// Write a note atomically (write to temp, then rename)
    fn atomic_write(&self, relative: &str, content: &str) -> Result<()> {
        let final_path = self.note_path(relative);
        write_atomic(&final_path, content.as_bytes())?;
        debug!("Wrote {:?}", final_path);
        Ok(())
    }

    fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        let json = serde_json::to_vec_pretty(manifest)?;
        write_atomic(&self.manifest_path, &json)
    }
}

fn write_atomic(final_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = final_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                NudgerError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory {}: {}", parent.display(), e),
                ))
            })?;
        }
    }

    let file_name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = final_path.with_file_name(format!(".{}.tmp", file_name));

    {
        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            NudgerError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        writer.write_all(bytes)?;
        writer.flush()?;
    }

    // Rename to final path (atomic on most filesystems)
    fs::rename(&temp_path, final_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        NudgerError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file: {}", e),
        ))
    })?;

    Ok(())
}
