//! Snapshot files produced by the database export job

use nudger_core::error::{NudgerError, Result};
use nudger_core::{Project, Snapshot, Task};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a JSON snapshot of projects and tasks.
///
/// Two layouts are accepted for each collection:
/// - a list of records: `{"tasks": [{"id": "t1", ...}]}`
/// - a collection dump keyed by document id: `{"tasks": {"t1": {...}}}`.
///   Records without an `id` field take it from the key. Dumps come back in
///   key order.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the snapshot file
    pub fn load(&self) -> Result<Snapshot> {
        let file = fs::File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NudgerError::FileNotFound(self.path.clone())
            } else {
                NudgerError::Io(e)
            }
        })?;

        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        let snapshot = Self::from_value(value)
            .map_err(|e| e.with_context(format!("Invalid snapshot {}", self.path.display())))?;

        debug!(
            "Loaded {} projects and {} tasks from {:?}",
            snapshot.projects.len(),
            snapshot.tasks.len(),
            self.path
        );
        Ok(snapshot)
    }

    /// Parse snapshot JSON text
    pub fn parse(content: &str) -> Result<Snapshot> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Snapshot> {
        let Value::Object(mut root) = value else {
            return Err(NudgerError::Validation(
                "snapshot must be a JSON object with 'projects' and 'tasks'".to_string(),
            ));
        };

        let projects: Vec<Project> = collection(root.remove("projects"), "projects")?;
        let tasks: Vec<Task> = collection(root.remove("tasks"), "tasks")?;

        Ok(Snapshot::new(projects, tasks))
    }
}

fn collection<T: DeserializeOwned>(value: Option<Value>, name: &str) -> Result<Vec<T>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(serde_json::from_value(Value::Array(items))?),
        Some(Value::Object(docs)) => {
            let mut docs: Vec<(String, Value)> = docs.into_iter().collect();
            docs.sort_by(|a, b| a.0.cmp(&b.0));
            let items = docs
                .into_iter()
                .map(|(key, doc)| with_id(name, key, doc))
                .collect::<Result<Vec<_>>>()?;
            Ok(serde_json::from_value(Value::Array(items))?)
        }
        Some(other) => Err(NudgerError::Validation(format!(
            "'{}' must be a list or an object keyed by id, got {}",
            name,
            type_name(&other)
        ))),
    }
}

fn with_id(name: &str, key: String, doc: Value) -> Result<Value> {
    let mut fields = match doc {
        Value::Object(fields) => fields,
        other => {
            return Err(NudgerError::Validation(format!(
                "'{}' entry '{}' must be an object, got {}",
                name,
                key,
                type_name(&other)
            )))
        }
    };
    if !fields.contains_key("id") {
        fields.insert("id".to_string(), Value::String(key));
    }
    Ok(Value::Object(fields))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
