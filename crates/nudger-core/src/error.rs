//! Error types for nudger

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for nudger
#[derive(Debug, Error)]
pub enum NudgerError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Markdown export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Project not found in a snapshot
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Task not found in a snapshot
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported manifest schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NudgerError>,
    },
}

impl NudgerError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NudgerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Precondition failures of the Markdown generators.
///
/// These are the only hard failures of the exporter: a missing primary
/// record. Missing optional fields always fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Project note requested without a project
    #[error("project is required")]
    MissingProject,

    /// Task note requested without a task
    #[error("task is required")]
    MissingTask,
}

/// Result type alias for nudger
pub type Result<T> = std::result::Result<T, NudgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NudgerError::ProjectNotFound("p-123".to_string());
        assert_eq!(err.to_string(), "Project not found: p-123");
    }

    #[test]
    fn test_error_with_context() {
        let err = NudgerError::Validation("dashboard file must end in .md".to_string());
        let err = err.with_context("Failed to load config");
        assert!(err.to_string().contains("Failed to load config"));
        assert!(err.to_string().contains("dashboard file"));
    }

    #[test]
    fn test_export_error_is_transparent() {
        let err: NudgerError = ExportError::MissingTask.into();
        assert_eq!(err.to_string(), "task is required");
        assert!(matches!(err, NudgerError::Export(ExportError::MissingTask)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NudgerError = io_err.into();
        assert!(matches!(err, NudgerError::Io(_)));
    }
}
