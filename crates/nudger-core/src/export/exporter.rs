//! Vault export plan
//!
//! Turns a [`Snapshot`] into the full set of notes one export run writes.
//! Planning is pure; writing the files is the storage layer's job.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::markdown::MarkdownRenderer;
use super::paths::{project_file_name, task_file_name};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::snapshot::Snapshot;

/// One generated note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultFile {
    /// Vault-relative path with `/` separators
    pub path: String,
    /// Full Markdown content
    pub content: String,
}

impl VaultFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Hex blake3 hash of the content
    pub fn content_hash(&self) -> String {
        blake3::hash(self.content.as_bytes()).to_hex().to_string()
    }
}

/// Plans the notes for a snapshot
pub struct VaultExporter<Tz: TimeZone = Local> {
    renderer: MarkdownRenderer<Tz>,
    include_dashboard: bool,
    dashboard_file: String,
    skip_completed_tasks: bool,
}

impl VaultExporter<Local> {
    /// Exporter rendering dates in local time
    pub fn new(config: &ExportConfig) -> Self {
        Self::with_renderer(config, MarkdownRenderer::new())
    }
}

impl<Tz> VaultExporter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Exporter with an explicit renderer
    pub fn with_renderer(config: &ExportConfig, renderer: MarkdownRenderer<Tz>) -> Self {
        Self {
            renderer,
            include_dashboard: config.include_dashboard,
            dashboard_file: config.dashboard_file.clone(),
            skip_completed_tasks: config.skip_completed_tasks,
        }
    }

    /// Set whether to write the dashboard note
    pub fn with_dashboard(mut self, include: bool) -> Self {
        self.include_dashboard = include;
        self
    }

    /// Plan all notes as of the current time
    pub fn plan(&self, snapshot: &Snapshot) -> Result<Vec<VaultFile>> {
        self.plan_at(snapshot, Utc::now())
    }

    /// Plan all notes as of `now`.
    ///
    /// Output order: projects, then tasks, then the dashboard, each in
    /// snapshot order.
    pub fn plan_at(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<Vec<VaultFile>> {
        let mut files = Vec::with_capacity(snapshot.projects.len() + snapshot.tasks.len() + 1);

        for project in &snapshot.projects {
            let tasks = snapshot.tasks_for(&project.id);
            let content = self.renderer.project(Some(project), tasks)?;
            files.push(VaultFile::new(project_file_name(project), content));
        }

        for task in &snapshot.tasks {
            if self.skip_completed_tasks && task.is_complete {
                continue;
            }
            let content = self.renderer.task(Some(task), snapshot.project_for(task))?;
            files.push(VaultFile::new(task_file_name(task), content));
        }

        if self.include_dashboard {
            let content = self.renderer.dashboard(&snapshot.projects, &snapshot.tasks, now);
            files.push(VaultFile::new(self.dashboard_file.clone(), content));
        }

        Ok(files)
    }
}
