//! Render command
//!
//! Print one note to stdout without touching the vault.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use nudger_core::config::Config;
use nudger_core::export::{
    generate_dashboard_markdown, generate_project_markdown, generate_task_markdown,
    project_file_name, task_file_name,
};
use nudger_core::NudgerError;

/// Snapshot input shared by render subcommands
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Snapshot JSON file with projects and tasks
    #[arg(long, short)]
    pub input: PathBuf,

    /// Print the vault path on stderr
    #[arg(long)]
    pub show_path: bool,
}

/// Render subcommands
#[derive(Debug, Subcommand)]
pub enum RenderCommand {
    /// Render a project note
    Project {
        /// Project id
        id: String,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Render a task note
    Task {
        /// Task id
        id: String,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Render the dashboard note
    Dashboard {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Execute the render command
pub fn execute(cmd: RenderCommand, config: &Config) -> Result<()> {
    let (content, path, show_path) = match cmd {
        RenderCommand::Project { id, input } => {
            let snapshot = super::load_snapshot(&input.input)?;
            let project = snapshot
                .project(&id)
                .ok_or_else(|| NudgerError::ProjectNotFound(id.clone()))?;
            let tasks: Vec<_> = snapshot.tasks_for(&id).into_iter().cloned().collect();
            let content = generate_project_markdown(Some(project), &tasks)?;
            (content, project_file_name(project), input.show_path)
        }
        RenderCommand::Task { id, input } => {
            let snapshot = super::load_snapshot(&input.input)?;
            let task = snapshot
                .task(&id)
                .ok_or_else(|| NudgerError::TaskNotFound(id.clone()))?;
            let content = generate_task_markdown(Some(task), snapshot.project_for(task))?;
            (content, task_file_name(task), input.show_path)
        }
        RenderCommand::Dashboard { input } => {
            let snapshot = super::load_snapshot(&input.input)?;
            let content = generate_dashboard_markdown(&snapshot.projects, &snapshot.tasks);
            (content, config.export.dashboard_file.clone(), input.show_path)
        }
    };

    if show_path {
        eprintln!("{}", path);
    }

    std::io::stdout()
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;

    Ok(())
}
