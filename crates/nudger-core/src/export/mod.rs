//! Markdown export for the note vault
//!
//! This module turns project and task records into vault notes:
//! - slugs and vault-relative file names
//! - fixed-format timestamps
//! - project, task and dashboard Markdown with YAML frontmatter
//! - the full note plan for a snapshot
//!
//! # Example
//!
//! ```ignore
//! use nudger_core::export::{generate_project_markdown, project_file_name};
//!
//! let path = project_file_name(&project);
//! let md = generate_project_markdown(Some(&project), &tasks)?;
//! ```

mod date;
mod exporter;
mod markdown;
mod paths;
mod slug;

pub use date::{format_date, format_date_in, format_instant, DATE_FORMAT};
pub use exporter::{VaultExporter, VaultFile};
pub use markdown::{
    completion_percent, generate_dashboard_markdown, generate_dashboard_markdown_at,
    generate_project_markdown, generate_task_markdown, MarkdownRenderer, DEFAULT_PROJECT_STATUS,
    DEFAULT_TASK_STATUS, NO_OVERDUE_TASKS, NO_PROJECTS, NO_TASKS,
};
pub use paths::{project_file_name, task_file_name, PROJECTS_DIR, TASKS_DIR};
pub use slug::{slug, EMPTY_SLUG, MAX_SLUG_LEN};
