//! Vault-relative note paths
//!
//! File names are the join key the sync job uses to find previously written
//! notes, so they depend only on the record itself.

use super::slug::slug;
use crate::types::{Project, Task};

/// Directory holding project notes
pub const PROJECTS_DIR: &str = "projects";

/// Directory holding task notes
pub const TASKS_DIR: &str = "tasks";

/// `projects/<slug>.md`, slugged from title, then name, then id, then `"project"`
pub fn project_file_name(project: &Project) -> String {
    let source = project
        .display_name()
        .or_else(|| Some(project.id.as_str()).filter(|id| !id.is_empty()))
        .unwrap_or("project");
    format!("{}/{}.md", PROJECTS_DIR, slug(source))
}

/// `tasks/<slug(title)>-<id>.md`; the raw id keeps same-titled tasks apart
pub fn task_file_name(task: &Task) -> String {
    format!("{}/{}-{}.md", TASKS_DIR, slug(task.title.as_str()), task.id)
}
