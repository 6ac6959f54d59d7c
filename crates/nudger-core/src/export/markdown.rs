//! Markdown note generators for the vault
//!
//! Every note starts with a `---` delimited frontmatter block of flat
//! `key: value` lines followed by `##` sections. Links between notes use
//! wiki-link syntax pointing at the paths from [`super::paths`].

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

use super::date::{format_date_in, format_instant};
use super::paths::{project_file_name, task_file_name};
use super::slug::slug;
use crate::error::ExportError;
use crate::types::{present, DateLike, Project, Task};

/// Status written for projects without one
pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// Status written for tasks without one
pub const DEFAULT_TASK_STATUS: &str = "idle";

/// Placeholder for an empty project task list
pub const NO_TASKS: &str = "_No tasks yet_";

/// Placeholder for an empty dashboard project list
pub const NO_PROJECTS: &str = "_No projects_";

/// Placeholder when nothing is overdue
pub const NO_OVERDUE_TASKS: &str = "🎉 No overdue tasks";

const MISSING: &str = "—";

/// Completion percentage, `0` for an empty task list
pub fn completion_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as u32
}

/// Frontmatter block builder
struct Frontmatter {
    buf: String,
}

impl Frontmatter {
    fn new() -> Self {
        Self {
            buf: String::from("---\n"),
        }
    }

    /// Plain scalar; empty values are written as a bare key
    fn field(&mut self, key: &str, value: &str) {
        let value = single_line(value);
        if value.is_empty() {
            self.buf.push_str(&format!("{}:\n", key));
        } else {
            self.buf.push_str(&format!("{}: {}\n", key, value));
        }
    }

    /// Double-quoted scalar
    fn quoted(&mut self, key: &str, value: &str) {
        self.buf.push_str(&format!("{}: {}\n", key, quote(value)));
    }

    fn finish(mut self) -> String {
        self.buf.push_str("---\n\n");
        self.buf
    }
}

/// Double-quoted YAML scalar with JSON-compatible escapes
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Collapse line breaks so a value cannot escape its line
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `[[path|label]]`, or `[[path]]` when the label is empty
fn wiki_link(path: &str, label: &str) -> String {
    let label: String = single_line(label)
        .chars()
        .map(|c| if matches!(c, '|' | '[' | ']') { ' ' } else { c })
        .collect();
    let label = label.trim();
    if label.is_empty() {
        format!("[[{}]]", path)
    } else {
        format!("[[{}|{}]]", path, label)
    }
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "- [x]"
    } else {
        "- [ ]"
    }
}

fn or_missing(value: &Option<String>) -> &str {
    present(value).unwrap_or(MISSING)
}

/// Renders notes with dates in a fixed timezone
#[derive(Debug, Clone)]
pub struct MarkdownRenderer<Tz: TimeZone = Local> {
    tz: Tz,
}

impl MarkdownRenderer<Local> {
    /// Renderer using the local timezone
    pub fn new() -> Self {
        Self { tz: Local }
    }
}

impl Default for MarkdownRenderer<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz> MarkdownRenderer<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Renderer using an explicit timezone
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    fn date(&self, value: Option<&DateLike>) -> String {
        format_date_in(value, &self.tz)
    }

    /// Project note with its task checklist
    pub fn project<'a, I>(&self, project: Option<&Project>, tasks: I) -> Result<String, ExportError>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let project = project.ok_or(ExportError::MissingProject)?;
        let tasks: Vec<&Task> = tasks.into_iter().collect();

        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_complete).count();
        let completion = completion_percent(completed, total);

        let mut fm = Frontmatter::new();
        fm.field("id", &project.id);
        fm.quoted("title", project.display_name().unwrap_or_default());
        fm.field("owner", present(&project.owner).unwrap_or_default());
        fm.field("category", present(&project.category).unwrap_or_default());
        fm.field("status", present(&project.status).unwrap_or(DEFAULT_PROJECT_STATUS));
        fm.field("created", &self.date(project.created_at.as_ref()));
        fm.field("updated", &self.date(project.updated_at.as_ref()));
        fm.field("completion", &completion.to_string());

        let mut out = fm.finish();

        out.push_str("## Overview\n");
        out.push_str(&format!(
            "- **Completion:** {}% ({}/{})\n",
            completion, completed, total
        ));
        out.push_str(&format!("- **Category:** {}\n", or_missing(&project.category)));
        out.push_str(&format!("- **Owner:** {}\n", or_missing(&project.owner)));
        out.push('\n');

        out.push_str("## Tasks\n");
        if tasks.is_empty() {
            out.push_str(NO_TASKS);
            out.push('\n');
        } else {
            for task in tasks {
                out.push_str(&format!(
                    "{} {}\n",
                    checkbox(task.is_complete),
                    wiki_link(&task_file_name(task), &task.title)
                ));
            }
        }

        Ok(out)
    }

    /// Task note, linked back to its project when one is given
    pub fn task(&self, task: Option<&Task>, project: Option<&Project>) -> Result<String, ExportError> {
        let task = task.ok_or(ExportError::MissingTask)?;

        let project_ref = match project {
            Some(p) => p.id.as_str(),
            None => task.project_id.as_deref().unwrap_or_default(),
        };
        let project_name = project.and_then(Project::display_name).unwrap_or_default();

        let mut fm = Frontmatter::new();
        fm.field("id", &task.id);
        fm.quoted("title", &task.title);
        fm.field("project", project_ref);
        fm.quoted("project_name", project_name);
        fm.field("status", present(&task.status).unwrap_or(DEFAULT_TASK_STATUS));
        fm.field("due", &self.date(task.due_date.as_ref()));
        fm.field("created", &self.date(task.created_at.as_ref()));
        fm.field("updated", &self.date(task.updated_at.as_ref()));

        let mut out = fm.finish();

        let mut line = vec![checkbox(task.is_complete).to_string()];
        let title = single_line(&task.title);
        if !title.is_empty() {
            line.push(title);
        }
        line.extend(task.tags.iter().map(|tag| format!("#{}", slug(tag.as_str()))));
        out.push_str(&line.join(" "));
        out.push('\n');

        if let Some(detail) = present(&task.detail) {
            out.push('\n');
            out.push_str(detail.trim_end());
            out.push('\n');
        }

        Ok(out)
    }

    /// Dashboard of all projects and overdue tasks as of `now`
    pub fn dashboard<'a, I>(&self, projects: &[Project], tasks: I, now: DateTime<Utc>) -> String
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut out = String::new();
        out.push_str("# Project Nudger Dashboard\n\n");
        out.push_str(&format!(
            "Last sync: {}\n\n",
            format_instant(&now.with_timezone(&self.tz))
        ));

        out.push_str("## Projects\n");
        if projects.is_empty() {
            out.push_str(NO_PROJECTS);
            out.push('\n');
        } else {
            for project in projects {
                // Link text has no id fallback, unlike the file name
                out.push_str(&format!(
                    "- {} ({})\n",
                    wiki_link(
                        &project_file_name(project),
                        project.display_name().unwrap_or_default()
                    ),
                    present(&project.status).unwrap_or(DEFAULT_PROJECT_STATUS)
                ));
            }
        }
        out.push('\n');

        out.push_str("## Urgent Tasks\n");
        let mut overdue = 0usize;
        for task in tasks.into_iter().filter(|t| t.is_overdue_at(now)) {
            out.push_str(&format!(
                "- ⚠️ {} due {}\n",
                wiki_link(&task_file_name(task), &task.title),
                self.date(task.due_date.as_ref())
            ));
            overdue += 1;
        }
        if overdue == 0 {
            out.push_str(NO_OVERDUE_TASKS);
            out.push('\n');
        }

        out
    }
}

/// Project note in local time. Fails only when `project` is `None`.
pub fn generate_project_markdown(project: Option<&Project>, tasks: &[Task]) -> Result<String, ExportError> {
    MarkdownRenderer::new().project(project, tasks)
}

/// Task note in local time. Fails only when `task` is `None`.
pub fn generate_task_markdown(task: Option<&Task>, project: Option<&Project>) -> Result<String, ExportError> {
    MarkdownRenderer::new().task(task, project)
}

/// Dashboard note stamped with the current time
pub fn generate_dashboard_markdown(projects: &[Project], tasks: &[Task]) -> String {
    generate_dashboard_markdown_at(projects, tasks, Utc::now())
}

/// Dashboard note as of `now`
pub fn generate_dashboard_markdown_at(projects: &[Project], tasks: &[Task], now: DateTime<Utc>) -> String {
    MarkdownRenderer::new().dashboard(projects, tasks, now)
}
