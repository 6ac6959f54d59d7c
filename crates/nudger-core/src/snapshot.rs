//! In-memory set of records handed over by the database export job

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::config::is_vault_relative;
use crate::export::{project_file_name, task_file_name};
use crate::types::{DateLike, Project, Task};

/// All projects and tasks of one export run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn new(projects: Vec<Project>, tasks: Vec<Task>) -> Self {
        Self { projects, tasks }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tasks.is_empty()
    }

    /// Look up a project by id
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up a task by id
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks belonging to a project, in snapshot order
    pub fn tasks_for(&self, project_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project_id))
            .collect()
    }

    /// The project a task points at, if it exists
    pub fn project_for(&self, task: &Task) -> Option<&Project> {
        task.project_id.as_deref().and_then(|id| self.project(id))
    }

    /// Data problems worth fixing upstream before a sync
    pub fn audit(&self) -> Vec<AuditIssue> {
        let mut issues = Vec::new();

        let mut project_ids = HashSet::new();
        for project in &self.projects {
            if project.id.is_empty() {
                issues.push(AuditIssue::new(Severity::Error, RecordRef::project(project), IssueKind::MissingId));
            } else if !project_ids.insert(project.id.as_str()) {
                issues.push(AuditIssue::new(
                    Severity::Error,
                    RecordRef::project(project),
                    IssueKind::DuplicateId,
                ));
            }
            check_date(&mut issues, RecordRef::project(project), "createdAt", project.created_at.as_ref());
            check_date(&mut issues, RecordRef::project(project), "updatedAt", project.updated_at.as_ref());
        }

        let mut paths: HashMap<String, &str> = HashMap::new();
        for project in self.projects.iter().filter(|p| !p.id.is_empty()) {
            let path = project_file_name(project);
            match paths.get(path.as_str()) {
                Some(first) if *first != project.id => issues.push(AuditIssue::new(
                    Severity::Error,
                    RecordRef::project(project),
                    IssueKind::PathCollision {
                        path,
                        other: first.to_string(),
                    },
                )),
                Some(_) => {}
                None => {
                    paths.insert(path, project.id.as_str());
                }
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            let record = RecordRef::task(task);
            if task.id.is_empty() {
                issues.push(AuditIssue::new(Severity::Error, record.clone(), IssueKind::MissingId));
            } else if !task_ids.insert(task.id.as_str()) {
                issues.push(AuditIssue::new(Severity::Error, record.clone(), IssueKind::DuplicateId));
            }
            if !task.id.is_empty() && !is_path_safe_id(task) {
                issues.push(AuditIssue::new(Severity::Error, record.clone(), IssueKind::UnsafeId));
            }
            if task.title.trim().is_empty() {
                issues.push(AuditIssue::new(Severity::Warning, record.clone(), IssueKind::Untitled));
            }
            if let Some(project_id) = task.project_id.as_deref().filter(|id| !id.is_empty()) {
                if !project_ids.contains(project_id) {
                    issues.push(AuditIssue::new(
                        Severity::Warning,
                        record.clone(),
                        IssueKind::OrphanTask {
                            project_id: project_id.to_string(),
                        },
                    ));
                }
            }
            check_date(&mut issues, record.clone(), "dueDate", task.due_date.as_ref());
            check_date(&mut issues, record.clone(), "createdAt", task.created_at.as_ref());
            check_date(&mut issues, record, "updatedAt", task.updated_at.as_ref());
        }

        issues
    }
}

/// Task ids are copied into the note file name verbatim
fn is_path_safe_id(task: &Task) -> bool {
    !task.id.contains(['/', '\\'])
        && !task.id.contains("..")
        && is_vault_relative(Path::new(&task_file_name(task)))
}

fn check_date(issues: &mut Vec<AuditIssue>, record: RecordRef, field: &'static str, value: Option<&DateLike>) {
    if let Some(value) = value {
        if let Err(err) = value.to_datetime() {
            issues.push(AuditIssue::new(
                Severity::Warning,
                record,
                IssueKind::UnparsableDate {
                    field,
                    value: value.to_string(),
                    reason: err.to_string(),
                },
            ));
        }
    }
}

/// How serious an audit finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Which record an issue is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum RecordRef {
    Project(String),
    Task(String),
}

impl RecordRef {
    fn project(project: &Project) -> Self {
        RecordRef::Project(project.id.clone())
    }

    fn task(task: &Task) -> Self {
        RecordRef::Task(task.id.clone())
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Project(id) => write!(f, "project '{}'", id),
            RecordRef::Task(id) => write!(f, "task '{}'", id),
        }
    }
}

/// What is wrong with a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    MissingId,
    DuplicateId,
    Untitled,
    OrphanTask { project_id: String },
    UnsafeId,
    UnparsableDate {
        field: &'static str,
        value: String,
        reason: String,
    },
    PathCollision { path: String, other: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::MissingId => write!(f, "has no id"),
            IssueKind::DuplicateId => write!(f, "id is used more than once"),
            IssueKind::Untitled => write!(f, "has no title"),
            IssueKind::OrphanTask { project_id } => {
                write!(f, "points at missing project '{}'", project_id)
            }
            IssueKind::UnsafeId => write!(f, "id cannot be used in a file name"),
            IssueKind::UnparsableDate { field, value, reason } => {
                write!(f, "{} '{}' cannot be parsed ({})", field, value, reason)
            }
            IssueKind::PathCollision { path, other } => {
                write!(f, "writes to {} which project '{}' also uses", path, other)
            }
        }
    }
}

/// One audit finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditIssue {
    pub severity: Severity,
    pub record: RecordRef,
    pub kind: IssueKind,
}

impl AuditIssue {
    fn new(severity: Severity, record: RecordRef, kind: IssueKind) -> Self {
        Self { severity, record, kind }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.severity, self.record, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot::new(
            vec![Project::new("p1", "Home"), Project::new("p2", "Work")],
            vec![
                Task::new("t1", "Dishes").in_project("p1"),
                Task::new("t2", "Report").in_project("p2"),
                Task::new("t3", "Laundry").in_project("p1").completed(),
                Task::new("t4", "Loose"),
            ],
        )
    }

    #[test]
    fn test_tasks_for_keeps_order() {
        let snapshot = sample();
        let ids: Vec<_> = snapshot.tasks_for("p1").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert!(snapshot.tasks_for("missing").is_empty());
    }

    #[test]
    fn test_project_for() {
        let snapshot = sample();
        let task = snapshot.task("t2").unwrap();
        assert_eq!(snapshot.project_for(task).map(|p| p.id.as_str()), Some("p2"));
        let loose = snapshot.task("t4").unwrap();
        assert!(snapshot.project_for(loose).is_none());
    }

    #[test]
    fn test_clean_snapshot_has_no_issues() {
        assert!(sample().audit().is_empty());
    }

    #[test]
    fn test_audit_finds_problems() {
        let mut snapshot = sample();
        snapshot.projects.push(Project::new("p1", "Home again"));
        snapshot.projects.push(Project::new("p3", "work"));
        snapshot.tasks.push(Task::new("t5", " ").in_project("p9").due("soon"));

        let issues = snapshot.audit();
        let kinds: Vec<_> = issues.iter().map(|i| &i.kind).collect();

        assert!(kinds.contains(&&IssueKind::DuplicateId));
        assert!(kinds.contains(&&IssueKind::Untitled));
        assert!(kinds.contains(&&IssueKind::OrphanTask {
            project_id: "p9".to_string()
        }));
        assert!(issues.iter().any(|i| matches!(
            &i.kind,
            IssueKind::PathCollision { path, other } if path == "projects/work.md" && other == "p2"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.kind,
            IssueKind::UnparsableDate { field: "dueDate", .. }
        )));
        assert!(issues.iter().any(AuditIssue::is_error));
    }

    #[test]
    fn test_audit_flags_ids_unsafe_in_paths() {
        let mut snapshot = sample();
        snapshot.tasks.push(Task::new("a/../../../etc/x", "Evil"));
        snapshot.tasks.push(Task::new("x/y", "Nested"));
        snapshot.tasks.push(Task::new("back\\slash", "Windows"));
        snapshot.tasks.push(Task::new("dots..", "Dots"));

        let unsafe_ids: Vec<_> = snapshot
            .audit()
            .into_iter()
            .filter(|i| i.kind == IssueKind::UnsafeId)
            .map(|i| {
                assert!(i.is_error());
                i.record
            })
            .collect();

        assert_eq!(
            unsafe_ids,
            vec![
                RecordRef::Task("a/../../../etc/x".to_string()),
                RecordRef::Task("x/y".to_string()),
                RecordRef::Task("back\\slash".to_string()),
                RecordRef::Task("dots..".to_string()),
            ]
        );
    }

    #[test]
    fn test_unparsable_date_names_the_value() {
        let snapshot = Snapshot::new(vec![], vec![Task::new("t1", "Later").due("next week")]);
        let issues = snapshot.audit();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].to_string(),
            "warning: task 't1' dueDate 'next week' cannot be parsed (unrecognized date format: next week)"
        );
    }

    #[test]
    fn test_issue_display() {
        let issue = AuditIssue::new(
            Severity::Warning,
            RecordRef::Task("t9".to_string()),
            IssueKind::OrphanTask {
                project_id: "p0".to_string(),
            },
        );
        assert_eq!(issue.to_string(), "warning: task 't9' points at missing project 'p0'");
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_lists() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"projects": [{"id": "p1"}]}"#).unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        assert!(snapshot.tasks.is_empty());
    }
}
