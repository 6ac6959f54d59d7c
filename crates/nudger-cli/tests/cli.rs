//! CLI integration tests for nudger
//!
//! Each test runs the binary against a snapshot file and a vault inside a
//! temporary directory.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance for the nudger binary
fn nudger_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("nudger"));
    cmd.current_dir(dir)
        .env_remove("NUDGER_CONFIG")
        .arg("--no-color")
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

const SNAPSHOT: &str = r#"{
  "projects": [
    {
      "id": "p1",
      "title": "Launch Website",
      "owner": "Dana",
      "category": "Marketing",
      "status": "active"
    },
    { "id": "p2", "name": "Legacy Cleanup" }
  ],
  "tasks": [
    { "id": "t1", "title": "Write copy", "projectId": "p1", "isComplete": true },
    {
      "id": "t2",
      "title": "Pick a domain",
      "projectId": "p1",
      "isComplete": false,
      "tags": ["web"],
      "dueDate": "2000-01-02T09:30:00Z"
    },
    { "id": "t3", "title": "Archive repos", "projectId": "p2", "isComplete": false }
  ]
}"#;

/// Temporary directory with `snapshot.json` in it
fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("snapshot.json");
    fs::write(&input, SNAPSHOT).unwrap();
    (dir, input)
}

// =============================================================================
// Slug Tests
// =============================================================================

#[test]
fn test_slug_joins_words() {
    let dir = TempDir::new().unwrap();

    nudger_cmd(dir.path())
        .args(["slug", "Hello,", "World!"])
        .assert()
        .success()
        .stdout("hello-world\n");
}

#[test]
fn test_slug_of_symbols_is_untitled() {
    let dir = TempDir::new().unwrap();

    nudger_cmd(dir.path())
        .args(["slug", "!!!"])
        .assert()
        .success()
        .stdout("untitled\n");
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_writes_notes() {
    let (dir, input) = setup();
    let vault = dir.path().join("vault");

    nudger_cmd(dir.path())
        .arg("export")
        .arg("--input")
        .arg(&input)
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    assert!(vault.join("projects/launch-website.md").is_file());
    assert!(vault.join("projects/legacy-cleanup.md").is_file());
    assert!(vault.join("tasks/write-copy-t1.md").is_file());
    assert!(vault.join("tasks/pick-a-domain-t2.md").is_file());
    assert!(vault.join("tasks/archive-repos-t3.md").is_file());
    assert!(vault.join("Dashboard.md").is_file());
    assert!(vault.join(".nudger/manifest.json").is_file());

    let project = fs::read_to_string(vault.join("projects/launch-website.md")).unwrap();
    assert!(project.contains("completion: 50"));
    assert!(project.contains("- [x] [[tasks/write-copy-t1.md|Write copy]]"));
    assert!(project.contains("- [ ] [[tasks/pick-a-domain-t2.md|Pick a domain]]"));

    let task = fs::read_to_string(vault.join("tasks/pick-a-domain-t2.md")).unwrap();
    assert!(task.contains("project: p1"));
    assert!(task.contains("- [ ] Pick a domain #web"));
}

#[test]
fn test_export_twice_is_unchanged() {
    let (dir, input) = setup();
    let vault = dir.path().join("vault");

    let run = || {
        nudger_cmd(dir.path())
            .arg("export")
            .arg("--input")
            .arg(&input)
            .arg("--vault")
            .arg(&vault)
            .arg("--no-dashboard")
            .arg("--json")
            .assert()
            .success()
    };

    run();
    let output = run().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["written"].as_array().unwrap().len(), 0);
    assert_eq!(report["unchanged"].as_array().unwrap().len(), 5);
}

#[test]
fn test_export_dry_run_writes_nothing() {
    let (dir, input) = setup();
    let vault = dir.path().join("vault");

    nudger_cmd(dir.path())
        .arg("export")
        .arg("--input")
        .arg(&input)
        .arg("--vault")
        .arg(&vault)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would write"));

    assert!(!vault.join("projects").exists());
}

#[test]
fn test_export_prune_removes_stale_notes() {
    let (dir, input) = setup();
    let vault = dir.path().join("vault");

    nudger_cmd(dir.path())
        .arg("export")
        .arg("--input")
        .arg(&input)
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success();

    // Unrelated user note must survive pruning
    fs::write(vault.join("notes.md"), "mine").unwrap();

    let smaller_path = dir.path().join("smaller.json");
    fs::write(
        &smaller_path,
        r#"{
          "projects": [{ "id": "p1", "title": "Launch Website" }],
          "tasks": [{ "id": "t2", "title": "Pick a domain", "projectId": "p1" }]
        }"#,
    )
    .unwrap();

    nudger_cmd(dir.path())
        .arg("export")
        .arg("--input")
        .arg(&smaller_path)
        .arg("--vault")
        .arg(&vault)
        .arg("--prune")
        .assert()
        .success();

    assert!(!vault.join("tasks/write-copy-t1.md").exists());
    assert!(!vault.join("tasks/archive-repos-t3.md").exists());
    assert!(vault.join("tasks/pick-a-domain-t2.md").is_file());
    assert!(vault.join("notes.md").is_file());
}

#[test]
fn test_export_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    nudger_cmd(dir.path())
        .args(["export", "--input", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load snapshot"));
}

// =============================================================================
// Render Tests
// =============================================================================

#[test]
fn test_render_project() {
    let (dir, input) = setup();

    nudger_cmd(dir.path())
        .args(["render", "project", "p2", "--show-path", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\nid: p2\ntitle: \"Legacy Cleanup\""))
        .stdout(predicate::str::contains("[[tasks/archive-repos-t3.md|Archive repos]]"))
        .stderr(predicate::str::contains("projects/legacy-cleanup.md"));
}

#[test]
fn test_render_task() {
    let (dir, input) = setup();

    nudger_cmd(dir.path())
        .args(["render", "task", "t1", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("project_name: \"Launch Website\""))
        .stdout(predicate::str::contains("- [x] Write copy"));
}

#[test]
fn test_render_dashboard_lists_overdue() {
    let (dir, input) = setup();

    nudger_cmd(dir.path())
        .args(["render", "dashboard", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Project Nudger Dashboard"))
        .stdout(predicate::str::contains("[[projects/launch-website.md|Launch Website]] (active)"))
        .stdout(predicate::str::contains("[[tasks/pick-a-domain-t2.md|Pick a domain]] due"))
        .stdout(predicate::str::contains("Archive repos").not());
}

#[test]
fn test_render_unknown_project_fails() {
    let (dir, input) = setup();

    nudger_cmd(dir.path())
        .args(["render", "project", "missing", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_clean_snapshot() {
    let (dir, input) = setup();

    nudger_cmd(dir.path())
        .arg("check")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("no issues"));
}

#[test]
fn test_check_duplicate_ids_fail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dup.json");
    fs::write(
        &input,
        r#"{"projects": [], "tasks": [
            {"id": "t1", "title": "A"},
            {"id": "t1", "title": "B"}
        ]}"#,
    )
    .unwrap();

    nudger_cmd(dir.path())
        .arg("check")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("errors"));
}

#[test]
fn test_check_rejects_task_ids_unsafe_in_paths() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("paths.json");
    fs::write(
        &input,
        r#"{"tasks": [
            {"id": "a/../../../etc/x", "title": "Evil"},
            {"id": "x/y", "title": "Nested"}
        ]}"#,
    )
    .unwrap();

    nudger_cmd(dir.path())
        .arg("check")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("task 'x/y' id cannot be used in a file name"))
        .stdout(predicate::str::contains("task 'a/../../../etc/x' id cannot be used in a file name"))
        .stderr(predicate::str::contains("2 errors"));
}

#[test]
fn test_check_strict_fails_on_orphans() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("orphan.json");
    fs::write(
        &input,
        r#"{"tasks": [{"id": "t9", "title": "Lost", "projectId": "p0"}]}"#,
    )
    .unwrap();

    nudger_cmd(dir.path())
        .arg("check")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("missing project 'p0'"));

    nudger_cmd(dir.path())
        .arg("check")
        .arg("--strict")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure();
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();

    nudger_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    assert!(dir.path().join("config.toml").is_file());

    nudger_cmd(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dashboard_file\": \"Dashboard.md\""));

    nudger_cmd(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_rejects_escaping_dashboard() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[export]\ndashboard_file = \"../Dashboard.md\"\n",
    )
    .unwrap();

    nudger_cmd(dir.path())
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inside the vault"));
}

#[test]
fn test_config_dashboard_file_used_by_export() {
    let (dir, input) = setup();
    fs::write(
        dir.path().join("config.toml"),
        "[vault]\npath = \"notes\"\n\n[export]\ndashboard_file = \"Home/Nudger.md\"\n",
    )
    .unwrap();

    nudger_cmd(dir.path())
        .arg("export")
        .arg("--input")
        .arg(&input)
        .assert()
        .success();

    assert!(dir.path().join("notes/Home/Nudger.md").is_file());
    assert!(!dir.path().join("notes/Dashboard.md").exists());
}
