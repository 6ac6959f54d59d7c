//! Check command
//!
//! Audit a snapshot for records that would export badly.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use nudger_core::snapshot::Severity;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Snapshot JSON file with projects and tasks
    #[arg(long, short)]
    pub input: PathBuf,

    /// Print issues as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail on warnings too
    #[arg(long)]
    pub strict: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    use colored::Colorize;

    let snapshot = super::load_snapshot(&args.input)?;
    let issues = snapshot.audit();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!(
            "{} {} projects, {} tasks, no issues",
            "✓".green(),
            snapshot.projects.len(),
            snapshot.tasks.len()
        );
    } else {
        for issue in &issues {
            let marker = match issue.severity {
                Severity::Error => "✗".red(),
                Severity::Warning => "⚠".yellow(),
            };
            println!("{} {}", marker, issue);
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;

    if errors > 0 || (args.strict && warnings > 0) {
        bail!("{} errors, {} warnings", errors, warnings);
    }

    Ok(())
}
