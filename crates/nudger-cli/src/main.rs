//! nudger - Project Nudger vault exporter
//!
//! Turns project and task records exported from the Project Nudger database
//! into Markdown notes for a note-taking vault.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default configuration
//! nudger config init
//!
//! # Check the records before syncing
//! nudger check --input snapshot.json
//!
//! # Write notes into the vault
//! nudger export --input snapshot.json --vault ~/Notes
//!
//! # Preview a single note
//! nudger render project p1 --input snapshot.json
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
