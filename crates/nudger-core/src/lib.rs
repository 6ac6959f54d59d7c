//! nudger-core - Core library for nudger
//!
//! This crate provides the record types of Project Nudger and the pure
//! Markdown exporter that turns them into vault notes, along with snapshot
//! auditing and configuration.

pub mod config;
pub mod error;
pub mod export;
pub mod snapshot;
pub mod types;

pub use error::{ExportError, NudgerError, Result};
pub use snapshot::Snapshot;
pub use types::{DateLike, DateParseError, Project, Task, Timestamp};
