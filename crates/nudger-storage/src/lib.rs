//! nudger-storage - Storage library for nudger
//!
//! This crate loads record snapshots and writes generated notes into a vault.

mod snapshot_store;
mod vault_store;

pub use snapshot_store::SnapshotStore;
pub use vault_store::{ApplyOptions, Manifest, SyncReport, VaultStore, MANIFEST_SCHEMA_VERSION};
