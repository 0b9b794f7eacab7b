//! Whole-directory snapshots of the configuration root.
//!
//! Snapshots are gzip-compressed tar archives under `<root>/backups/`, named
//! `backup-YYYYMMDD-HHMMSS.tar.gz`. They are append-only: nothing here
//! overwrites, prunes or restores them.

pub mod errors;
pub mod operations;

pub use errors::BackupError;
pub use operations::{Snapshot, create_snapshot, list_snapshots};

/// Name of the snapshot directory inside the configuration root.
pub const BACKUP_DIR: &str = "backups";
