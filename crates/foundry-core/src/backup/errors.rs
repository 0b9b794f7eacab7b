use std::path::PathBuf;

use crate::errors::FoundryError;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Failed to create backup directory '{}': {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create backup archive '{}': {source}", path.display())]
    ArchiveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to list backups in '{}': {source}", path.display())]
    ListFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FoundryError for BackupError {
    fn error_code(&self) -> &'static str {
        match self {
            BackupError::CreateDirFailed { .. } => "BACKUP_CREATE_DIR_FAILED",
            BackupError::ArchiveFailed { .. } => "BACKUP_ARCHIVE_FAILED",
            BackupError::ListFailed { .. } => "BACKUP_LIST_FAILED",
        }
    }
}
