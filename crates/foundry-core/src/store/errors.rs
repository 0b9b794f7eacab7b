use std::path::PathBuf;

use crate::backup::BackupError;
use crate::errors::FoundryError;
use crate::layers::{LayerError, UnknownLayerKind};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{source}")]
    UnknownKind {
        #[from]
        source: UnknownLayerKind,
    },

    #[error("A {kind} layer requires a name (use '{kind}:<name>')")]
    MissingName { kind: String },

    #[error("Invalid layer name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Layer file not found at '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid layer location '{}': expected a file path", path.display())]
    InvalidLocation { path: PathBuf },

    #[error("Failed to decode layer file '{}': {message}", path.display())]
    DecodeError { path: PathBuf, message: String },

    #[error("Failed to encode layer for '{}': {message}", path.display())]
    EncodeError { path: PathBuf, message: String },

    #[error("IO error on '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation failed: {source}")]
    Validation {
        #[from]
        source: LayerError,
    },

    #[error("Backup failed: {source}")]
    Backup {
        #[from]
        source: BackupError,
    },
}

impl FoundryError for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::UnknownKind { .. } => "STORE_UNKNOWN_KIND",
            StoreError::MissingName { .. } => "STORE_MISSING_NAME",
            StoreError::InvalidName { .. } => "STORE_INVALID_NAME",
            StoreError::NotFound { .. } => "STORE_NOT_FOUND",
            StoreError::InvalidLocation { .. } => "STORE_INVALID_LOCATION",
            StoreError::DecodeError { .. } => "STORE_DECODE_ERROR",
            StoreError::EncodeError { .. } => "STORE_ENCODE_ERROR",
            StoreError::IoError { .. } => "STORE_IO_ERROR",
            StoreError::Validation { .. } => "STORE_VALIDATION_FAILED",
            StoreError::Backup { .. } => "STORE_BACKUP_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        // Exhaustive match ensures new variants force an explicit classification.
        match self {
            StoreError::UnknownKind { .. }
            | StoreError::MissingName { .. }
            | StoreError::InvalidName { .. }
            | StoreError::NotFound { .. }
            | StoreError::InvalidLocation { .. }
            | StoreError::DecodeError { .. }
            | StoreError::Validation { .. } => true,

            StoreError::EncodeError { .. }
            | StoreError::IoError { .. }
            | StoreError::Backup { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::Violation;

    #[test]
    fn test_unknown_kind_display() {
        let error = StoreError::from(UnknownLayerKind {
            kind: "machine".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Unknown layer kind 'machine'. Valid kinds: personal, project, team"
        );
        assert_eq!(error.error_code(), "STORE_UNKNOWN_KIND");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_invalid_location_is_user_error() {
        let error = StoreError::InvalidLocation {
            path: PathBuf::from("/cfg"),
        };
        assert_eq!(error.error_code(), "STORE_INVALID_LOCATION");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_not_found_display() {
        let error = StoreError::NotFound {
            path: PathBuf::from("/cfg/teams/infra.toml"),
        };
        assert_eq!(
            error.to_string(),
            "Layer file not found at '/cfg/teams/infra.toml'"
        );
        assert_eq!(error.error_code(), "STORE_NOT_FOUND");
    }

    #[test]
    fn test_validation_wraps_layer_error() {
        let error: StoreError = LayerError::ValidationFailed {
            violations: vec![Violation::MissingField { field: "version" }],
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Validation failed: Layer validation failed:\n- version is required"
        );
        assert_eq!(error.error_code(), "STORE_VALIDATION_FAILED");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_io_error_is_system_error() {
        let error = StoreError::IoError {
            path: PathBuf::from("/cfg/config.toml"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(error.to_string().contains("permission denied"));
        assert!(!error.is_user_error());
    }
}
