//! Hand a finished layer to whatever turns it into a real environment.
//!
//! The core never runs a package manager itself. [`apply_layer`] guards the
//! hand-off: the layer must validate and the configuration root is
//! snapshotted before the [`Applier`] sees it.

use crate::backup::{self, BackupError, Snapshot};
use crate::errors::FoundryError;
use crate::layers::{Layer, LayerError, Validate};
use crate::store::{ConfigStore, LayerCodec};

/// Consumer of an effective layer (a generator, an installer, a dry run).
pub trait Applier {
    type Error: std::error::Error + Send + Sync + 'static;

    fn apply(&mut self, layer: &Layer) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
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

    #[error("Apply failed: {source}")]
    Applier {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FoundryError for ApplyError {
    fn error_code(&self) -> &'static str {
        match self {
            ApplyError::Validation { .. } => "APPLY_VALIDATION_FAILED",
            ApplyError::Backup { .. } => "APPLY_BACKUP_FAILED",
            ApplyError::Applier { .. } => "APPLY_APPLIER_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            ApplyError::Validation { .. } => true,
            ApplyError::Backup { .. } | ApplyError::Applier { .. } => false,
        }
    }
}

/// Validate `layer` with the store's validator, snapshot the store's root,
/// then pass the layer to `applier`.
///
/// Nothing reaches the applier unless both guards succeed. The snapshot is
/// kept even when the applier fails, so the previous state can be restored.
pub fn apply_layer<C: LayerCodec, A: Applier>(
    store: &ConfigStore<C>,
    layer: &Layer,
    applier: &mut A,
) -> Result<Snapshot, ApplyError> {
    tracing::info!(
        event = "core.apply.apply_started",
        kind = %layer.kind,
        name = layer.name.as_deref().unwrap_or("-")
    );

    layer.validate_with(store.validator())?;
    let snapshot = backup::create_snapshot(store.config_dir())?;

    applier.apply(layer).map_err(|e| {
        tracing::error!(
            event = "core.apply.apply_failed",
            snapshot = %snapshot.path.display(),
            error = %e
        );
        ApplyError::Applier {
            source: Box::new(e),
        }
    })?;

    tracing::info!(
        event = "core.apply.apply_completed",
        snapshot = %snapshot.path.display()
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingApplier {
        applied: Vec<Layer>,
        fail: bool,
    }

    impl Applier for RecordingApplier {
        type Error = std::io::Error;

        fn apply(&mut self, layer: &Layer) -> Result<(), Self::Error> {
            if self.fail {
                return Err(std::io::Error::other("home-manager exited with status 1"));
            }
            self.applied.push(layer.clone());
            Ok(())
        }
    }

    #[test]
    fn test_apply_valid_layer() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        let layer = Layer::scaffold(LayerKind::Personal, None, "zsh", "nvim");
        let mut applier = RecordingApplier::default();

        let snapshot = apply_layer(&store, &layer, &mut applier).unwrap();

        assert_eq!(applier.applied, vec![layer]);
        assert!(snapshot.path.exists());
    }

    #[test]
    fn test_invalid_layer_never_reaches_applier() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        let layer = Layer::new(LayerKind::Personal);
        let mut applier = RecordingApplier::default();

        let err = apply_layer(&store, &layer, &mut applier).unwrap_err();

        assert!(matches!(err, ApplyError::Validation { .. }));
        assert!(err.is_user_error());
        assert!(applier.applied.is_empty());
        assert!(store.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_applier_failure_keeps_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        let layer = Layer::scaffold(LayerKind::Project, None, "bash", "vim");
        let mut applier = RecordingApplier {
            fail: true,
            ..Default::default()
        };

        let err = apply_layer(&store, &layer, &mut applier).unwrap_err();

        assert!(matches!(err, ApplyError::Applier { .. }));
        assert_eq!(err.error_code(), "APPLY_APPLIER_FAILED");
        assert!(err.to_string().contains("home-manager exited"));
        assert_eq!(store.list_backups().unwrap().len(), 1);
    }
}
