use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::codec::{LayerCodec, TomlCodec};
use super::errors::StoreError;
use super::paths::LayerId;
use crate::backup::{self, BACKUP_DIR, Snapshot};
use crate::config::Config;
use crate::layers::{Layer, Validate, Validator, compose_layers};

/// Safety options for [`ConfigStore::safe_write`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Passed through for callers (e.g. skip confirmation prompts); the
    /// store itself does not act on it.
    pub force: bool,
    /// Validate the value before writing.
    pub validate: bool,
    /// Snapshot the whole configuration root before writing.
    pub backup: bool,
}

impl WriteOptions {
    /// Validate and back up before writing.
    pub fn safe() -> Self {
        Self {
            force: false,
            validate: true,
            backup: true,
        }
    }
}

/// Typed access to the layer files under one configuration root.
///
/// Locations passed to [`read`](Self::read), [`write`](Self::write) and
/// friends are resolved against the root; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct ConfigStore<C: LayerCodec = TomlCodec> {
    root: PathBuf,
    codec: C,
    validator: Validator,
}

impl ConfigStore<TomlCodec> {
    /// Store over `root` using TOML files and the built-in allow-lists.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            codec: TomlCodec,
            validator: Validator::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.config_dir.clone())
    }
}

impl<C: LayerCodec> ConfigStore<C> {
    /// Switch the on-disk encoding.
    pub fn with_codec<D: LayerCodec>(self, codec: D) -> ConfigStore<D> {
        ConfigStore {
            root: self.root,
            codec,
            validator: self.validator,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Absolute path of a layer's file.
    pub fn resolve(&self, id: &LayerId) -> PathBuf {
        self.root.join(id.relative_path(self.codec.extension()))
    }

    /// Resolved path plus its file name, for locations that name a file.
    fn file_location(&self, location: &Path) -> Result<(PathBuf, OsString), StoreError> {
        let path = self.location(location);
        match location.file_name() {
            Some(file_name) => Ok((path, file_name.to_os_string())),
            None => Err(StoreError::InvalidLocation { path }),
        }
    }

    fn location(&self, location: &Path) -> PathBuf {
        self.root.join(location)
    }

    /// Whether something exists at `location`. Never fails.
    pub fn exists(&self, location: impl AsRef<Path>) -> bool {
        self.location(location.as_ref()).exists()
    }

    /// Read and decode the file at `location`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if there is no file, `StoreError::DecodeError`
    /// if its content cannot be decoded, `StoreError::IoError` otherwise.
    pub fn read<T: DeserializeOwned>(&self, location: impl AsRef<Path>) -> Result<T, StoreError> {
        let path = self.location(location.as_ref());

        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound { path: path.clone() }
            } else {
                StoreError::IoError {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        self.codec.decode(&content).map_err(|message| {
            tracing::warn!(
                event = "core.store.decode_failed",
                path = %path.display(),
                error = %message
            );
            StoreError::DecodeError {
                path: path.clone(),
                message,
            }
        })
    }

    /// Encode `value` and write it to `location`, replacing whatever is there.
    ///
    /// Missing parent directories are created. The content is written to a
    /// temporary sibling file and renamed into place.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidLocation` if `location` does not name a file,
    /// `StoreError::EncodeError` if `value` cannot be encoded,
    /// `StoreError::IoError` if any filesystem step fails.
    pub fn write<T: Serialize>(
        &self,
        location: impl AsRef<Path>,
        value: &T,
    ) -> Result<(), StoreError> {
        let (path, file_name) = self.file_location(location.as_ref())?;

        let content = self
            .codec
            .encode(value)
            .map_err(|message| StoreError::EncodeError {
                path: path.clone(),
                message,
            })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut temp_name = file_name;
        temp_name.push(".tmp");
        let temp_file = path.with_file_name(temp_name);

        if let Err(e) = fs::write(&temp_file, &content) {
            cleanup_temp_file(&temp_file, &e);
            return Err(StoreError::IoError {
                path: temp_file,
                source: e,
            });
        }

        if let Err(e) = fs::rename(&temp_file, &path) {
            cleanup_temp_file(&temp_file, &e);
            return Err(StoreError::IoError { path, source: e });
        }

        tracing::info!(
            event = "core.store.write_completed",
            path = %path.display(),
            bytes = content.len()
        );

        Ok(())
    }

    /// Write with optional backup and validation, in that order.
    ///
    /// A backup or validation failure aborts before anything is written; a
    /// snapshot taken before a failed validation stays on disk. Returns the
    /// snapshot taken, if any.
    ///
    /// # Errors
    ///
    /// `StoreError::Backup`, `StoreError::Validation`, or any error from
    /// [`write`](Self::write).
    pub fn safe_write<T: Serialize + Validate>(
        &self,
        location: impl AsRef<Path>,
        value: &T,
        options: WriteOptions,
    ) -> Result<Option<Snapshot>, StoreError> {
        let location = location.as_ref();
        self.file_location(location)?;

        let snapshot = if options.backup {
            Some(self.create_backup()?)
        } else {
            None
        };

        if options.validate {
            value.validate_with(&self.validator).inspect_err(|e| {
                tracing::warn!(
                    event = "core.store.safe_write_rejected",
                    path = %self.location(location).display(),
                    error = %e
                );
            })?;
        }

        self.write(location, value)?;

        tracing::debug!(
            event = "core.store.safe_write_completed",
            path = %self.location(location).display(),
            backup = options.backup,
            validate = options.validate,
            force = options.force
        );

        Ok(snapshot)
    }

    /// Snapshot the whole configuration root.
    pub fn create_backup(&self) -> Result<Snapshot, StoreError> {
        Ok(backup::create_snapshot(&self.root)?)
    }

    /// Existing snapshots, oldest first.
    pub fn list_backups(&self) -> Result<Vec<Snapshot>, StoreError> {
        Ok(backup::list_snapshots(&self.root)?)
    }

    /// Whether the layer's file exists.
    pub fn layer_exists(&self, id: &LayerId) -> bool {
        self.resolve(id).exists()
    }

    /// Read a layer and stamp it with the identity it was loaded as.
    pub fn load_layer(&self, id: &LayerId) -> Result<Layer, StoreError> {
        let mut layer: Layer = self.read(self.resolve(id))?;
        stamp_identity(&mut layer, id);

        tracing::debug!(
            event = "core.store.layer_loaded",
            layer = %id
        );

        Ok(layer)
    }

    /// Save a layer under `id`, stamping kind and name to match.
    pub fn save_layer(
        &self,
        id: &LayerId,
        layer: &Layer,
        options: WriteOptions,
    ) -> Result<Option<Snapshot>, StoreError> {
        let mut layer = layer.clone();
        stamp_identity(&mut layer, id);
        self.safe_write(self.resolve(id), &layer, options)
    }

    /// Load `base` and each overlay in turn, composing them left to right.
    ///
    /// # Errors
    ///
    /// Any load error, or `StoreError::Validation` wrapping
    /// `LayerError::ConflictDetected` when two consecutive layers conflict.
    pub fn load_effective(&self, base: &LayerId, overlays: &[LayerId]) -> Result<Layer, StoreError> {
        let mut effective = self.load_layer(base)?;
        for id in overlays {
            let overlay = self.load_layer(id)?;
            effective = compose_layers(&effective, &overlay)?;
        }
        Ok(effective)
    }
}

fn stamp_identity(layer: &mut Layer, id: &LayerId) {
    layer.kind = id.kind();
    layer.name = id.name().map(str::to_string);
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if temp_file.exists()
        && let Err(cleanup_err) = fs::remove_file(temp_file)
    {
        tracing::warn!(
            event = "core.store.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after write error"
        );
    }
}
