//! foundry-core: Core library for layered environment configuration
//!
//! A developer's environment is described by layers (personal, project and
//! team) that are validated, checked for conflicts, merged into one effective
//! configuration and persisted with backups. This crate holds all of that
//! logic; the `foundry` CLI is a thin front end over it.
//!
//! # Main Entry Points
//!
//! - [`layers`] - Layer model, validation, conflict detection, merging
//! - [`store`] - Reading and writing layer files under a configuration root
//! - [`backup`] - Snapshot archives of the configuration root
//! - [`apply`] - Guarded hand-off of an effective layer to an applier
//! - [`config`] - Runtime configuration from the environment

pub mod apply;
pub mod backup;
pub mod config;
pub mod errors;
pub mod events;
pub mod layers;
pub mod logging;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use apply::{Applier, ApplyError, apply_layer};
pub use backup::{BackupError, Snapshot};
pub use config::Config;
pub use errors::FoundryError;
pub use layers::{
    Conflict, ConflictReport, Layer, LayerError, LayerKind, Validate, Validator, Violation,
    compose_layers, find_conflicts, merge_layers,
};
pub use store::{ConfigStore, LayerId, StoreError, WriteOptions};

// Re-export logging initialization
pub use logging::init_logging;
