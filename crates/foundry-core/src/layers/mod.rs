//! # Layers
//!
//! Typed configuration layers and the operations on them.
//!
//! A machine's effective configuration is built from three scopes:
//! 1. **Personal** - `config.toml`, the user's own preferences
//! 2. **Team** - `teams/<name>.toml`, shared defaults for a team
//! 3. **Project** - `project.toml` or `projects/<name>.toml`
//!
//! Layers are validated on their own with [`Validator`], checked pairwise
//! with [`find_conflicts`], and combined with [`merge_layers`] (or
//! [`compose_layers`], which refuses to merge conflicting layers).
//!
//! ```rust
//! use foundry_core::layers::{Layer, LayerKind, Validate, compose_layers};
//!
//! let personal = Layer::scaffold(LayerKind::Personal, None, "zsh", "nvim");
//! let project = Layer::scaffold(LayerKind::Project, Some("web".into()), "zsh", "nvim");
//!
//! personal.validate().unwrap();
//! let effective = compose_layers(&personal, &project).unwrap();
//! assert_eq!(effective.name.as_deref(), Some("web"));
//! ```

pub mod defaults;
pub mod errors;
pub mod merge;
pub mod types;
pub mod validation;

pub use defaults::DEFAULT_LAYER_VERSION;
pub use errors::{Conflict, LayerError, UnknownLayerKind, Violation};
pub use merge::{compose_layers, merge_layers, merge_lists};
pub use types::{
    EditorConfig, GitConfig, GitUser, Layer, LayerKind, PackagesConfig, ShellConfig, ToolsConfig,
};
pub use validation::{
    AllowLists, ConflictReport, VALID_EDITORS, VALID_SHELLS, Validate, ValidationResult, Validator,
    find_conflicts,
};
