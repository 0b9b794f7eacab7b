use crate::errors::{FoundryError, bullet_list};
use crate::layers::types::LayerKind;

/// A single reason a layer failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid {field}: '{value}' (valid options: {})", .allowed.join(", "))]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },
}

impl Violation {
    /// Dotted path of the offending field, e.g. `shell.type`.
    pub fn field(&self) -> &'static str {
        match self {
            Violation::MissingField { field } | Violation::InvalidEnum { field, .. } => *field,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Violation::MissingField { .. } => "MISSING_FIELD",
            Violation::InvalidEnum { .. } => "INVALID_ENUM",
        }
    }
}

/// A single incompatibility between two layers.
///
/// Environment conflicts name the key only; values are never echoed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Conflict {
    #[error("shell type mismatch: {left_kind}={left}, {right_kind}={right}")]
    ShellMismatch {
        left_kind: LayerKind,
        left: String,
        right_kind: LayerKind,
        right: String,
    },

    #[error("editor type mismatch: {left_kind}={left}, {right_kind}={right}")]
    EditorMismatch {
        left_kind: LayerKind,
        left: String,
        right_kind: LayerKind,
        right: String,
    },

    #[error("environment {key} has conflicting values")]
    Environment { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("Layer validation failed:\n{}", bullet_list(.violations))]
    ValidationFailed { violations: Vec<Violation> },

    #[error("{}", bullet_list(.conflicts))]
    ConflictDetected { conflicts: Vec<Conflict> },
}

impl LayerError {
    /// Violations carried by a validation failure; empty for other variants.
    pub fn violations(&self) -> &[Violation] {
        match self {
            LayerError::ValidationFailed { violations } => violations,
            LayerError::ConflictDetected { .. } => &[],
        }
    }
}

/// A layer kind string other than `personal`, `project` or `team`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown layer kind '{kind}'. Valid kinds: personal, project, team")]
pub struct UnknownLayerKind {
    pub kind: String,
}

impl FoundryError for UnknownLayerKind {
    fn error_code(&self) -> &'static str {
        "LAYER_UNKNOWN_KIND"
    }

    fn is_user_error(&self) -> bool {
        true
    }
}

impl FoundryError for LayerError {
    fn error_code(&self) -> &'static str {
        match self {
            LayerError::ValidationFailed { .. } => "LAYER_VALIDATION_FAILED",
            LayerError::ConflictDetected { .. } => "LAYER_CONFLICT_DETECTED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            LayerError::ValidationFailed { .. } | LayerError::ConflictDetected { .. } => true,
        }
    }
}
