//! Layer validation and conflict detection.
//!
//! Validation checks a single layer for required fields and allowed shell
//! and editor selections. Conflict detection compares two layers that are
//! about to be combined.
//!
//! Enum membership is checked case-insensitively (Unicode simple case
//! folding), while conflict detection
//! compares the stored strings exactly: `Zsh` is a valid shell, but a layer
//! with `Zsh` conflicts with one that has `zsh`.

use std::sync::{Arc, LazyLock};

use crate::layers::errors::{Conflict, LayerError, Violation};
use crate::layers::types::Layer;

/// Valid shell names.
pub const VALID_SHELLS: [&str; 3] = ["zsh", "bash", "fish"];

/// Valid editor names.
pub const VALID_EDITORS: [&str; 6] = ["nano", "vim", "nvim", "emacs", "neovim", "vscode"];

static BUILTIN_ALLOW_LISTS: LazyLock<Arc<AllowLists>> = LazyLock::new(|| {
    Arc::new(AllowLists::new(
        VALID_SHELLS.iter().copied(),
        VALID_EDITORS.iter().copied(),
    ))
});

/// `Ok(())` or every violation found, in field order.
pub type ValidationResult = Result<(), LayerError>;

/// Immutable sets of accepted shell and editor names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowLists {
    shells: Vec<String>,
    editors: Vec<String>,
}

impl AllowLists {
    pub fn new<S, E>(shells: S, editors: E) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            shells: shells.into_iter().map(Into::into).collect(),
            editors: editors.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in lists, created once per process.
    pub fn builtin() -> Arc<AllowLists> {
        Arc::clone(&BUILTIN_ALLOW_LISTS)
    }

    pub fn shells(&self) -> &[String] {
        &self.shells
    }

    pub fn editors(&self) -> &[String] {
        &self.editors
    }
}

/// Checks layers against a set of allow-lists.
#[derive(Debug, Clone)]
pub struct Validator {
    allow_lists: Arc<AllowLists>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(AllowLists::builtin())
    }
}

impl Validator {
    pub fn new(allow_lists: Arc<AllowLists>) -> Self {
        Self { allow_lists }
    }

    pub fn allow_lists(&self) -> &AllowLists {
        &self.allow_lists
    }

    /// Validate a single layer.
    ///
    /// All violations are collected (version, then shell, then editor)
    /// rather than stopping at the first one.
    ///
    /// # Errors
    ///
    /// Returns `LayerError::ValidationFailed` carrying every `MissingField`
    /// and `InvalidEnum` violation found.
    pub fn validate_layer(&self, layer: &Layer) -> ValidationResult {
        let mut violations = Vec::new();

        if layer.version.is_empty() {
            violations.push(Violation::MissingField { field: "version" });
        }

        if let Some(violation) = check_enum("shell.type", &layer.shell.kind, &self.allow_lists.shells)
        {
            violations.push(violation);
        }

        if let Some(violation) =
            check_enum("editor.type", &layer.editor.kind, &self.allow_lists.editors)
        {
            violations.push(violation);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                event = "core.layer.validation_failed",
                kind = %layer.kind,
                violation_count = violations.len()
            );
            Err(LayerError::ValidationFailed { violations })
        }
    }
}

fn check_enum(field: &'static str, value: &str, allowed: &[String]) -> Option<Violation> {
    if value.is_empty() {
        return Some(Violation::MissingField { field });
    }

    if allowed.iter().any(|candidate| eq_fold(candidate, value)) {
        None
    } else {
        Some(Violation::InvalidEnum {
            field,
            value: value.to_string(),
            allowed: allowed.to_vec(),
        })
    }
}

/// Case-insensitive comparison under Unicode simple case folding, so `ſ`
/// matches `s` and the Kelvin sign matches `k`. Characters whose case
/// mapping expands to several characters only match themselves.
fn eq_fold(a: &str, b: &str) -> bool {
    a.chars().map(fold_char).eq(b.chars().map(fold_char))
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    let upper = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => return c,
    };
    let mut lower = upper.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => upper,
    }
}

/// Capability of values the store can validate before writing.
pub trait Validate {
    fn validate_with(&self, validator: &Validator) -> ValidationResult;

    /// Validate against the built-in allow-lists.
    fn validate(&self) -> ValidationResult {
        self.validate_with(&Validator::default())
    }
}

impl Validate for Layer {
    fn validate_with(&self, validator: &Validator) -> ValidationResult {
        validator.validate_layer(self)
    }
}

/// Ordered conflicts between two layers. Empty means compatible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// `Ok(())` when compatible, otherwise `ConflictDetected` with the full list.
    pub fn into_result(self) -> Result<(), LayerError> {
        if self.conflicts.is_empty() {
            Ok(())
        } else {
            Err(LayerError::ConflictDetected {
                conflicts: self.conflicts,
            })
        }
    }
}

/// Compare two layers field by field.
///
/// Order: shell, editor, then environment keys in sorted key order. Only keys
/// present on both sides with different values are reported.
pub fn find_conflicts(left: &Layer, right: &Layer) -> ConflictReport {
    let mut conflicts = Vec::new();

    if left.shell.kind != right.shell.kind {
        conflicts.push(Conflict::ShellMismatch {
            left_kind: left.kind,
            left: left.shell.kind.clone(),
            right_kind: right.kind,
            right: right.shell.kind.clone(),
        });
    }

    if left.editor.kind != right.editor.kind {
        conflicts.push(Conflict::EditorMismatch {
            left_kind: left.kind,
            left: left.editor.kind.clone(),
            right_kind: right.kind,
            right: right.editor.kind.clone(),
        });
    }

    for (key, value) in &right.environment {
        if let Some(existing) = left.environment.get(key)
            && existing != value
        {
            conflicts.push(Conflict::Environment { key: key.clone() });
        }
    }

    ConflictReport { conflicts }
}

impl Layer {
    /// See [`find_conflicts`].
    pub fn find_conflicts(&self, other: &Layer) -> ConflictReport {
        find_conflicts(self, other)
    }
}
