//! Layer merge logic
//!
//! Combines a base layer and an overlay into one effective layer:
//! - Scalars (kind, name, version, shell, editor, git): overlay wins
//! - Lists: concatenate base then overlay, drop duplicates, keep first-seen order
//! - Environment: overlay entries kept, base entries added for missing keys

use std::collections::HashSet;

use crate::layers::errors::LayerError;
use crate::layers::types::Layer;
use crate::layers::validation::find_conflicts;

/// Merge `overlay` on top of `base`.
///
/// Inputs are not modified and no validation is performed; callers validate
/// inputs or the result explicitly.
pub fn merge_layers(base: &Layer, overlay: &Layer) -> Layer {
    let mut result = overlay.clone();

    result.packages.required = merge_lists(&base.packages.required, &overlay.packages.required);
    result.packages.additional =
        merge_lists(&base.packages.additional, &overlay.packages.additional);

    result.tools.go = merge_lists(&base.tools.go, &overlay.tools.go);
    result.tools.node = merge_lists(&base.tools.node, &overlay.tools.node);
    result.tools.python = merge_lists(&base.tools.python, &overlay.tools.python);

    for (key, value) in &base.environment {
        result
            .environment
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }

    result
}

/// Merge two layers only if they do not conflict.
///
/// # Errors
///
/// Returns `LayerError::ConflictDetected` listing every conflict between
/// `base` and `overlay`.
pub fn compose_layers(base: &Layer, overlay: &Layer) -> Result<Layer, LayerError> {
    find_conflicts(base, overlay).into_result()?;
    Ok(merge_layers(base, overlay))
}

/// Concatenate `a` then `b`, keeping only the first occurrence of each item.
pub fn merge_lists(a: &[String], b: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    a.iter()
        .chain(b)
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}
