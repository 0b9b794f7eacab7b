//! Constructors and default values for layers.

use crate::layers::types::{Layer, LayerKind};

/// Layer format version written by [`Layer::scaffold`].
pub const DEFAULT_LAYER_VERSION: &str = "1";

impl Layer {
    /// An empty layer of the given kind. Not valid until version, shell
    /// and editor are filled in.
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// A minimal valid-shaped layer: kind, optional name, current version and
    /// the given shell and editor selections. Everything else is empty.
    pub fn scaffold(
        kind: LayerKind,
        name: Option<String>,
        shell: impl Into<String>,
        editor: impl Into<String>,
    ) -> Self {
        let mut layer = Self::new(kind);
        layer.name = name;
        layer.version = DEFAULT_LAYER_VERSION.to_string();
        layer.shell.kind = shell.into();
        layer.editor.kind = editor.into();
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_is_empty() {
        let layer = Layer::new(LayerKind::Project);
        assert_eq!(layer.kind, LayerKind::Project);
        assert!(layer.name.is_none());
        assert!(layer.version.is_empty());
        assert!(layer.shell.kind.is_empty());
        assert!(layer.environment.is_empty());
        assert!(layer.tools.go.is_empty());
    }

    #[test]
    fn test_scaffold() {
        let layer = Layer::scaffold(LayerKind::Team, Some("infra".to_string()), "bash", "vim");
        assert_eq!(layer.kind, LayerKind::Team);
        assert_eq!(layer.name.as_deref(), Some("infra"));
        assert_eq!(layer.version, DEFAULT_LAYER_VERSION);
        assert_eq!(layer.shell.kind, "bash");
        assert_eq!(layer.editor.kind, "vim");
        assert!(layer.packages.required.is_empty());
    }
}
