//! Layer type definitions.
//!
//! A layer is one scope of environment configuration (personal, project or
//! team). All layer kinds share the same shape; layers are plain values that
//! are serialized to and from the configuration directory.
//!
//! # Example Layer
//!
//! ```toml
//! type = "project"
//! name = "web"
//! version = "1.0"
//!
//! [shell]
//! type = "zsh"
//!
//! [editor]
//! type = "nvim"
//!
//! [git]
//! enable = true
//!
//! [git.user]
//! name = "Ada"
//! email = "ada@example.com"
//!
//! [packages]
//! required = ["git", "curl"]
//! additional = []
//!
//! [tools]
//! go = ["gopls"]
//! node = []
//! python = ["ruff"]
//!
//! [environment]
//! EDITOR = "nvim"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::layers::errors::UnknownLayerKind;

/// Scope a layer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    Personal,
    Project,
    Team,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Personal => "personal",
            LayerKind::Project => "project",
            LayerKind::Team => "team",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = UnknownLayerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(LayerKind::Personal),
            "project" => Ok(LayerKind::Project),
            "team" => Ok(LayerKind::Team),
            other => Err(UnknownLayerKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// One configuration layer.
///
/// Field order matters for TOML: plain values are declared before tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Layer {
    /// Which scope this layer belongs to.
    #[serde(rename = "type", default)]
    pub kind: LayerKind,

    /// Project or team name. Not set for the personal layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version identifier of the layer format. Required.
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub shell: ShellConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub packages: PackagesConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    /// Free-form environment variables and settings.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// Shell selection. `type` must be one of the allowed shells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShellConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Editor selection. `type` must be one of the allowed editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Version-control identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub enable: bool,

    #[serde(default)]
    pub user: GitUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GitUser {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackagesConfig {
    /// Packages the environment cannot work without.
    #[serde(default)]
    pub required: Vec<String>,

    /// Nice-to-have packages.
    #[serde(default)]
    pub additional: Vec<String>,
}

/// Per-language tool lists, each versioned independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    #[serde(default)]
    pub go: Vec<String>,

    #[serde(default)]
    pub node: Vec<String>,

    #[serde(default)]
    pub python: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_kind_from_str() {
        assert_eq!("personal".parse::<LayerKind>().unwrap(), LayerKind::Personal);
        assert_eq!("project".parse::<LayerKind>().unwrap(), LayerKind::Project);
        assert_eq!("team".parse::<LayerKind>().unwrap(), LayerKind::Team);
    }

    #[test]
    fn test_layer_kind_unknown() {
        let err = "machine".parse::<LayerKind>().unwrap_err();
        assert_eq!(err.kind, "machine");
        assert_eq!(
            err.to_string(),
            "Unknown layer kind 'machine'. Valid kinds: personal, project, team"
        );
    }

    #[test]
    fn test_layer_toml_field_names() {
        let mut layer = Layer::new(LayerKind::Team);
        layer.name = Some("infra".to_string());
        layer.shell.kind = "zsh".to_string();

        let toml_str = toml::to_string(&layer).unwrap();
        assert!(toml_str.contains("type = \"team\""));
        assert!(toml_str.contains("name = \"infra\""));
        assert!(toml_str.contains("[shell]"));
        assert!(toml_str.contains("type = \"zsh\""));
    }

    #[test]
    fn test_layer_parses_partial_toml() {
        let layer: Layer = toml::from_str(
            r#"
version = "1"

[shell]
type = "fish"

[environment]
PAGER = "less"
"#,
        )
        .unwrap();

        assert_eq!(layer.kind, LayerKind::Personal);
        assert_eq!(layer.shell.kind, "fish");
        assert!(layer.editor.kind.is_empty());
        assert!(layer.packages.required.is_empty());
        assert_eq!(layer.environment.get("PAGER").map(String::as_str), Some("less"));
    }

    #[test]
    fn test_git_user_deserialize() {
        let git: GitConfig = toml::from_str(
            r#"
enable = true

[user]
name = "Ada"
email = "ada@example.com"
"#,
        )
        .unwrap();
        assert!(git.enable);
        assert_eq!(git.user.name, "Ada");
        assert_eq!(git.user.email, "ada@example.com");
    }
}
