//! Layer identity and its mapping to files under the configuration root.
//!
//! | Layer               | File                     |
//! |---------------------|--------------------------|
//! | `personal`          | `config.<ext>`           |
//! | `project`           | `project.<ext>`          |
//! | `project:<name>`    | `projects/<name>.<ext>`  |
//! | `team:<name>`       | `teams/<name>.<ext>`     |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::errors::StoreError;
use crate::layers::LayerKind;

pub const PERSONAL_FILE_STEM: &str = "config";
pub const PROJECT_FILE_STEM: &str = "project";
pub const PROJECTS_DIR: &str = "projects";
pub const TEAMS_DIR: &str = "teams";

/// Address of a layer: its kind plus a name where the kind needs one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerId {
    Personal,
    /// `None` is the default project layer.
    Project(Option<String>),
    Team(String),
}

impl LayerId {
    /// Build an identity from a kind and optional name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingName` for a team without a name,
    /// `StoreError::InvalidName` for a named personal layer or a name that
    /// is not a plain file stem.
    pub fn new(kind: LayerKind, name: Option<&str>) -> Result<Self, StoreError> {
        match (kind, name) {
            (LayerKind::Personal, None) => Ok(LayerId::Personal),
            (LayerKind::Personal, Some(name)) => Err(StoreError::InvalidName {
                name: name.to_string(),
                reason: "the personal layer has no name",
            }),
            (LayerKind::Project, None) => Ok(LayerId::Project(None)),
            (LayerKind::Project, Some(name)) => {
                validate_name(name)?;
                Ok(LayerId::Project(Some(name.to_string())))
            }
            (LayerKind::Team, None) => Err(StoreError::MissingName {
                kind: kind.to_string(),
            }),
            (LayerKind::Team, Some(name)) => {
                validate_name(name)?;
                Ok(LayerId::Team(name.to_string()))
            }
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerId::Personal => LayerKind::Personal,
            LayerId::Project(_) => LayerKind::Project,
            LayerId::Team(_) => LayerKind::Team,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LayerId::Personal | LayerId::Project(None) => None,
            LayerId::Project(Some(name)) | LayerId::Team(name) => Some(name.as_str()),
        }
    }

    /// File location relative to the configuration root.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        match self {
            LayerId::Personal => PathBuf::from(format!("{}.{}", PERSONAL_FILE_STEM, extension)),
            LayerId::Project(None) => {
                PathBuf::from(format!("{}.{}", PROJECT_FILE_STEM, extension))
            }
            LayerId::Project(Some(name)) => {
                PathBuf::from(PROJECTS_DIR).join(format!("{}.{}", name, extension))
            }
            LayerId::Team(name) => PathBuf::from(TEAMS_DIR).join(format!("{}.{}", name, extension)),
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}:{}", self.kind(), name),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Parses `personal`, `project`, `project:<name>` and `team:<name>`.
impl FromStr for LayerId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = match s.split_once(':') {
            Some((kind, name)) => (kind, Some(name)),
            None => (s, None),
        };
        LayerId::new(kind.parse()?, name)
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        "name cannot be empty"
    } else if name.starts_with('.') {
        "name cannot start with '.'"
    } else if name.contains(['/', '\\']) {
        "name cannot contain path separators"
    } else {
        return Ok(());
    };

    Err(StoreError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layer_ids() {
        assert_eq!("personal".parse::<LayerId>().unwrap(), LayerId::Personal);
        assert_eq!("project".parse::<LayerId>().unwrap(), LayerId::Project(None));
        assert_eq!(
            "project:web".parse::<LayerId>().unwrap(),
            LayerId::Project(Some("web".to_string()))
        );
        assert_eq!(
            "team:infra".parse::<LayerId>().unwrap(),
            LayerId::Team("infra".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_kind() {
        let result = "machine:x".parse::<LayerId>();
        assert!(matches!(
            result,
            Err(StoreError::UnknownKind { ref source }) if source.kind == "machine"
        ));
    }

    #[test]
    fn test_team_requires_name() {
        let result = "team".parse::<LayerId>();
        assert!(matches!(result, Err(StoreError::MissingName { .. })));
    }

    #[test]
    fn test_personal_rejects_name() {
        let result = LayerId::new(LayerKind::Personal, Some("me"));
        assert!(matches!(result, Err(StoreError::InvalidName { .. })));
    }

    #[test]
    fn test_names_cannot_escape_root() {
        for name in ["", "../etc", "a/b", "a\\b", ".hidden"] {
            let result = LayerId::new(LayerKind::Team, Some(name));
            assert!(
                matches!(result, Err(StoreError::InvalidName { .. })),
                "Name '{}' should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(LayerId::Personal.relative_path("toml"), PathBuf::from("config.toml"));
        assert_eq!(
            LayerId::Project(None).relative_path("toml"),
            PathBuf::from("project.toml")
        );
        assert_eq!(
            LayerId::Project(Some("web".to_string())).relative_path("json"),
            PathBuf::from("projects").join("web.json")
        );
        assert_eq!(
            LayerId::Team("infra".to_string()).relative_path("toml"),
            PathBuf::from("teams").join("infra.toml")
        );
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["personal", "project", "project:web", "team:infra"] {
            let id: LayerId = input.parse().unwrap();
            assert_eq!(id.to_string(), input);
        }
    }
}
