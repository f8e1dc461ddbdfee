//! Configuration management for the CLI.

use crate::error::Result;
use nbevents_actions::ActionsConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "nbevents.toml";

/// CLI configuration.
///
/// ```toml
/// [store]
/// path = "nbevents.db"
///
/// [settings]
/// color = true
/// format = "table"
///
/// [actions]
/// disabled_topics = ["ENRICH/MORE/PID"]
///
/// [[actions.topics]]
/// topic = "ENRICH/MORE/PROJECT"
/// action = "entity_metadata"
/// relation = "isProjectOfPublication"
/// entity_type = "Project"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database settings
    #[serde(default)]
    pub store: StoreSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Topic bindings
    #[serde(default)]
    pub actions: ActionsConfig,
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, `nbevents.toml` in the
    /// working directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            topics = config.actions.topics.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("nbevents.db")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.path, PathBuf::from("nbevents.db"));
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.actions.topics.is_empty());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nbevents.toml");
        fs::write(
            &path,
            r#"
[store]
path = "/var/lib/nbevents/repo.db"

[settings]
format = "json"

[actions]
disabled_topics = ["ENRICH/MORE/PID"]

[[actions.topics]]
topic = "ENRICH/MORE/PROJECT"
action = "entity_metadata"
relation = "isProjectOfPublication"
entity_type = "Project"

[actions.topics.entity_metadata]
title = "dc.title"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/nbevents/repo.db"));
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.actions.disabled_topics.len(), 1);
        assert_eq!(config.actions.topics[0].entity_metadata.len(), 1);
    }

    #[test]
    fn test_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(dir.path().join("absent.toml").as_path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
