//! Configuration for correction actions
//!
//! Loaded from TOML. Each `[[topics]]` entry binds a broker topic to an
//! action; topics listed in `disabled_topics` are acknowledged and skipped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Configuration file error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Settings of the entity metadata action
///
/// # Examples
///
/// ```
/// use nbevents_actions::EntityMetadataConfig;
///
/// let config: EntityMetadataConfig = toml::from_str(r#"
///     relation = "isProjectOfPublication"
///     entity_type = "Project"
///
///     [entity_metadata]
///     acronym = "oaire.acronym"
///     title = "dc.title"
/// "#).unwrap();
///
/// assert_eq!(config.entity_metadata.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadataConfig {
    /// Rightward name of the relationship type to create
    pub relation: String,

    /// Entity type of the related item
    ///
    /// Needed to find the relationship type; when set it is also stamped
    /// on newly created items as `relationship.type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Message field name to target metadata key (`schema.element[.qualifier]`)
    #[serde(default)]
    pub entity_metadata: BTreeMap<String, String>,
}

/// Kinds of correction action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Link the item to a related entity, creating the entity when needed
    EntityMetadata,
}

/// One topic binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Broker topic, e.g. `ENRICH/MORE/PROJECT`
    pub topic: String,

    /// Action applied to events of this topic
    pub action: ActionKind,

    /// See [`EntityMetadataConfig::relation`]
    pub relation: String,

    /// See [`EntityMetadataConfig::entity_type`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// See [`EntityMetadataConfig::entity_metadata`]
    #[serde(default)]
    pub entity_metadata: BTreeMap<String, String>,
}

impl TopicConfig {
    /// Settings for the entity metadata action
    pub fn entity_metadata_config(&self) -> EntityMetadataConfig {
        EntityMetadataConfig {
            relation: self.relation.clone(),
            entity_type: self.entity_type.clone(),
            entity_metadata: self.entity_metadata.clone(),
        }
    }
}

/// Top-level actions configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// Topics that are acknowledged without applying any correction
    #[serde(default)]
    pub disabled_topics: Vec<String>,

    /// Topic bindings
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
}

impl ActionsConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
disabled_topics = ["ENRICH/MORE/PID"]

[[topics]]
topic = "ENRICH/MORE/PROJECT"
action = "entity_metadata"
relation = "isProjectOfPublication"
entity_type = "Project"

[topics.entity_metadata]
acronym = "oaire.acronym"
code = "oaire.awardNumber"
title = "dc.title"
"#;

    #[test]
    fn test_parse_sample() {
        let config = ActionsConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.disabled_topics, vec!["ENRICH/MORE/PID".to_string()]);
        assert_eq!(config.topics.len(), 1);

        let topic = &config.topics[0];
        assert_eq!(topic.action, ActionKind::EntityMetadata);
        assert_eq!(topic.entity_type.as_deref(), Some("Project"));
        assert_eq!(
            topic.entity_metadata.get("code").map(String::as_str),
            Some("oaire.awardNumber")
        );

        let action_config = topic.entity_metadata_config();
        assert_eq!(action_config.relation, "isProjectOfPublication");
        assert_eq!(action_config.entity_metadata.len(), 3);
    }

    #[test]
    fn test_empty_config() {
        let config = ActionsConfig::from_toml_str("").unwrap();
        assert_eq!(config, ActionsConfig::default());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = ActionsConfig::from_toml_str(
            r#"
[[topics]]
topic = "ENRICH/MISSING/ABSTRACT"
action = "simple_metadata"
relation = "x"
"#,
        );
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nbevents.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = ActionsConfig::from_file(&path).unwrap();
        assert_eq!(config.topics[0].topic, "ENRICH/MORE/PROJECT");

        let missing = ActionsConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ActionsConfig::from_toml_str(SAMPLE).unwrap();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: ActionsConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }
}
