//! Topic registry: which action handles which broker topic

use crate::action::{CorrectionOutcome, NbAction};
use crate::config::{ActionKind, ActionsConfig};
use crate::{ActionError, EntityMetadataAction};
use nbevents_domain::traits::Repository;
use nbevents_domain::{Item, MessageDto};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use tracing::info;

/// Maps broker topics to correction actions
///
/// # Examples
///
/// ```
/// use nbevents_actions::{ActionsConfig, TopicRegistry};
/// use nbevents_store::InMemoryStore;
///
/// let config = ActionsConfig::from_toml_str(r#"
///     disabled_topics = ["ENRICH/MORE/PID"]
///
///     [[topics]]
///     topic = "ENRICH/MORE/PROJECT"
///     action = "entity_metadata"
///     relation = "isProjectOfPublication"
///     entity_type = "Project"
/// "#).unwrap();
///
/// let registry: TopicRegistry<InMemoryStore> = TopicRegistry::from_config(&config).unwrap();
/// assert!(registry.is_disabled("ENRICH/MORE/PID"));
/// assert_eq!(registry.topics(), vec!["ENRICH/MORE/PROJECT"]);
/// ```
pub struct TopicRegistry<S> {
    actions: BTreeMap<String, Box<dyn NbAction<S>>>,
    disabled: BTreeSet<String>,
}

impl<S> TopicRegistry<S>
where
    S: Repository + 'static,
    S::Error: Display,
{
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
            disabled: BTreeSet::new(),
        }
    }

    /// Build a registry from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Config`] if a topic is bound twice or an
    /// action's settings are invalid.
    pub fn from_config(config: &ActionsConfig) -> Result<Self, ActionError> {
        let mut registry = Self::new();

        for topic in &config.topics {
            if registry.actions.contains_key(&topic.topic) {
                return Err(ActionError::Config(format!(
                    "topic {} is configured more than once",
                    topic.topic
                )));
            }

            match topic.action {
                ActionKind::EntityMetadata => {
                    let action = EntityMetadataAction::new(topic.entity_metadata_config())
                        .map_err(|e| ActionError::Config(format!("topic {}: {}", topic.topic, e)))?;
                    registry.register(&topic.topic, action);
                }
            }
        }

        for topic in &config.disabled_topics {
            registry.disable(topic);
        }

        Ok(registry)
    }

    /// Bind `action` to `topic`, replacing any previous binding
    pub fn register<A>(&mut self, topic: &str, action: A)
    where
        A: NbAction<S> + 'static,
    {
        self.actions.insert(topic.to_string(), Box::new(action));
    }

    /// Acknowledge events of `topic` without applying a correction
    pub fn disable(&mut self, topic: &str) {
        self.disabled.insert(topic.to_string());
    }

    /// Whether `topic` is disabled
    pub fn is_disabled(&self, topic: &str) -> bool {
        self.disabled.contains(topic)
    }

    /// Topics with an active action, in name order
    pub fn topics(&self) -> Vec<&str> {
        self.actions
            .keys()
            .filter(|t| !self.disabled.contains(t.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Apply the action bound to `topic`
    ///
    /// Returns `Ok(None)` for a disabled topic; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownTopic`] if no action is bound to
    /// `topic`, or whatever the action itself fails with.
    pub fn dispatch(
        &self,
        topic: &str,
        store: &mut S,
        item: &Item,
        related_item: Option<&Item>,
        message: &MessageDto,
    ) -> Result<Option<CorrectionOutcome>, ActionError> {
        if self.is_disabled(topic) {
            info!(topic, item = %item.id, "Topic is disabled, skipping correction");
            return Ok(None);
        }

        let action = self
            .actions
            .get(topic)
            .ok_or_else(|| ActionError::UnknownTopic(topic.to_string()))?;

        action
            .apply_correction(store, item, related_item, message)
            .map(Some)
    }
}

impl<S> Default for TopicRegistry<S>
where
    S: Repository + 'static,
    S::Error: Display,
{
    fn default() -> Self {
        Self::new()
    }
}
