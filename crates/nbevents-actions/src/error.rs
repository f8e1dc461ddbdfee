//! Error types for correction actions

use nbevents_domain::ItemId;
use thiserror::Error;

/// Errors that can occur while applying a correction
///
/// Configuration errors are permanent until an operator changes the
/// configuration; store errors may succeed on a later attempt.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Invalid action or topic configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured entity type does not exist
    #[error(
        "No entity type named {entity_type} was found. \
         Create the entity type or disable this topic in the notification broker configuration"
    )]
    MissingEntityType {
        /// Configured entity type label
        entity_type: String,
    },

    /// No relationship type matches the configured relation
    #[error(
        "No relationship type named {relation} was found for the entity type {entity_type}. \
         A proper configuration is required to use the entity metadata action. \
         If you don't manage {entity_type} entities in your repository, \
         disable this topic in the notification broker configuration"
    )]
    MissingRelationshipType {
        /// Configured relation (rightward type name)
        relation: String,
        /// Configured entity type label
        entity_type: String,
    },

    /// The source item cannot receive a new related item
    #[error("Item {0} has no owning collection")]
    MissingCollection(ItemId),

    /// No action is registered for the topic
    #[error("No action registered for topic {0}")]
    UnknownTopic(String),

    /// Storage layer error (persistence or authorization)
    #[error("Store error: {0}")]
    Store(String),
}

impl ActionError {
    /// Whether the error is caused by configuration rather than data or storage
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ActionError::Config(_)
                | ActionError::MissingEntityType { .. }
                | ActionError::MissingRelationshipType { .. }
                | ActionError::UnknownTopic(_)
        )
    }

    /// Whether retrying the same correction later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::Store(_))
    }
}

/// Wrap a store error
pub(crate) fn store_error<E: std::fmt::Display>(e: E) -> ActionError {
    ActionError::Store(e.to_string())
}
