//! Link an item to a related entity, creating the entity when needed
//!
//! Used for broker topics that suggest a related entity for an item, such
//! as a funding project for a publication. When the event already
//! resolved the related item it is linked directly. Otherwise a new item
//! is created in the source item's collection, stamped with the configured
//! entity type, populated from the message and installed before linking.

use crate::action::{CorrectionOutcome, NbAction};
use crate::error::store_error;
use crate::{ActionError, EntityMetadataConfig};
use nbevents_domain::traits::Repository;
use nbevents_domain::{
    CollectionId, Item, MessageDto, MessageField, MetadataField, Relationship, RelationshipType,
};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Entity link/create action
///
/// # Examples
///
/// ```
/// use nbevents_actions::{EntityMetadataAction, EntityMetadataConfig};
/// use std::collections::BTreeMap;
///
/// let mut entity_metadata = BTreeMap::new();
/// entity_metadata.insert("title".to_string(), "dc.title".to_string());
///
/// let action = EntityMetadataAction::new(EntityMetadataConfig {
///     relation: "isProjectOfPublication".to_string(),
///     entity_type: Some("Project".to_string()),
///     entity_metadata,
/// })
/// .unwrap();
///
/// assert_eq!(action.relation(), "isProjectOfPublication");
/// ```
#[derive(Debug, Clone)]
pub struct EntityMetadataAction {
    relation: String,
    entity_type: Option<String>,
    mappings: Vec<(MessageField, MetadataField)>,
}

impl EntityMetadataAction {
    /// Create the action from its configuration
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Config`] if `relation` is blank or a target
    /// metadata key of a known message field is malformed. Keys that are
    /// not message fields are dropped with a warning; they can never
    /// resolve to a value.
    pub fn new(config: EntityMetadataConfig) -> Result<Self, ActionError> {
        let relation = config.relation.trim().to_string();
        if relation.is_empty() {
            return Err(ActionError::Config(
                "relation must not be blank".to_string(),
            ));
        }

        let entity_type = config
            .entity_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let mut mappings = Vec::with_capacity(config.entity_metadata.len());
        for (key, target) in &config.entity_metadata {
            let Some(field) = MessageField::from_key(key) else {
                warn!(key = %key, target = %target, "Ignoring unknown message field");
                continue;
            };
            let target = MetadataField::parse(target).map_err(|e| {
                ActionError::Config(format!("entity_metadata.{}: {}", key, e))
            })?;
            mappings.push((field, target));
        }

        Ok(Self {
            relation,
            entity_type,
            mappings,
        })
    }

    /// Rightward name of the relationship type this action creates
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Entity type of related items, if configured
    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    /// Message fields copied onto new items and their target fields
    pub fn mappings(&self) -> &[(MessageField, MetadataField)] {
        &self.mappings
    }

    /// Apply the correction
    ///
    /// The relationship type is resolved before anything is written, so a
    /// configuration error leaves the store untouched. A store failure
    /// after the related item was installed leaves that item in place;
    /// wrap the call in [`crate::apply_in_transaction`] to discard it.
    pub fn apply_correction<S>(
        &self,
        store: &mut S,
        item: &Item,
        related_item: Option<&Item>,
        message: &MessageDto,
    ) -> Result<CorrectionOutcome, ActionError>
    where
        S: Repository,
        S::Error: Display,
    {
        let relationship_type = self.resolve_relationship_type(store)?;

        let (related, created_item) = match related_item {
            Some(related) => (related.clone(), None),
            None => {
                let collection = item
                    .owning_collection
                    .ok_or(ActionError::MissingCollection(item.id))?;
                let created = self.create_related_item(store, collection, message)?;
                (created.clone(), Some(created))
            }
        };

        let relationship = self.link(store, item, &related, &relationship_type)?;

        Ok(CorrectionOutcome {
            relationship,
            created_item,
        })
    }

    /// Find the relationship type named by the configured relation
    ///
    /// When several types share the rightward name, the one with the
    /// lowest id wins.
    fn resolve_relationship_type<S>(&self, store: &S) -> Result<RelationshipType, ActionError>
    where
        S: Repository,
        S::Error: Display,
    {
        let label = self.entity_type.as_deref().ok_or_else(|| {
            ActionError::Config(format!(
                "entity_type is required to link items with relation {}",
                self.relation
            ))
        })?;

        let entity_type = store
            .find_entity_type(label)
            .map_err(store_error)?
            .ok_or_else(|| ActionError::MissingEntityType {
                entity_type: label.to_string(),
            })?;

        let matching: Vec<RelationshipType> = store
            .find_relationship_types(&entity_type)
            .map_err(store_error)?
            .into_iter()
            .filter(|t| t.rightward_type == self.relation)
            .collect();

        if matching.len() > 1 {
            warn!(
                relation = %self.relation,
                entity_type = %label,
                candidates = matching.len(),
                "Several relationship types match, using the first"
            );
        }

        matching
            .into_iter()
            .next()
            .ok_or_else(|| ActionError::MissingRelationshipType {
                relation: self.relation.clone(),
                entity_type: label.to_string(),
            })
    }

    /// Create, populate and install a new related item
    fn create_related_item<S>(
        &self,
        store: &mut S,
        collection: CollectionId,
        message: &MessageDto,
    ) -> Result<Item, ActionError>
    where
        S: Repository,
        S::Error: Display,
    {
        let workspace_item = store
            .create_workspace_item(collection)
            .map_err(store_error)?;
        let draft = workspace_item.item.id;

        if let Some(entity_type) = &self.entity_type {
            store
                .add_metadata(draft, &MetadataField::relationship_type(), entity_type)
                .map_err(store_error)?;
        }

        for (field, target) in &self.mappings {
            match message.get(*field).filter(|v| !v.trim().is_empty()) {
                Some(value) => {
                    store
                        .add_metadata(draft, target, value)
                        .map_err(store_error)?;
                }
                None => debug!(field = %field, "Message has no value for field, skipping"),
            }
        }

        let item = store.install_item(workspace_item).map_err(store_error)?;
        store.update_item(&item).map_err(store_error)?;

        info!(
            item = %item.id,
            collection = %collection,
            entity_type = self.entity_type.as_deref().unwrap_or("-"),
            "Created related item"
        );
        Ok(item)
    }

    /// Create the relationship `item` -> `related` at the next free places
    fn link<S>(
        &self,
        store: &mut S,
        item: &Item,
        related: &Item,
        relationship_type: &RelationshipType,
    ) -> Result<Relationship, ActionError>
    where
        S: Repository,
        S::Error: Display,
    {
        let left_place = store.next_left_place(item.id).map_err(store_error)?;
        let right_place = store.next_right_place(related.id).map_err(store_error)?;

        let relationship = store
            .create_relationship(item.id, related.id, relationship_type, left_place, right_place)
            .map_err(store_error)?;
        store
            .update_relationship(&relationship)
            .map_err(store_error)?;

        info!(
            left = %item.id,
            right = %related.id,
            relation = %self.relation,
            left_place,
            right_place,
            "Linked items"
        );
        Ok(relationship)
    }
}

impl<S> NbAction<S> for EntityMetadataAction
where
    S: Repository,
    S::Error: Display,
{
    fn apply_correction(
        &self,
        store: &mut S,
        item: &Item,
        related_item: Option<&Item>,
        message: &MessageDto,
    ) -> Result<CorrectionOutcome, ActionError> {
        EntityMetadataAction::apply_correction(self, store, item, related_item, message)
    }
}
