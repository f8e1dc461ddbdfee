//! Trait definitions for external interactions
//!
//! These traits define the boundaries between correction rules and the
//! storage that backs them. Infrastructure implementations live in other
//! crates (`nbevents-store`).
//!
//! Every capability trait shares the error type declared on
//! [`RepositoryStore`], so a rule can hold one store and one error type.

use crate::{
    CollectionId, EntityType, Item, ItemId, MetadataField, Relationship, RelationshipType,
    WorkspaceItem,
};

/// Base trait carrying the error type of a storage backend
pub trait RepositoryStore {
    /// Error type for store operations
    type Error;
}

/// Reading and writing items and their metadata
pub trait ItemService: RepositoryStore {
    /// Get an item by ID
    fn find_item(&self, id: ItemId) -> Result<Option<Item>, Self::Error>;

    /// Append a metadata value to an item
    ///
    /// The value takes the next place among the item's values for `field`.
    fn add_metadata(
        &mut self,
        item: ItemId,
        field: &MetadataField,
        value: &str,
    ) -> Result<(), Self::Error>;

    /// Persist the item's bookkeeping (modification timestamp)
    fn update_item(&mut self, item: &Item) -> Result<(), Self::Error>;
}

/// Creating draft items and installing them into the archive
pub trait InstallItemService: RepositoryStore {
    /// Create an empty draft item in `collection`
    fn create_workspace_item(
        &mut self,
        collection: CollectionId,
    ) -> Result<WorkspaceItem, Self::Error>;

    /// Install a draft into the archive, returning the archived item
    fn install_item(&mut self, workspace_item: WorkspaceItem) -> Result<Item, Self::Error>;
}

/// Looking up entity types
pub trait EntityTypeService: RepositoryStore {
    /// Find the entity type with the given label
    fn find_entity_type(&self, label: &str) -> Result<Option<EntityType>, Self::Error>;
}

/// Looking up relationship types
pub trait RelationshipTypeService: RepositoryStore {
    /// All relationship types with `entity_type` on either side, ordered by id
    fn find_relationship_types(
        &self,
        entity_type: &EntityType,
    ) -> Result<Vec<RelationshipType>, Self::Error>;
}

/// Creating relationships and allocating their places
pub trait RelationshipService: RepositoryStore {
    /// Next unused left place for relationships with `item` on the left
    fn next_left_place(&self, item: ItemId) -> Result<u32, Self::Error>;

    /// Next unused right place for relationships with `item` on the right
    fn next_right_place(&self, item: ItemId) -> Result<u32, Self::Error>;

    /// Create and persist a relationship
    fn create_relationship(
        &mut self,
        left_item: ItemId,
        right_item: ItemId,
        relationship_type: &RelationshipType,
        left_place: u32,
        right_place: u32,
    ) -> Result<Relationship, Self::Error>;

    /// Persist changes to an existing relationship
    fn update_relationship(&mut self, relationship: &Relationship) -> Result<(), Self::Error>;

    /// All relationships touching `item`, ordered by id
    fn find_relationships(&self, item: ItemId) -> Result<Vec<Relationship>, Self::Error>;
}

/// Transaction boundary supplied by the caller
pub trait UnitOfWork: RepositoryStore {
    /// Begin a transaction
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Commit the current transaction
    fn commit(&mut self) -> Result<(), Self::Error>;

    /// Roll back the current transaction
    fn rollback(&mut self) -> Result<(), Self::Error>;
}

/// Every capability a correction rule may need
pub trait Repository:
    ItemService + InstallItemService + EntityTypeService + RelationshipTypeService + RelationshipService
{
}

impl<T> Repository for T where
    T: ItemService
        + InstallItemService
        + EntityTypeService
        + RelationshipTypeService
        + RelationshipService
{
}
