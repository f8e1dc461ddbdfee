//! In-memory implementation of the collaborator traits
//!
//! Meant for tests: state lives in ordinary collections, `begin` takes a
//! snapshot that `rollback` restores, and [`InMemoryStore::set_read_only`]
//! makes every write fail the way a rejected authorization would.

use crate::{current_timestamp, StoreError};
use nbevents_domain::traits::{
    EntityTypeService, InstallItemService, ItemService, RelationshipService,
    RelationshipTypeService, RepositoryStore, UnitOfWork,
};
use nbevents_domain::{
    next_place, CollectionId, EntityType, EntityTypeId, Item, ItemId, MetadataField,
    MetadataValue, Relationship, RelationshipId, RelationshipType, RelationshipTypeId,
    WorkspaceItem,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
struct State {
    collections: BTreeMap<CollectionId, String>,
    items: HashMap<ItemId, Item>,
    workspace: HashMap<ItemId, CollectionId>,
    entity_types: Vec<EntityType>,
    relationship_types: Vec<RelationshipType>,
    relationships: Vec<Relationship>,
    next_relationship_id: u64,
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: State,
    snapshot: Option<State>,
    read_only: bool,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject (or accept again) every write
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Register a collection
    pub fn create_collection(&mut self, name: &str) -> CollectionId {
        let id = CollectionId::new();
        self.state.collections.insert(id, name.to_string());
        id
    }

    /// Register an entity type
    pub fn create_entity_type(&mut self, label: &str) -> EntityType {
        let id = EntityTypeId(self.state.entity_types.len() as u32 + 1);
        let entity_type = EntityType::new(id, label);
        self.state.entity_types.push(entity_type.clone());
        entity_type
    }

    /// Register a relationship type between two entity types
    pub fn create_relationship_type(
        &mut self,
        left: &EntityType,
        right: &EntityType,
        leftward_type: &str,
        rightward_type: &str,
    ) -> RelationshipType {
        let rel_type = RelationshipType {
            id: RelationshipTypeId(self.state.relationship_types.len() as u32 + 1),
            left_type: left.id,
            right_type: right.id,
            leftward_type: leftward_type.to_string(),
            rightward_type: rightward_type.to_string(),
        };
        self.state.relationship_types.push(rel_type.clone());
        rel_type
    }

    /// Create an archived item, optionally without an owning collection
    pub fn create_item(&mut self, collection: Option<CollectionId>) -> Item {
        let mut item = Item::new(ItemId::new(), collection);
        item.in_archive = true;
        item.last_modified = current_timestamp();
        self.state.items.insert(item.id, item.clone());
        item
    }

    /// Number of items, drafts included
    pub fn item_count(&self) -> usize {
        self.state.items.len()
    }

    /// Number of relationships
    pub fn relationship_count(&self) -> usize {
        self.state.relationships.len()
    }

    /// Number of drafts that were never installed
    pub fn workspace_count(&self) -> usize {
        self.state.workspace.len()
    }

    fn check_writable(&self, operation: &str) -> Result<(), StoreError> {
        if self.read_only {
            Err(StoreError::ReadOnly(format!("{} is not authorized", operation)))
        } else {
            Ok(())
        }
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, StoreError> {
        self.state
            .items
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))
    }
}

impl RepositoryStore for InMemoryStore {
    type Error = StoreError;
}

impl ItemService for InMemoryStore {
    fn find_item(&self, id: ItemId) -> Result<Option<Item>, Self::Error> {
        Ok(self.state.items.get(&id).cloned())
    }

    fn add_metadata(
        &mut self,
        item: ItemId,
        field: &MetadataField,
        value: &str,
    ) -> Result<(), Self::Error> {
        self.check_writable("add metadata")?;
        let item = self.item_mut(item)?;
        let place = next_place(
            item.metadata
                .iter()
                .filter(|m| &m.field == field)
                .map(|m| m.place),
        );
        item.metadata
            .push(MetadataValue::new(field.clone(), value, place));
        Ok(())
    }

    fn update_item(&mut self, item: &Item) -> Result<(), Self::Error> {
        self.check_writable("update item")?;
        self.item_mut(item.id)?.last_modified = current_timestamp();
        Ok(())
    }
}

impl InstallItemService for InMemoryStore {
    fn create_workspace_item(
        &mut self,
        collection: CollectionId,
    ) -> Result<WorkspaceItem, Self::Error> {
        self.check_writable("create workspace item")?;
        if !self.state.collections.contains_key(&collection) {
            return Err(StoreError::NotFound(format!("collection {}", collection)));
        }

        let item = Item::new(ItemId::new(), Some(collection));
        self.state.items.insert(item.id, item.clone());
        self.state.workspace.insert(item.id, collection);
        Ok(WorkspaceItem { item, collection })
    }

    fn install_item(&mut self, workspace_item: WorkspaceItem) -> Result<Item, Self::Error> {
        self.check_writable("install item")?;
        let id = workspace_item.item.id;
        if self.state.workspace.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("workspace item {}", id)));
        }

        let item = self.item_mut(id)?;
        item.in_archive = true;
        item.owning_collection = Some(workspace_item.collection);
        item.last_modified = current_timestamp();
        Ok(item.clone())
    }
}

impl EntityTypeService for InMemoryStore {
    fn find_entity_type(&self, label: &str) -> Result<Option<EntityType>, Self::Error> {
        Ok(self
            .state
            .entity_types
            .iter()
            .find(|t| t.label == label)
            .cloned())
    }
}

impl RelationshipTypeService for InMemoryStore {
    fn find_relationship_types(
        &self,
        entity_type: &EntityType,
    ) -> Result<Vec<RelationshipType>, Self::Error> {
        Ok(self
            .state
            .relationship_types
            .iter()
            .filter(|t| t.involves(entity_type.id))
            .cloned()
            .collect())
    }
}

impl RelationshipService for InMemoryStore {
    fn next_left_place(&self, item: ItemId) -> Result<u32, Self::Error> {
        Ok(next_place(
            self.state
                .relationships
                .iter()
                .filter(|r| r.left_item == item)
                .map(|r| r.left_place),
        ))
    }

    fn next_right_place(&self, item: ItemId) -> Result<u32, Self::Error> {
        Ok(next_place(
            self.state
                .relationships
                .iter()
                .filter(|r| r.right_item == item)
                .map(|r| r.right_place),
        ))
    }

    fn create_relationship(
        &mut self,
        left_item: ItemId,
        right_item: ItemId,
        relationship_type: &RelationshipType,
        left_place: u32,
        right_place: u32,
    ) -> Result<Relationship, Self::Error> {
        self.check_writable("create relationship")?;
        for id in [left_item, right_item] {
            if !self.state.items.contains_key(&id) {
                return Err(StoreError::NotFound(format!("item {}", id)));
            }
        }

        let taken = self.state.relationships.iter().any(|r| {
            (r.left_item == left_item && r.left_place == left_place)
                || (r.right_item == right_item && r.right_place == right_place)
        });
        if taken {
            return Err(StoreError::InvalidData(format!(
                "place already taken (left {} on {}, right {} on {})",
                left_place, left_item, right_place, right_item
            )));
        }

        self.state.next_relationship_id += 1;
        let relationship = Relationship {
            id: RelationshipId(self.state.next_relationship_id),
            left_item,
            right_item,
            relationship_type: relationship_type.id,
            left_place,
            right_place,
        };
        self.state.relationships.push(relationship.clone());
        Ok(relationship)
    }

    fn update_relationship(&mut self, relationship: &Relationship) -> Result<(), Self::Error> {
        self.check_writable("update relationship")?;
        let stored = self
            .state
            .relationships
            .iter_mut()
            .find(|r| r.id == relationship.id)
            .ok_or_else(|| StoreError::NotFound(format!("relationship {}", relationship.id.0)))?;
        stored.left_place = relationship.left_place;
        stored.right_place = relationship.right_place;
        Ok(())
    }

    fn find_relationships(&self, item: ItemId) -> Result<Vec<Relationship>, Self::Error> {
        Ok(self
            .state
            .relationships
            .iter()
            .filter(|r| r.touches(item))
            .cloned()
            .collect())
    }
}

impl UnitOfWork for InMemoryStore {
    fn begin(&mut self) -> Result<(), Self::Error> {
        if self.snapshot.is_some() {
            return Err(StoreError::Transaction(
                "a transaction is already open".to_string(),
            ));
        }
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or_else(|| StoreError::Transaction("no open transaction".to_string()))
    }

    fn rollback(&mut self) -> Result<(), Self::Error> {
        let snapshot = self
            .snapshot
            .take()
            .ok_or_else(|| StoreError::Transaction("no open transaction".to_string()))?;
        self.state = snapshot;
        Ok(())
    }
}
