//! nbevents Storage Layer
//!
//! Implements the collaborator traits from `nbevents_domain::traits`.
//!
//! # Backends
//!
//! - [`SqliteStore`]: persistent storage on SQLite. Place allocation is
//!   serialized through `BEGIN IMMEDIATE` transactions and unique indexes
//!   on `(item, place)` for each side of a relationship.
//! - [`InMemoryStore`]: a fake for tests, with snapshot transactions and a
//!   read-only switch that makes every write fail.
//!
//! # Examples
//!
//! ```no_run
//! use nbevents_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for item and relationship operations
//! ```

#![warn(missing_docs)]

mod memory;

pub use memory::InMemoryStore;

use nbevents_domain::traits::{
    EntityTypeService, InstallItemService, ItemService, RelationshipService,
    RelationshipTypeService, RepositoryStore, UnitOfWork,
};
use nbevents_domain::{
    next_place, CollectionId, EntityType, EntityTypeId, Item, ItemId, MetadataField,
    MetadataValue, Relationship, RelationshipId, RelationshipType, RelationshipTypeId,
    WorkspaceItem,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// How long a connection waits for another writer before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Write rejected because the store is read-only
    #[error("Write rejected: {0}")]
    ReadOnly(String),

    /// Transaction misuse (commit without begin, nested begin)
    #[error("Transaction error: {0}")]
    Transaction(String),
}

/// Current timestamp in seconds since Unix epoch
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// SQLite-based implementation of the collaborator traits
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should open its
/// own SqliteStore on the same database file; writers are serialized by
/// [`UnitOfWork::begin`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Register a collection
    pub fn create_collection(&mut self, name: &str) -> Result<CollectionId, StoreError> {
        let id = CollectionId::new();
        self.conn.execute(
            "INSERT INTO collections (id, name) VALUES (?1, ?2)",
            params![id_to_bytes(id.value()), name],
        )?;
        Ok(id)
    }

    /// Register an entity type
    pub fn create_entity_type(&mut self, label: &str) -> Result<EntityType, StoreError> {
        self.conn
            .execute("INSERT INTO entity_types (label) VALUES (?1)", params![label])?;
        let id = self.conn.last_insert_rowid() as u32;
        Ok(EntityType::new(EntityTypeId(id), label))
    }

    /// Register a relationship type between two entity types
    pub fn create_relationship_type(
        &mut self,
        left: &EntityType,
        right: &EntityType,
        leftward_type: &str,
        rightward_type: &str,
    ) -> Result<RelationshipType, StoreError> {
        self.conn.execute(
            "INSERT INTO relationship_types (left_type, right_type, leftward_type, rightward_type)
             VALUES (?1, ?2, ?3, ?4)",
            params![left.id.0, right.id.0, leftward_type, rightward_type],
        )?;
        let id = self.conn.last_insert_rowid() as u32;
        Ok(RelationshipType {
            id: RelationshipTypeId(id),
            left_type: left.id,
            right_type: right.id,
            leftward_type: leftward_type.to_string(),
            rightward_type: rightward_type.to_string(),
        })
    }

    /// Create an archived item directly in `collection`
    pub fn create_item(&mut self, collection: CollectionId) -> Result<Item, StoreError> {
        self.ensure_collection(collection)?;
        let mut item = Item::new(ItemId::new(), Some(collection));
        item.in_archive = true;
        item.last_modified = current_timestamp();
        self.conn.execute(
            "INSERT INTO items (id, owning_collection, in_archive, last_modified)
             VALUES (?1, ?2, 1, ?3)",
            params![
                id_to_bytes(item.id.value()),
                id_to_bytes(collection.value()),
                item.last_modified as i64,
            ],
        )?;
        Ok(item)
    }

    fn ensure_collection(&self, collection: CollectionId) -> Result<(), StoreError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM collections WHERE id = ?1",
                params![id_to_bytes(collection.value())],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("collection {}", collection)))
        }
    }

    fn load_metadata(&self, item: ItemId) -> Result<Vec<MetadataValue>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT schema_name, element, qualifier, value, place
             FROM metadata_values WHERE item_id = ?1 ORDER BY id",
        )?;

        let values = stmt
            .query_map(params![id_to_bytes(item.value())], |row| {
                let schema: String = row.get(0)?;
                let element: String = row.get(1)?;
                let qualifier: Option<String> = row.get(2)?;
                Ok(MetadataValue {
                    field: MetadataField::new(&schema, &element, qualifier.as_deref()),
                    value: row.get(3)?,
                    place: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(values)
    }

    fn next_place_where(&self, sql: &str, item: ItemId) -> Result<u32, StoreError> {
        let max: Option<u32> = self
            .conn
            .query_row(sql, params![id_to_bytes(item.value())], |row| row.get(0))?;
        Ok(next_place(max))
    }
}

/// Convert an identifier to bytes for storage
fn id_to_bytes(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Convert stored bytes back to an identifier
fn bytes_to_id(bytes: &[u8]) -> Result<u128, StoreError> {
    if bytes.len() != 16 {
        return Err(StoreError::InvalidData(format!(
            "Expected 16 bytes for an identifier, got {}",
            bytes.len()
        )));
    }
    let mut arr = [0u8; 16];
    arr.copy_from_slice(bytes);
    Ok(u128::from_be_bytes(arr))
}

/// Read a 16-byte identifier column inside a row mapper
fn column_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u128> {
    let bytes: Vec<u8> = row.get(idx)?;
    bytes_to_id(&bytes).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
    })
}

fn relationship_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Relationship> {
    Ok(Relationship {
        id: RelationshipId(row.get::<_, i64>(0)? as u64),
        left_item: ItemId::from_value(column_id(row, 1)?),
        right_item: ItemId::from_value(column_id(row, 2)?),
        relationship_type: RelationshipTypeId(row.get(3)?),
        left_place: row.get(4)?,
        right_place: row.get(5)?,
    })
}

impl RepositoryStore for SqliteStore {
    type Error = StoreError;
}

impl ItemService for SqliteStore {
    fn find_item(&self, id: ItemId) -> Result<Option<Item>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT owning_collection, in_archive, last_modified FROM items WHERE id = ?1",
                params![id_to_bytes(id.value())],
                |row| {
                    let collection: Option<Vec<u8>> = row.get(0)?;
                    let in_archive: bool = row.get(1)?;
                    let last_modified: i64 = row.get(2)?;
                    Ok((collection, in_archive, last_modified))
                },
            )
            .optional()?;

        let Some((collection, in_archive, last_modified)) = row else {
            return Ok(None);
        };

        let owning_collection = match collection {
            Some(bytes) => Some(CollectionId::from_value(bytes_to_id(&bytes)?)),
            None => None,
        };

        Ok(Some(Item {
            id,
            owning_collection,
            in_archive,
            metadata: self.load_metadata(id)?,
            last_modified: last_modified as u64,
        }))
    }

    fn add_metadata(
        &mut self,
        item: ItemId,
        field: &MetadataField,
        value: &str,
    ) -> Result<(), Self::Error> {
        let item_bytes = id_to_bytes(item.value());
        let max: Option<u32> = self.conn.query_row(
            "SELECT MAX(place) FROM metadata_values
             WHERE item_id = ?1 AND schema_name = ?2 AND element = ?3 AND qualifier IS ?4",
            params![&item_bytes, &field.schema, &field.element, &field.qualifier],
            |row| row.get(0),
        )?;

        let inserted = self.conn.execute(
            "INSERT INTO metadata_values (item_id, schema_name, element, qualifier, value, place)
             SELECT ?1, ?2, ?3, ?4, ?5, ?6 WHERE EXISTS (SELECT 1 FROM items WHERE id = ?1)",
            params![
                &item_bytes,
                &field.schema,
                &field.element,
                &field.qualifier,
                value,
                next_place(max),
            ],
        )?;

        if inserted == 0 {
            return Err(StoreError::NotFound(format!("item {}", item)));
        }
        Ok(())
    }

    fn update_item(&mut self, item: &Item) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE items SET last_modified = ?2 WHERE id = ?1",
            params![id_to_bytes(item.id.value()), current_timestamp() as i64],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("item {}", item.id)));
        }
        Ok(())
    }
}

impl InstallItemService for SqliteStore {
    fn create_workspace_item(
        &mut self,
        collection: CollectionId,
    ) -> Result<WorkspaceItem, Self::Error> {
        self.ensure_collection(collection)?;
        let item = Item::new(ItemId::new(), Some(collection));
        let item_bytes = id_to_bytes(item.id.value());
        let collection_bytes = id_to_bytes(collection.value());

        self.conn.execute(
            "INSERT INTO items (id, owning_collection, in_archive, last_modified)
             VALUES (?1, ?2, 0, 0)",
            params![&item_bytes, &collection_bytes],
        )?;
        self.conn.execute(
            "INSERT INTO workspace_items (item_id, collection_id) VALUES (?1, ?2)",
            params![&item_bytes, &collection_bytes],
        )?;

        Ok(WorkspaceItem { item, collection })
    }

    fn install_item(&mut self, workspace_item: WorkspaceItem) -> Result<Item, Self::Error> {
        let id = workspace_item.item.id;
        let item_bytes = id_to_bytes(id.value());

        let removed = self.conn.execute(
            "DELETE FROM workspace_items WHERE item_id = ?1",
            params![&item_bytes],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!("workspace item {}", id)));
        }

        self.conn.execute(
            "UPDATE items SET in_archive = 1, owning_collection = ?2, last_modified = ?3
             WHERE id = ?1",
            params![
                &item_bytes,
                id_to_bytes(workspace_item.collection.value()),
                current_timestamp() as i64,
            ],
        )?;

        self.find_item(id)?
            .ok_or_else(|| StoreError::NotFound(format!("item {}", id)))
    }
}

impl EntityTypeService for SqliteStore {
    fn find_entity_type(&self, label: &str) -> Result<Option<EntityType>, Self::Error> {
        let entity_type = self
            .conn
            .query_row(
                "SELECT id, label FROM entity_types WHERE label = ?1",
                params![label],
                |row| {
                    Ok(EntityType {
                        id: EntityTypeId(row.get(0)?),
                        label: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(entity_type)
    }
}

impl RelationshipTypeService for SqliteStore {
    fn find_relationship_types(
        &self,
        entity_type: &EntityType,
    ) -> Result<Vec<RelationshipType>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, left_type, right_type, leftward_type, rightward_type
             FROM relationship_types WHERE left_type = ?1 OR right_type = ?1 ORDER BY id",
        )?;

        let types = stmt
            .query_map(params![entity_type.id.0], |row| {
                Ok(RelationshipType {
                    id: RelationshipTypeId(row.get(0)?),
                    left_type: EntityTypeId(row.get(1)?),
                    right_type: EntityTypeId(row.get(2)?),
                    leftward_type: row.get(3)?,
                    rightward_type: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(types)
    }
}

impl RelationshipService for SqliteStore {
    fn next_left_place(&self, item: ItemId) -> Result<u32, Self::Error> {
        self.next_place_where(
            "SELECT MAX(left_place) FROM relationships WHERE left_item = ?1",
            item,
        )
    }

    fn next_right_place(&self, item: ItemId) -> Result<u32, Self::Error> {
        self.next_place_where(
            "SELECT MAX(right_place) FROM relationships WHERE right_item = ?1",
            item,
        )
    }

    fn create_relationship(
        &mut self,
        left_item: ItemId,
        right_item: ItemId,
        relationship_type: &RelationshipType,
        left_place: u32,
        right_place: u32,
    ) -> Result<Relationship, Self::Error> {
        self.conn.execute(
            "INSERT INTO relationships (left_item, right_item, relationship_type, left_place, right_place)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id_to_bytes(left_item.value()),
                id_to_bytes(right_item.value()),
                relationship_type.id.0,
                left_place,
                right_place,
            ],
        )?;

        Ok(Relationship {
            id: RelationshipId(self.conn.last_insert_rowid() as u64),
            left_item,
            right_item,
            relationship_type: relationship_type.id,
            left_place,
            right_place,
        })
    }

    fn update_relationship(&mut self, relationship: &Relationship) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE relationships SET left_place = ?2, right_place = ?3 WHERE id = ?1",
            params![
                relationship.id.0 as i64,
                relationship.left_place,
                relationship.right_place,
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!(
                "relationship {}",
                relationship.id.0
            )));
        }
        Ok(())
    }

    fn find_relationships(&self, item: ItemId) -> Result<Vec<Relationship>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, left_item, right_item, relationship_type, left_place, right_place
             FROM relationships WHERE left_item = ?1 OR right_item = ?1 ORDER BY id",
        )?;

        let relationships = stmt
            .query_map(params![id_to_bytes(item.value())], relationship_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(relationships)
    }
}

impl UnitOfWork for SqliteStore {
    fn begin(&mut self) -> Result<(), Self::Error> {
        if !self.conn.is_autocommit() {
            return Err(StoreError::Transaction(
                "a transaction is already open".to_string(),
            ));
        }
        // IMMEDIATE takes the write lock up front so place allocation and
        // insert cannot interleave with another writer.
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        tracing::debug!("Transaction started");
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        if self.conn.is_autocommit() {
            return Err(StoreError::Transaction("no open transaction".to_string()));
        }
        self.conn.execute_batch("COMMIT")?;
        tracing::debug!("Transaction committed");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), Self::Error> {
        if self.conn.is_autocommit() {
            return Err(StoreError::Transaction("no open transaction".to_string()));
        }
        self.conn.execute_batch("ROLLBACK")?;
        tracing::debug!("Transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_roundtrip() {
        let id = ItemId::new();
        let bytes = id_to_bytes(id.value());
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes_to_id(&bytes).unwrap(), id.value());
    }

    #[test]
    fn test_bytes_to_id_rejects_wrong_length() {
        assert!(matches!(
            bytes_to_id(&[1, 2, 3]),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_commit_without_begin() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        assert!(matches!(store.commit(), Err(StoreError::Transaction(_))));
        assert!(matches!(store.rollback(), Err(StoreError::Transaction(_))));
    }

    #[test]
    fn test_nested_begin_rejected() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.begin().unwrap();
        assert!(matches!(store.begin(), Err(StoreError::Transaction(_))));
        store.rollback().unwrap();
    }
}
