//! nbevents Domain Layer
//!
//! Core model for applying notification-broker corrections to repository
//! items. The crate defines value objects and the trait interfaces every
//! storage backend implements; it carries no infrastructure.
//!
//! ## Key Concepts
//!
//! - **Item**: a repository record with metadata and an owning collection
//! - **Workspace item**: a draft item that is populated before installation
//! - **Entity type**: classification stamped on an item through `relationship.type`
//! - **Relationship type**: directional schema between a left and right entity type
//! - **Relationship**: ordered edge between two items with a place on each side
//! - **Message**: facts asserted by an external source about a candidate entity
//!
//! ## Architecture
//!
//! - Only `uuid` is a hard dependency; `serde` is opt-in through the `serde` feature
//! - Storage implementations live in `nbevents-store`
//! - Correction rules live in `nbevents-actions` and only see the traits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod item;
pub mod message;
pub mod metadata;
pub mod relationship;
pub mod traits;

// Re-exports for convenience
pub use entity::{EntityType, EntityTypeId, RelationshipType, RelationshipTypeId};
pub use item::{CollectionId, Item, ItemId, WorkspaceItem};
pub use message::{MessageDto, MessageField};
pub use metadata::{split_metadata, MetadataField, MetadataValue};
pub use relationship::{next_place, Relationship, RelationshipId};
