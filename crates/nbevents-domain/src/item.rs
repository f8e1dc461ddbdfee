//! Items, collections and workspace (draft) items

use std::fmt;

use crate::metadata::{MetadataField, MetadataValue};

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its hyphenated UUID form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid UUID string: {}", e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for an item (UUIDv7)
    ///
    /// # Examples
    ///
    /// ```
    /// use nbevents_domain::ItemId;
    ///
    /// let id = ItemId::new();
    /// let parsed = ItemId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    ItemId
);

uuid_identifier!(
    /// Unique identifier for a collection (UUIDv7)
    CollectionId
);

/// A repository record
///
/// Items are owned by at most one collection. Metadata values keep the
/// order in which they were added for each field.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,

    /// Collection the item was submitted to
    pub owning_collection: Option<CollectionId>,

    /// Whether the item has been installed into the archive
    pub in_archive: bool,

    /// Metadata values attached to the item
    pub metadata: Vec<MetadataValue>,

    /// Last modification timestamp (seconds since Unix epoch)
    pub last_modified: u64,
}

impl Item {
    /// Create an empty, not yet archived item
    pub fn new(id: ItemId, owning_collection: Option<CollectionId>) -> Self {
        Self {
            id,
            owning_collection,
            in_archive: false,
            metadata: Vec::new(),
            last_modified: 0,
        }
    }

    /// All values stored under `field`, in place order
    pub fn metadata_values(&self, field: &MetadataField) -> Vec<&str> {
        let mut values: Vec<&MetadataValue> =
            self.metadata.iter().filter(|m| &m.field == field).collect();
        values.sort_by_key(|m| m.place);
        values.into_iter().map(|m| m.value.as_str()).collect()
    }

    /// First value stored under `field`
    pub fn first_value(&self, field: &MetadataField) -> Option<&str> {
        self.metadata_values(field).into_iter().next()
    }

    /// The entity type stamped on the item, if any
    pub fn entity_type(&self) -> Option<&str> {
        self.first_value(&MetadataField::relationship_type())
    }
}

/// A draft item that has not been installed yet
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceItem {
    /// The draft item
    pub item: Item,

    /// Collection the draft will be installed into
    pub collection: CollectionId,
}
