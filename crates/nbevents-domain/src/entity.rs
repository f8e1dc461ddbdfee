//! Entity types and the relationship types that connect them

/// Identifier of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityTypeId(pub u32);

/// Identifier of a relationship type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationshipTypeId(pub u32);

/// Classification attached to an item, e.g. `Publication` or `Project`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityType {
    /// Unique identifier
    pub id: EntityTypeId,

    /// Label, matched against the `relationship.type` metadata value
    pub label: String,
}

impl EntityType {
    /// Create a new entity type
    pub fn new(id: EntityTypeId, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
        }
    }
}

/// Directional schema linking a left entity type to a right entity type
///
/// A relationship type is named from both ends: `leftward_type` is read
/// from the right item towards the left, `rightward_type` from the left
/// item towards the right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipType {
    /// Unique identifier
    pub id: RelationshipTypeId,

    /// Entity type of the left item
    pub left_type: EntityTypeId,

    /// Entity type of the right item
    pub right_type: EntityTypeId,

    /// Name seen from the right item, e.g. `isPublicationOfProject`
    pub leftward_type: String,

    /// Name seen from the left item, e.g. `isProjectOfPublication`
    pub rightward_type: String,
}

impl RelationshipType {
    /// Whether `entity_type` sits on either end of this type
    pub fn involves(&self, entity_type: EntityTypeId) -> bool {
        self.left_type == entity_type || self.right_type == entity_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves_either_side() {
        let rel_type = RelationshipType {
            id: RelationshipTypeId(1),
            left_type: EntityTypeId(1),
            right_type: EntityTypeId(2),
            leftward_type: "isPublicationOfProject".to_string(),
            rightward_type: "isProjectOfPublication".to_string(),
        };

        assert!(rel_type.involves(EntityTypeId(1)));
        assert!(rel_type.involves(EntityTypeId(2)));
        assert!(!rel_type.involves(EntityTypeId(3)));
    }
}
