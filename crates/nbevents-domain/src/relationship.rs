//! Relationship module - ordered edges between two items

use crate::{ItemId, RelationshipTypeId};

/// Identifier of a persisted relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationshipId(pub u64);

/// A directional relationship between two items
///
/// `left_place` orders the relationship among all relationships that have
/// `left_item` on their left side; `right_place` does the same for
/// `right_item` on the right side. New relationships take the next unused
/// place on each side so existing edges keep their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique identifier
    pub id: RelationshipId,

    /// Item on the left side
    pub left_item: ItemId,

    /// Item on the right side
    pub right_item: ItemId,

    /// Type of relationship
    pub relationship_type: RelationshipTypeId,

    /// Position among `left_item`'s left-side relationships
    pub left_place: u32,

    /// Position among `right_item`'s right-side relationships
    pub right_place: u32,
}

impl Relationship {
    /// Whether `item` is on either side of the relationship
    pub fn touches(&self, item: ItemId) -> bool {
        self.left_item == item || self.right_item == item
    }
}

/// Next unused place given the places already taken on one side
///
/// Returns 0 when nothing is taken, otherwise one past the highest place.
pub fn next_place<I>(taken: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    taken.into_iter().max().map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_place_empty() {
        assert_eq!(next_place(Vec::new()), 0);
    }

    #[test]
    fn test_next_place_after_max() {
        assert_eq!(next_place(vec![0, 1, 2]), 3);
        // Gaps left by deleted relationships are not reused
        assert_eq!(next_place(vec![0, 4]), 5);
    }

    #[test]
    fn test_touches() {
        let left = ItemId::new();
        let right = ItemId::new();
        let rel = Relationship {
            id: RelationshipId(1),
            left_item: left,
            right_item: right,
            relationship_type: RelationshipTypeId(1),
            left_place: 0,
            right_place: 0,
        };

        assert!(rel.touches(left));
        assert!(rel.touches(right));
        assert!(!rel.touches(ItemId::new()));
    }
}
