//! The interface every correction action implements

use crate::ActionError;
use nbevents_domain::{Item, MessageDto, Relationship};

/// What a correction changed
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    /// The relationship that was created
    pub relationship: Relationship,

    /// The related item, when the action had to create it
    pub created_item: Option<Item>,
}

/// A correction applied to an item when the broker reports an event
///
/// Actions are configured once and then invoked for each accepted event.
/// `item` is the repository item the event is about, `related_item` the
/// target entity when an earlier lookup already resolved it. Implementors
/// are generic over the store, usually bounded by
/// [`nbevents_domain::traits::Repository`].
pub trait NbAction<S> {
    /// Apply the correction described by `message`
    fn apply_correction(
        &self,
        store: &mut S,
        item: &Item,
        related_item: Option<&Item>,
        message: &MessageDto,
    ) -> Result<CorrectionOutcome, ActionError>;
}
