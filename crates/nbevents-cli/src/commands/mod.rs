//! Command implementations.

pub mod apply;
pub mod init;
pub mod seed;
pub mod show;
pub mod topics;

pub use self::apply::execute_apply;
pub use self::init::execute_init;
pub use self::seed::{
    execute_add_collection, execute_add_entity_type, execute_add_item,
    execute_add_relationship_type,
};
pub use self::show::{execute_relationships, execute_show_item};
pub use self::topics::execute_topics;

use crate::error::{CliError, Result};
use nbevents_domain::ItemId;

/// Parse an item ID argument.
pub(crate) fn parse_item_id(input: &str) -> Result<ItemId> {
    input
        .trim()
        .parse()
        .map_err(|e| CliError::InvalidInput(format!("Invalid item ID '{}': {}", input, e)))
}
