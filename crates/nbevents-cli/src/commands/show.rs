//! Commands that inspect items.

use super::parse_item_id;
use crate::cli::ItemArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nbevents_domain::traits::{ItemService, RelationshipService};
use nbevents_store::SqliteStore;

/// Execute the show-item command.
pub fn execute_show_item(args: ItemArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let id = parse_item_id(&args.item)?;
    let item = store
        .find_item(id)?
        .ok_or_else(|| CliError::NotFound(format!("item {}", id)))?;

    println!("{}", formatter.format_item(&item)?);
    Ok(())
}

/// Execute the relationships command.
pub fn execute_relationships(
    args: ItemArgs,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_item_id(&args.item)?;
    let relationships = store.find_relationships(id)?;

    println!("{}", formatter.format_relationships(&relationships)?);
    Ok(())
}
