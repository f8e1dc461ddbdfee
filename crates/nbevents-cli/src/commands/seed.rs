//! Commands that register repository records.

use crate::cli::{AddCollectionArgs, AddEntityTypeArgs, AddItemArgs, AddRelationshipTypeArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nbevents_domain::traits::{EntityTypeService, ItemService};
use nbevents_domain::{CollectionId, EntityType, MetadataField};
use nbevents_store::SqliteStore;

/// Execute the add-collection command.
pub fn execute_add_collection(
    args: AddCollectionArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let id = store.create_collection(&args.name)?;
    println!("{}", formatter.created("Collection", &id.to_string()));
    Ok(())
}

/// Execute the add-entity-type command.
pub fn execute_add_entity_type(
    args: AddEntityTypeArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let label = args.label.trim();
    if label.is_empty() {
        return Err(CliError::InvalidInput(
            "Entity type label cannot be empty".to_string(),
        ));
    }
    if store.find_entity_type(label)?.is_some() {
        return Err(CliError::InvalidInput(format!(
            "Entity type '{}' already exists",
            label
        )));
    }

    let entity_type = store.create_entity_type(label)?;
    println!(
        "{}",
        formatter.created("Entity type", &entity_type.id.0.to_string())
    );
    Ok(())
}

/// Execute the add-relationship-type command.
pub fn execute_add_relationship_type(
    args: AddRelationshipTypeArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let left = require_entity_type(store, &args.left)?;
    let right = require_entity_type(store, &args.right)?;

    let relationship_type =
        store.create_relationship_type(&left, &right, &args.leftward, &args.rightward)?;
    println!(
        "{}",
        formatter.created("Relationship type", &relationship_type.id.0.to_string())
    );
    Ok(())
}

/// Execute the add-item command.
pub fn execute_add_item(
    args: AddItemArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let collection: CollectionId = args.collection.trim().parse().map_err(|e| {
        CliError::InvalidInput(format!("Invalid collection ID '{}': {}", args.collection, e))
    })?;
    let metadata = args
        .metadata
        .iter()
        .map(|pair| parse_metadata_pair(pair))
        .collect::<Result<Vec<_>>>()?;

    let entity_type = args
        .entity_type
        .as_deref()
        .map(|label| require_entity_type(store, label))
        .transpose()?;

    let item = store.create_item(collection)?;
    if let Some(entity_type) = entity_type {
        store.add_metadata(item.id, &MetadataField::relationship_type(), &entity_type.label)?;
    }
    for (field, value) in &metadata {
        store.add_metadata(item.id, field, value)?;
    }

    println!("{}", formatter.created("Item", &item.id.to_string()));
    Ok(())
}

fn require_entity_type(store: &SqliteStore, label: &str) -> Result<EntityType> {
    store
        .find_entity_type(label)?
        .ok_or_else(|| CliError::NotFound(format!("entity type '{}'", label)))
}

/// Parse a metadata argument from "schema.element[.qualifier]=value".
fn parse_metadata_pair(input: &str) -> Result<(MetadataField, String)> {
    let (key, value) = input.split_once('=').ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Invalid metadata '{}'. Expected 'schema.element[.qualifier]=value'",
            input
        ))
    })?;
    let field = MetadataField::parse(key.trim()).map_err(CliError::InvalidInput)?;
    Ok((field, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_pair() {
        let (field, value) = parse_metadata_pair("dc.date.issued=2020-01-01").unwrap();
        assert_eq!(field, MetadataField::new("dc", "date", Some("issued")));
        assert_eq!(value, "2020-01-01");
    }

    #[test]
    fn test_parse_metadata_pair_keeps_equals_in_value() {
        let (_, value) = parse_metadata_pair("dc.title=a=b").unwrap();
        assert_eq!(value, "a=b");
    }

    #[test]
    fn test_parse_metadata_pair_invalid() {
        assert!(parse_metadata_pair("dc.title").is_err());
        assert!(parse_metadata_pair("title=x").is_err());
    }
}
