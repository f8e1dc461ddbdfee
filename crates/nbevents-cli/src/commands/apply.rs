//! Apply command implementation.

use super::parse_item_id;
use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nbevents_actions::{apply_in_transaction, TopicRegistry};
use nbevents_domain::traits::ItemService;
use nbevents_domain::{Item, MessageDto};
use nbevents_store::SqliteStore;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Execute the apply command.
pub fn execute_apply(
    args: ApplyArgs,
    config: &Config,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let registry: TopicRegistry<SqliteStore> = TopicRegistry::from_config(&config.actions)?;
    let message = read_message(&args.message)?;

    let item = load_item(store, &args.item)?;
    let related = args
        .related
        .as_deref()
        .map(|id| load_item(store, id))
        .transpose()?;

    let outcome = apply_in_transaction(store, |s| {
        registry.dispatch(&args.topic, s, &item, related.as_ref(), &message)
    })?;

    println!("{}", formatter.format_outcome(&args.topic, outcome.as_ref())?);
    Ok(())
}

fn load_item(store: &SqliteStore, input: &str) -> Result<Item> {
    let id = parse_item_id(input)?;
    store
        .find_item(id)?
        .ok_or_else(|| CliError::NotFound(format!("item {}", id)))
}

/// Read an event message from a JSON file, or stdin for "-".
fn read_message(path: &Path) -> Result<MessageDto> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };

    parse_message(&contents)
}

fn parse_message(contents: &str) -> Result<MessageDto> {
    Ok(serde_json::from_str(contents)?)
}
