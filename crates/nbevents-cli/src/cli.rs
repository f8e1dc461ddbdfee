//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nbevents CLI - Apply notification broker corrections to a repository database.
#[derive(Debug, Parser)]
#[command(name = "nbevents")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NBEVENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database path (overrides the configuration file)
    #[arg(long, global = true, env = "NBEVENTS_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the database schema
    Init,

    /// Register a collection
    AddCollection(AddCollectionArgs),

    /// Register an entity type
    AddEntityType(AddEntityTypeArgs),

    /// Register a relationship type between two entity types
    AddRelationshipType(AddRelationshipTypeArgs),

    /// Create an archived item
    AddItem(AddItemArgs),

    /// Show an item and its metadata
    ShowItem(ItemArgs),

    /// List the relationships of an item
    Relationships(ItemArgs),

    /// List configured topics
    Topics,

    /// Apply a broker correction to an item
    Apply(ApplyArgs),
}

/// Arguments for the add-collection command.
#[derive(Debug, Parser)]
pub struct AddCollectionArgs {
    /// Collection name
    pub name: String,
}

/// Arguments for the add-entity-type command.
#[derive(Debug, Parser)]
pub struct AddEntityTypeArgs {
    /// Entity type label (e.g., Project)
    pub label: String,
}

/// Arguments for the add-relationship-type command.
#[derive(Debug, Parser)]
pub struct AddRelationshipTypeArgs {
    /// Entity type of the left item
    #[arg(long)]
    pub left: String,

    /// Entity type of the right item
    #[arg(long)]
    pub right: String,

    /// Name seen from the right item (e.g., isPublicationOfProject)
    #[arg(long)]
    pub leftward: String,

    /// Name seen from the left item (e.g., isProjectOfPublication)
    #[arg(long)]
    pub rightward: String,
}

/// Arguments for the add-item command.
#[derive(Debug, Parser)]
pub struct AddItemArgs {
    /// Owning collection ID
    #[arg(long)]
    pub collection: String,

    /// Entity type stamped as relationship.type
    #[arg(long)]
    pub entity_type: Option<String>,

    /// Metadata values as key=value (e.g., dc.title=My paper)
    #[arg(short, long = "metadata", value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,
}

/// Arguments naming a single item.
#[derive(Debug, Parser)]
pub struct ItemArgs {
    /// Item ID
    pub item: String,
}

/// Arguments for the apply command.
#[derive(Debug, Parser)]
pub struct ApplyArgs {
    /// Broker topic (e.g., ENRICH/MORE/PROJECT)
    #[arg(short, long)]
    pub topic: String,

    /// Item the event is about
    #[arg(short, long)]
    pub item: String,

    /// Already resolved related item
    #[arg(short, long)]
    pub related: Option<String>,

    /// JSON file with the event message ("-" for stdin)
    #[arg(short, long)]
    pub message: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "nbevents",
            "--db",
            "repo.db",
            "apply",
            "--topic",
            "ENRICH/MORE/PROJECT",
            "--item",
            "0191e0b0-0000-7000-8000-000000000000",
            "--message",
            "event.json",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("repo.db")));
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.topic, "ENRICH/MORE/PROJECT");
                assert!(args.related.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_item_metadata() {
        let cli = Cli::try_parse_from([
            "nbevents",
            "add-item",
            "--collection",
            "c",
            "-m",
            "dc.title=First",
            "-m",
            "dc.date.issued=2020",
        ])
        .unwrap();

        match cli.command {
            Command::AddItem(args) => assert_eq!(args.metadata.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
