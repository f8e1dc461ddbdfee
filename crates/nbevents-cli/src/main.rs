//! nbevents CLI - Apply notification broker corrections to a repository database.

use clap::Parser;
use nbevents_cli::commands;
use nbevents_cli::{Cli, Command, Config, Formatter};
use nbevents_store::SqliteStore;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> nbevents_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Init => commands::execute_init(&config.store.path, &formatter)?,
        Command::Topics => commands::execute_topics(&config, &formatter)?,
        cmd => {
            let mut store = SqliteStore::new(&config.store.path)?;

            match cmd {
                Command::AddCollection(args) => {
                    commands::execute_add_collection(args, &mut store, &formatter)?;
                }
                Command::AddEntityType(args) => {
                    commands::execute_add_entity_type(args, &mut store, &formatter)?;
                }
                Command::AddRelationshipType(args) => {
                    commands::execute_add_relationship_type(args, &mut store, &formatter)?;
                }
                Command::AddItem(args) => {
                    commands::execute_add_item(args, &mut store, &formatter)?;
                }
                Command::ShowItem(args) => {
                    commands::execute_show_item(args, &store, &formatter)?;
                }
                Command::Relationships(args) => {
                    commands::execute_relationships(args, &store, &formatter)?;
                }
                Command::Apply(args) => {
                    commands::execute_apply(args, &config, &mut store, &formatter)?;
                }
                Command::Init | Command::Topics => unreachable!(),
            }
        }
    }

    Ok(())
}
