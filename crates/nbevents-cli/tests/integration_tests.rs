//! Integration tests for the nbevents CLI commands

use nbevents_cli::cli::{AddItemArgs, ApplyArgs};
use nbevents_cli::commands::{execute_add_item, execute_apply};
use nbevents_cli::config::OutputFormat;
use nbevents_cli::{CliError, Config, Formatter};
use nbevents_domain::traits::{ItemService, RelationshipService};
use nbevents_domain::{Item, MetadataField};
use nbevents_store::SqliteStore;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"
[settings]
color = false
format = "quiet"

[actions]
disabled_topics = ["ENRICH/MORE/FUNDING"]

[[actions.topics]]
topic = "ENRICH/MORE/PROJECT"
action = "entity_metadata"
relation = "isProjectOfPublication"
entity_type = "Project"

[actions.topics.entity_metadata]
acronym = "oaire.acronym"
title = "dc.title"
"#;

fn setup(dir: &Path) -> (Config, SqliteStore, Item) {
    let config_path = dir.join("nbevents.toml");
    fs::write(&config_path, CONFIG).unwrap();
    let config = Config::load(Some(config_path.as_path())).unwrap();

    let mut store = SqliteStore::new(dir.join("repo.db")).unwrap();
    let collection = store.create_collection("Publications").unwrap();
    let publication = store.create_entity_type("Publication").unwrap();
    let project = store.create_entity_type("Project").unwrap();
    store
        .create_relationship_type(&publication, &project, "isPublicationOfProject", "isProjectOfPublication")
        .unwrap();
    let item = store.create_item(collection).unwrap();

    (config, store, item)
}

fn write_message(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("event.json");
    fs::write(&path, r#"{"acronym": "ACME", "title": "A Cooperative Metadata Effort"}"#).unwrap();
    path
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Quiet, false)
}

#[test]
fn test_apply_creates_and_links_project() {
    let dir = tempfile::tempdir().unwrap();
    let (config, mut store, item) = setup(dir.path());
    let message = write_message(dir.path());

    execute_apply(
        ApplyArgs {
            topic: "ENRICH/MORE/PROJECT".to_string(),
            item: item.id.to_string(),
            related: None,
            message,
        },
        &config,
        &mut store,
        &formatter(),
    )
    .unwrap();

    let relationships = store.find_relationships(item.id).unwrap();
    assert_eq!(relationships.len(), 1);
    let project = store
        .find_item(relationships[0].right_item)
        .unwrap()
        .unwrap();
    assert_eq!(project.entity_type(), Some("Project"));
    assert_eq!(
        project.first_value(&MetadataField::new("oaire", "acronym", None)),
        Some("ACME")
    );
}

#[test]
fn test_apply_disabled_topic_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (config, mut store, item) = setup(dir.path());
    let message = write_message(dir.path());

    execute_apply(
        ApplyArgs {
            topic: "ENRICH/MORE/FUNDING".to_string(),
            item: item.id.to_string(),
            related: None,
            message,
        },
        &config,
        &mut store,
        &formatter(),
    )
    .unwrap();

    assert!(store.find_relationships(item.id).unwrap().is_empty());
}

#[test]
fn test_apply_unknown_item() {
    let dir = tempfile::tempdir().unwrap();
    let (config, mut store, _) = setup(dir.path());
    let message = write_message(dir.path());

    let result = execute_apply(
        ApplyArgs {
            topic: "ENRICH/MORE/PROJECT".to_string(),
            item: nbevents_domain::ItemId::new().to_string(),
            related: None,
            message,
        },
        &config,
        &mut store,
        &formatter(),
    );

    assert!(matches!(result, Err(CliError::NotFound(_))));
}

#[test]
fn test_add_item_requires_known_entity_type() {
    let dir = tempfile::tempdir().unwrap();
    let (_, mut store, item) = setup(dir.path());
    let collection = item.owning_collection.unwrap();

    execute_add_item(
        AddItemArgs {
            collection: collection.to_string(),
            entity_type: Some("Publication".to_string()),
            metadata: vec!["dc.title=Linked Data".to_string()],
        },
        &mut store,
        &formatter(),
    )
    .unwrap();

    let result = execute_add_item(
        AddItemArgs {
            collection: collection.to_string(),
            entity_type: Some("Dataset".to_string()),
            metadata: Vec::new(),
        },
        &mut store,
        &formatter(),
    );
    assert!(matches!(result, Err(CliError::NotFound(_))));
}
