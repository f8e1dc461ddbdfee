//! Integration tests for nbevents-actions against the SQLite store

use nbevents_actions::{
    apply_in_transaction, ActionError, ActionsConfig, EntityMetadataAction, EntityMetadataConfig,
    TopicRegistry,
};
use nbevents_domain::traits::{ItemService, RelationshipService};
use nbevents_domain::{CollectionId, Item, MessageDto, MessageField, MetadataField};
use nbevents_store::SqliteStore;
use std::collections::BTreeMap;
use std::path::Path;
use std::thread;

fn seed(store: &mut SqliteStore) -> (CollectionId, Item) {
    let collection = store.create_collection("Publications").unwrap();
    let publication = store.create_entity_type("Publication").unwrap();
    let project = store.create_entity_type("Project").unwrap();
    store
        .create_relationship_type(&publication, &project, "isPublicationOfProject", "isProjectOfPublication")
        .unwrap();
    let item = store.create_item(collection).unwrap();
    (collection, item)
}

fn project_action() -> EntityMetadataAction {
    let mut entity_metadata = BTreeMap::new();
    entity_metadata.insert("acronym".to_string(), "oaire.acronym".to_string());
    entity_metadata.insert("code".to_string(), "oaire.awardNumber".to_string());
    entity_metadata.insert("title".to_string(), "dc.title".to_string());
    entity_metadata.insert("fundingProgram".to_string(), "oaire.fundingStream".to_string());
    entity_metadata.insert("budget".to_string(), "oaire.budget".to_string());

    EntityMetadataAction::new(EntityMetadataConfig {
        relation: "isProjectOfPublication".to_string(),
        entity_type: Some("Project".to_string()),
        entity_metadata,
    })
    .unwrap()
}

fn message() -> MessageDto {
    MessageDto::default()
        .with(MessageField::Acronym, "ACME")
        .with(MessageField::Code, "123456")
        .with(MessageField::Title, "A Cooperative Metadata Effort")
        .with(MessageField::OpenaireId, "corda__h2020::123456")
}

#[test]
fn test_create_and_link_persists_item_and_relationship() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (collection, publication) = seed(&mut store);
    let action = project_action();

    let outcome = apply_in_transaction(&mut store, |s| {
        action.apply_correction(s, &publication, None, &message())
    })
    .unwrap();

    let created = outcome.created_item.unwrap();
    let project = store.find_item(created.id).unwrap().unwrap();
    assert!(project.in_archive);
    assert_eq!(project.owning_collection, Some(collection));
    assert_eq!(project.entity_type(), Some("Project"));
    assert_eq!(
        project.first_value(&MetadataField::parse("oaire.acronym").unwrap()),
        Some("ACME")
    );
    assert_eq!(
        project.first_value(&MetadataField::parse("dc.title").unwrap()),
        Some("A Cooperative Metadata Effort")
    );
    // Not in the message, and unknown keys never populate anything
    assert_eq!(
        project.first_value(&MetadataField::parse("oaire.fundingStream").unwrap()),
        None
    );
    assert_eq!(
        project.first_value(&MetadataField::parse("oaire.budget").unwrap()),
        None
    );

    let relationships = store.find_relationships(publication.id).unwrap();
    assert_eq!(relationships, vec![outcome.relationship]);
}

#[test]
fn test_link_existing_item() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (collection, publication) = seed(&mut store);
    let project = store.create_item(collection).unwrap();
    let action = project_action();

    let outcome = action
        .apply_correction(&mut store, &publication, Some(&project), &message())
        .unwrap();

    assert!(outcome.created_item.is_none());
    assert_eq!(outcome.relationship.right_item, project.id);
    assert!(store.find_item(project.id).unwrap().unwrap().metadata.is_empty());
}

#[test]
fn test_left_places_increase_across_corrections() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (_, publication) = seed(&mut store);
    let action = project_action();

    let mut left_places = Vec::new();
    for _ in 0..3 {
        let outcome = action
            .apply_correction(&mut store, &publication, None, &message())
            .unwrap();
        assert_eq!(outcome.relationship.right_place, 0);
        left_places.push(outcome.relationship.left_place);
    }

    assert_eq!(left_places, vec![0, 1, 2]);
}

#[test]
fn test_configuration_error_writes_nothing() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (_, publication) = seed(&mut store);
    let action = EntityMetadataAction::new(EntityMetadataConfig {
        relation: "isFundingOfPublication".to_string(),
        entity_type: Some("Project".to_string()),
        entity_metadata: BTreeMap::new(),
    })
    .unwrap();

    let err = action
        .apply_correction(&mut store, &publication, None, &message())
        .unwrap_err();

    assert!(err.is_configuration());
    let text = err.to_string();
    assert!(text.contains("isFundingOfPublication"));
    assert!(text.contains("Project"));
    assert_eq!(store.next_left_place(publication.id).unwrap(), 0);
}

#[test]
fn test_failed_transaction_discards_created_item() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (_, publication) = seed(&mut store);
    let action = project_action();
    let mut created = None;

    let result: Result<(), ActionError> = apply_in_transaction(&mut store, |s| {
        let outcome = action.apply_correction(s, &publication, None, &message())?;
        created = outcome.created_item.map(|i| i.id);
        Err(ActionError::Store("simulated failure after linking".to_string()))
    });

    assert!(result.is_err());
    let created = created.expect("the item was created before the failure");
    assert!(store.find_item(created).unwrap().is_none());
    assert!(store.find_relationships(publication.id).unwrap().is_empty());
}

#[test]
fn test_registry_dispatch_from_config() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (_, publication) = seed(&mut store);
    let config = ActionsConfig::from_toml_str(
        r#"
disabled_topics = ["ENRICH/MORE/FUNDING"]

[[topics]]
topic = "ENRICH/MORE/PROJECT"
action = "entity_metadata"
relation = "isProjectOfPublication"
entity_type = "Project"

[topics.entity_metadata]
title = "dc.title.alternative"
"#,
    )
    .unwrap();
    let registry: TopicRegistry<SqliteStore> = TopicRegistry::from_config(&config).unwrap();

    let outcome = registry
        .dispatch("ENRICH/MORE/PROJECT", &mut store, &publication, None, &message())
        .unwrap()
        .unwrap();
    let project = outcome.created_item.unwrap();
    assert_eq!(
        project.first_value(&MetadataField::new("dc", "title", Some("alternative"))),
        Some("A Cooperative Metadata Effort")
    );

    let skipped = registry
        .dispatch("ENRICH/MORE/FUNDING", &mut store, &publication, None, &message())
        .unwrap();
    assert!(skipped.is_none());
}

fn link_concurrently(path: &Path, publication: &Item, workers: usize) {
    // Open every connection before any writer starts
    let stores: Vec<SqliteStore> = (0..workers)
        .map(|_| SqliteStore::new(path).unwrap())
        .collect();

    let handles: Vec<_> = stores
        .into_iter()
        .map(|mut store| {
            let action = project_action();
            let publication = publication.clone();
            thread::spawn(move || {
                apply_in_transaction(&mut store, |s| {
                    action.apply_correction(s, &publication, None, &message())
                })
                .map(|outcome| outcome.relationship.left_place)
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
}

#[test]
fn test_concurrent_links_get_distinct_places() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nbevents.db");
    let mut store = SqliteStore::new(&path).unwrap();
    let (_, publication) = seed(&mut store);
    drop(store);

    let workers = 8;
    link_concurrently(&path, &publication, workers);

    let store = SqliteStore::new(&path).unwrap();
    let mut left_places: Vec<u32> = store
        .find_relationships(publication.id)
        .unwrap()
        .into_iter()
        .filter(|r| r.left_item == publication.id)
        .map(|r| r.left_place)
        .collect();
    left_places.sort_unstable();

    assert_eq!(left_places, (0..workers as u32).collect::<Vec<_>>());
}
