//! nbevents Actions
//!
//! Corrections applied to repository items when the notification broker
//! reports an event about them.
//!
//! The crate provides:
//! - [`EntityMetadataAction`]: link an item to a related entity, creating
//!   and populating the entity from the event message when needed
//! - [`NbAction`]: the interface every correction action implements
//! - [`TopicRegistry`]: which action handles which broker topic
//! - [`apply_in_transaction`]: run a correction as one unit of work
//!
//! # Examples
//!
//! ```
//! use nbevents_actions::{apply_in_transaction, EntityMetadataAction, EntityMetadataConfig};
//! use nbevents_domain::{MessageDto, MessageField};
//! use nbevents_store::InMemoryStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = InMemoryStore::new();
//! let collection = store.create_collection("Publications");
//! let publication = store.create_entity_type("Publication");
//! let project = store.create_entity_type("Project");
//! store.create_relationship_type(&publication, &project, "isPublicationOfProject", "isProjectOfPublication");
//! let item = store.create_item(Some(collection));
//!
//! let action = EntityMetadataAction::new(EntityMetadataConfig {
//!     relation: "isProjectOfPublication".to_string(),
//!     entity_type: Some("Project".to_string()),
//!     entity_metadata: [("title".to_string(), "dc.title".to_string())].into(),
//! })?;
//!
//! let message = MessageDto::default().with(MessageField::Title, "Project X");
//! let outcome = apply_in_transaction(&mut store, |s| {
//!     action.apply_correction(s, &item, None, &message)
//! })?;
//!
//! assert_eq!(outcome.relationship.left_item, item.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Topics are bound to actions in TOML:
//!
//! ```toml
//! disabled_topics = ["ENRICH/MORE/PID"]
//!
//! [[topics]]
//! topic = "ENRICH/MORE/PROJECT"
//! action = "entity_metadata"
//! relation = "isProjectOfPublication"
//! entity_type = "Project"
//!
//! [topics.entity_metadata]
//! acronym = "oaire.acronym"
//! code = "oaire.awardNumber"
//! title = "dc.title"
//! ```

#![warn(missing_docs)]

mod action;
mod config;
mod entity_metadata;
mod error;
mod registry;
mod transaction;

pub use action::{CorrectionOutcome, NbAction};
pub use config::{ActionKind, ActionsConfig, ConfigError, EntityMetadataConfig, TopicConfig};
pub use entity_metadata::EntityMetadataAction;
pub use error::ActionError;
pub use registry::TopicRegistry;
pub use transaction::apply_in_transaction;
