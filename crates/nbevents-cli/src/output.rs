//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use nbevents_actions::CorrectionOutcome;
use nbevents_domain::{Item, Relationship};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an item with its metadata.
    pub fn format_item(&self, item: &Item) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&item_json(item))?),
            OutputFormat::Quiet => Ok(item.id.to_string()),
            OutputFormat::Table => {
                let mut out = format!(
                    "Item {} ({})\n",
                    item.id,
                    if item.in_archive { "archived" } else { "workspace" }
                );
                if item.metadata.is_empty() {
                    out.push_str(&self.colorize("No metadata.", "yellow"));
                    return Ok(out);
                }

                let mut builder = Builder::default();
                builder.push_record(["Field", "Value", "Place"]);
                for value in &item.metadata {
                    builder.push_record([
                        value.field.to_string(),
                        value.value.clone(),
                        value.place.to_string(),
                    ]);
                }
                out.push_str(&self.table(builder));
                Ok(out)
            }
        }
    }

    /// Format relationships.
    pub fn format_relationships(&self, relationships: &[Relationship]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> =
                    relationships.iter().map(relationship_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(relationships
                .iter()
                .map(|r| r.id.0.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if relationships.is_empty() {
                    return Ok(self.colorize("No relationships found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Left", "Right", "Type", "Left place", "Right place"]);
                for r in relationships {
                    builder.push_record([
                        r.id.0.to_string(),
                        r.left_item.to_string(),
                        r.right_item.to_string(),
                        r.relationship_type.0.to_string(),
                        r.left_place.to_string(),
                        r.right_place.to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format the result of a correction.
    pub fn format_outcome(&self, topic: &str, outcome: Option<&CorrectionOutcome>) -> Result<String> {
        let Some(outcome) = outcome else {
            return Ok(match self.format {
                OutputFormat::Json => serde_json::json!({ "topic": topic, "skipped": true }).to_string(),
                OutputFormat::Quiet => String::new(),
                OutputFormat::Table => self.warning(&format!("Topic {} is disabled, nothing applied", topic)),
            });
        };

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "topic": topic,
                "skipped": false,
                "relationship": relationship_json(&outcome.relationship),
                "created_item": outcome.created_item.as_ref().map(item_json),
            }))?),
            OutputFormat::Quiet => Ok(outcome.relationship.id.0.to_string()),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                if let Some(created) = &outcome.created_item {
                    lines.push(self.success(&format!("Created item {}", created.id)));
                }
                let r = &outcome.relationship;
                lines.push(self.success(&format!(
                    "Linked {} -> {} (left place {}, right place {})",
                    r.left_item, r.right_item, r.left_place, r.right_place
                )));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format topic bindings.
    pub fn format_topics(&self, active: &[&str], disabled: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "active": active,
                "disabled": disabled,
            }))?),
            OutputFormat::Quiet => Ok(active.join("\n")),
            OutputFormat::Table => {
                if active.is_empty() && disabled.is_empty() {
                    return Ok(self.colorize("No topics configured.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Topic", "Status"]);
                for topic in active {
                    builder.push_record([topic.to_string(), "active".to_string()]);
                }
                for topic in disabled {
                    builder.push_record([topic.clone(), "disabled".to_string()]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format the ID of a newly created record.
    pub fn created(&self, kind: &str, id: &str) -> String {
        match self.format {
            OutputFormat::Quiet => id.to_string(),
            OutputFormat::Json => serde_json::json!({ "kind": kind, "id": id }).to_string(),
            OutputFormat::Table => self.success(&format!("{} created: {}", kind, id)),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn item_json(item: &Item) -> serde_json::Value {
    let metadata: Vec<serde_json::Value> = item
        .metadata
        .iter()
        .map(|m| {
            serde_json::json!({
                "field": m.field.to_string(),
                "value": m.value,
                "place": m.place,
            })
        })
        .collect();

    serde_json::json!({
        "id": item.id.to_string(),
        "owning_collection": item.owning_collection.map(|c| c.to_string()),
        "in_archive": item.in_archive,
        "last_modified": item.last_modified,
        "metadata": metadata,
    })
}

fn relationship_json(r: &Relationship) -> serde_json::Value {
    serde_json::json!({
        "id": r.id.0,
        "left_item": r.left_item.to_string(),
        "right_item": r.right_item.to_string(),
        "relationship_type": r.relationship_type.0,
        "left_place": r.left_place,
        "right_place": r.right_place,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbevents_domain::{ItemId, MetadataField, MetadataValue, RelationshipId, RelationshipTypeId};

    fn test_item() -> Item {
        let mut item = Item::new(ItemId::new(), None);
        item.in_archive = true;
        item.metadata.push(MetadataValue::new(
            MetadataField::new("dc", "title", None),
            "A Cooperative Metadata Effort",
            0,
        ));
        item
    }

    fn test_relationship() -> Relationship {
        Relationship {
            id: RelationshipId(7),
            left_item: ItemId::new(),
            right_item: ItemId::new(),
            relationship_type: RelationshipTypeId(1),
            left_place: 2,
            right_place: 0,
        }
    }

    #[test]
    fn test_item_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_item(&test_item()).unwrap();
        assert!(output.contains("dc.title"));
        assert!(output.contains("in_archive"));
    }

    #[test]
    fn test_item_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_item(&test_item()).unwrap();
        assert!(output.contains("Field"));
        assert!(output.contains("archived"));
    }

    #[test]
    fn test_relationships_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_relationships(&[test_relationship()])
            .unwrap();
        assert_eq!(output, "7");
    }

    #[test]
    fn test_empty_relationships() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_relationships(&[]).unwrap();
        assert!(output.contains("No relationships found"));
    }

    #[test]
    fn test_skipped_outcome() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_outcome("ENRICH/MORE/PID", None).unwrap();
        assert!(output.contains("disabled"));
    }

    #[test]
    fn test_outcome_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let outcome = CorrectionOutcome {
            relationship: test_relationship(),
            created_item: Some(test_item()),
        };
        let output = formatter
            .format_outcome("ENRICH/MORE/PROJECT", Some(&outcome))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["relationship"]["left_place"], 2);
        assert_eq!(value["skipped"], false);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
