//! Metadata fields (`schema.element[.qualifier]`) and values

use std::fmt;

/// Schema of the reserved field that carries an item's entity type
pub const RELATIONSHIP_SCHEMA: &str = "relationship";

/// Element of the reserved field that carries an item's entity type
pub const RELATIONSHIP_TYPE_ELEMENT: &str = "type";

/// A metadata field key
///
/// Fields are written as `schema.element` or `schema.element.qualifier`.
/// An absent qualifier is `None`, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetadataField {
    /// Schema prefix, e.g. `dc`
    pub schema: String,

    /// Element, e.g. `title`
    pub element: String,

    /// Optional qualifier, e.g. `alternative`
    pub qualifier: Option<String>,
}

impl MetadataField {
    /// Create a field from its parts
    pub fn new(schema: &str, element: &str, qualifier: Option<&str>) -> Self {
        Self {
            schema: schema.to_string(),
            element: element.to_string(),
            qualifier: qualifier.map(str::to_string),
        }
    }

    /// The reserved `relationship.type` field
    pub fn relationship_type() -> Self {
        Self::new(RELATIONSHIP_SCHEMA, RELATIONSHIP_TYPE_ELEMENT, None)
    }

    /// Parse a dotted key into a field
    ///
    /// # Errors
    ///
    /// Returns an error if the key has fewer than two or more than three
    /// segments, or if any segment is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbevents_domain::MetadataField;
    ///
    /// let field = MetadataField::parse("dc.title.alternative").unwrap();
    /// assert_eq!(field.qualifier.as_deref(), Some("alternative"));
    /// assert!(MetadataField::parse("title").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self, String> {
        let segments: Vec<&str> = key.split('.').collect();

        if segments.len() < 2 {
            return Err(format!(
                "Metadata key '{}' must have the form schema.element[.qualifier]",
                key
            ));
        }
        if segments.len() > 3 {
            return Err(format!(
                "Metadata key '{}' has {} segments, at most 3 are allowed",
                key,
                segments.len()
            ));
        }
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(format!("Metadata key '{}' contains an empty segment", key));
        }

        Ok(Self::new(segments[0], segments[1], segments.get(2).copied()))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}.{}.{}", self.schema, self.element, qualifier),
            None => write!(f, "{}.{}", self.schema, self.element),
        }
    }
}

impl std::str::FromStr for MetadataField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a dotted key into `(schema, element, qualifier)`
///
/// A third segment becomes the qualifier; any further segments are ignored.
///
/// # Panics
///
/// Panics if `key` has fewer than two dot-separated segments. Validate
/// untrusted keys with [`MetadataField::parse`] instead.
pub fn split_metadata(key: &str) -> (String, String, Option<String>) {
    let mut segments = key.split('.');
    let schema = segments.next().unwrap_or_default().to_string();
    let element = match segments.next() {
        Some(element) => element.to_string(),
        None => panic!("metadata key '{}' has no element segment", key),
    };
    let qualifier = segments.next().map(str::to_string);
    (schema, element, qualifier)
}

/// A single metadata value on an item
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataValue {
    /// Field the value is stored under
    pub field: MetadataField,

    /// The value itself
    pub value: String,

    /// Position among the item's values for the same field
    pub place: u32,
}

impl MetadataValue {
    /// Create a new metadata value
    pub fn new(field: MetadataField, value: &str, place: u32) -> Self {
        Self {
            field,
            value: value.to_string(),
            place,
        }
    }
}
