//! Messages delivered by the notification broker
//!
//! A message carries facts an external source asserts about a candidate
//! related entity, for example a funding project suggested for a
//! publication.

use std::fmt;

/// Named fields a message can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageField {
    /// Project acronym
    Acronym,

    /// Grant or award code
    Code,

    /// Funder name
    Funder,

    /// Funding programme
    FundingProgram,

    /// Funder jurisdiction
    Jurisdiction,

    /// OpenAIRE identifier of the entity
    OpenaireId,

    /// Entity title
    Title,
}

impl MessageField {
    /// Every known field
    pub const ALL: [MessageField; 7] = [
        MessageField::Acronym,
        MessageField::Code,
        MessageField::Funder,
        MessageField::FundingProgram,
        MessageField::Jurisdiction,
        MessageField::OpenaireId,
        MessageField::Title,
    ];

    /// Look a field up by its key name
    ///
    /// Returns `None` for any name outside the fixed set.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "acronym" => Some(MessageField::Acronym),
            "code" => Some(MessageField::Code),
            "funder" => Some(MessageField::Funder),
            "fundingProgram" => Some(MessageField::FundingProgram),
            "jurisdiction" => Some(MessageField::Jurisdiction),
            "openaireId" => Some(MessageField::OpenaireId),
            "title" => Some(MessageField::Title),
            _ => None,
        }
    }

    /// Key name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageField::Acronym => "acronym",
            MessageField::Code => "code",
            MessageField::Funder => "funder",
            MessageField::FundingProgram => "fundingProgram",
            MessageField::Jurisdiction => "jurisdiction",
            MessageField::OpenaireId => "openaireId",
            MessageField::Title => "title",
        }
    }
}

impl fmt::Display for MessageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about a candidate related entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MessageDto {
    /// Project acronym
    pub acronym: Option<String>,

    /// Grant or award code
    pub code: Option<String>,

    /// Funder name
    pub funder: Option<String>,

    /// Funding programme
    pub funding_program: Option<String>,

    /// Funder jurisdiction
    pub jurisdiction: Option<String>,

    /// OpenAIRE identifier of the entity
    pub openaire_id: Option<String>,

    /// Entity title
    pub title: Option<String>,
}

impl MessageDto {
    /// Value carried for `field`
    pub fn get(&self, field: MessageField) -> Option<&str> {
        let value = match field {
            MessageField::Acronym => &self.acronym,
            MessageField::Code => &self.code,
            MessageField::Funder => &self.funder,
            MessageField::FundingProgram => &self.funding_program,
            MessageField::Jurisdiction => &self.jurisdiction,
            MessageField::OpenaireId => &self.openaire_id,
            MessageField::Title => &self.title,
        };
        value.as_deref()
    }

    /// Value carried for the field named `key`
    ///
    /// Unknown keys resolve to `None`.
    pub fn value_for_key(&self, key: &str) -> Option<&str> {
        MessageField::from_key(key).and_then(|field| self.get(field))
    }

    /// Builder-style setter, mostly useful in tests
    pub fn with(mut self, field: MessageField, value: &str) -> Self {
        let slot = match field {
            MessageField::Acronym => &mut self.acronym,
            MessageField::Code => &mut self.code,
            MessageField::Funder => &mut self.funder,
            MessageField::FundingProgram => &mut self.funding_program,
            MessageField::Jurisdiction => &mut self.jurisdiction,
            MessageField::OpenaireId => &mut self.openaire_id,
            MessageField::Title => &mut self.title,
        };
        *slot = Some(value.to_string());
        self
    }
}
