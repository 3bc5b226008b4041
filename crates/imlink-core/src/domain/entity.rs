//! Organization entities extracted from affiliation text

use serde::{Deserialize, Serialize};

/// Span label produced by an organization tagger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Organization,
    Person,
    Location,
    Other(String),
}

impl EntityTag {
    /// Map common NER label spellings ("ORG", "B-ORG", "organization").
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().trim_start_matches("B-").trim_start_matches("I-");
        match label.to_ascii_lowercase().as_str() {
            "org" | "organization" | "organisation" => EntityTag::Organization,
            "per" | "person" => EntityTag::Person,
            "loc" | "location" | "gpe" => EntityTag::Location,
            _ => EntityTag::Other(label.to_string()),
        }
    }

    pub fn is_organization(&self) -> bool {
        matches!(self, EntityTag::Organization)
    }
}

/// A tagged span of one affiliation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan {
    pub text: String,
    pub tag: EntityTag,
}

impl TaggedSpan {
    pub fn organization(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: EntityTag::Organization,
        }
    }
}

/// Unvalidated organization span and the affiliation it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityCandidate {
    pub entity_text: String,
    pub source_affiliation: String,
}

/// An entity that fuzzily matched a configured organization.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntity {
    /// Raw span text
    pub entity_text: String,
    /// Normalized span text, used for substring search
    pub entity_key: String,
    /// Affiliations the entity was extracted from, first one used downstream
    pub source_affiliations: Vec<String>,
    pub matched_org: String,
    /// Partial-ratio score in [0, 1]
    pub score: f64,
}
