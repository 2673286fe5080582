//! Named-entity labels returned by entity recognition services.

use serde::{Deserialize, Serialize};

/// An entity category recognised in a piece of text.
///
/// Only `Person`, `Location`, and `Organization` count as PII; every other
/// tag the recognizer emits is kept as `Other` so nothing is silently lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
    Location,
    Organization,
    Other(String),
}

impl EntityLabel {
    /// Map an NER tag to a label. Accepts spaCy's OntoNotes tags
    /// (`PERSON`, `GPE`, `LOC`, `ORG`) and the long forms.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "PERSON" | "PER" => EntityLabel::Person,
            "GPE" | "LOC" | "LOCATION" => EntityLabel::Location,
            "ORG" | "ORGANIZATION" => EntityLabel::Organization,
            other => EntityLabel::Other(other.to_string()),
        }
    }

    /// True for the entity kinds that identify a person, place, or organisation.
    pub fn is_identifying(&self) -> bool {
        matches!(
            self,
            EntityLabel::Person | EntityLabel::Location | EntityLabel::Organization
        )
    }
}
