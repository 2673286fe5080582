//! Tunable check thresholds and scoring weights.
//!
//! These are plain data; `attest-config` deserializes them from TOML and the
//! checks and assembler read them. Defaults reproduce the reference
//! behaviour.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Thresholds and column designations used by the table checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckSettings {
    /// A dataset is only verified when it has strictly fewer missing cells.
    pub max_missing_values: u64,
    /// Columns exempt from the freeform-text type check.
    pub categorical_columns: Vec<String>,
    /// Column inspected by the bias check.
    pub demographic_column: String,
    /// Share above which a single value makes the column imbalanced.
    pub imbalance_threshold: f64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            max_missing_values: 10,
            categorical_columns: vec!["category".to_string()],
            demographic_column: "gender".to_string(),
            imbalance_threshold: 0.70,
        }
    }
}

/// Penalties subtracted from a perfect score of 100, and the score floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringPolicy {
    /// Lowest score a report may carry.
    pub floor: i32,
    pub pii_penalty: i32,
    pub relevance_penalty: i32,
    pub duplicate_penalty: i32,
    pub bias_penalty: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            floor: 0,
            pii_penalty: 10,
            relevance_penalty: 20,
            duplicate_penalty: 20,
            bias_penalty: 10,
        }
    }
}

/// Category label → column-name keywords.
///
/// Keywords are matched case-insensitively as substrings of column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryVocabulary(pub BTreeMap<String, Vec<String>>);

impl CategoryVocabulary {
    pub fn keywords(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for CategoryVocabulary {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            "Finance".to_string(),
            vec!["price".to_string(), "stock".to_string(), "date".to_string()],
        );
        map.insert(
            "Health".to_string(),
            vec!["patient".to_string(), "diagnosis".to_string(), "treatment".to_string()],
        );
        Self(map)
    }
}
