//! Personally identifiable information scan.
//!
//! Two detectors run over every non-missing cell:
//!
//! 1. An email pattern, applied to the cell's text rendering.
//! 2. Named-entity recognition, applied to text cells, flagging people,
//!    locations and organisations.
//!
//! The pattern is tried first since it is cheap. The scan stops at the first
//! hit. Only text cells go to the recognizer; numeric and boolean cells carry
//! no names, so they are checked by the pattern alone. If the recognizer reports that it is unavailable, the rest of the
//! scan continues with the pattern alone and the result is marked degraded.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use attest_contracts::{
    check::{PiiDetector, PiiHit, PiiScan},
    error::{AttestError, AttestResult},
    table::Table,
};
use attest_core::traits::EntityRecognizer;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern is valid")
});

/// True if `text` contains something shaped like an email address.
pub fn contains_email(text: &str) -> bool {
    EMAIL.is_match(text)
}

/// Scans tables for PII using the email pattern and, when configured, an
/// entity recognizer.
#[derive(Clone, Default)]
pub struct PiiScanner {
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl PiiScanner {
    pub fn new(recognizer: Option<Arc<dyn EntityRecognizer>>) -> Self {
        Self { recognizer }
    }

    /// A scanner that only applies the email pattern.
    pub fn pattern_only() -> Self {
        Self { recognizer: None }
    }

    /// Scan `table` and report the first PII hit, if any.
    ///
    /// # Errors
    ///
    /// Recognizer failures other than `EntityRecognitionUnavailable` abort
    /// the scan.
    pub fn scan(&self, table: &Table) -> AttestResult<PiiScan> {
        let mut recognizer = self.recognizer.as_deref();
        let mut degraded = false;

        for (col, row, cell) in table.cells() {
            if cell.is_missing() {
                continue;
            }
            let column = &table.columns()[col].name;

            let text = cell.to_string();
            if contains_email(&text) {
                return Ok(PiiScan {
                    first_hit: Some(hit(column, row, PiiDetector::EmailPattern)),
                    degraded,
                });
            }

            let (Some(ner), Some(text)) = (recognizer, cell.as_text()) else {
                continue;
            };
            match ner.detect_entities(text) {
                Ok(labels) if labels.iter().any(|l| l.is_identifying()) => {
                    debug!(column = %column, row, ?labels, "identifying entity found");
                    return Ok(PiiScan {
                        first_hit: Some(hit(column, row, PiiDetector::NamedEntity)),
                        degraded,
                    });
                }
                Ok(_) => {}
                Err(AttestError::EntityRecognitionUnavailable { reason }) => {
                    warn!(%reason, column = %column, row, "entity recognition unavailable; continuing with email pattern only");
                    recognizer = None;
                    degraded = true;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(PiiScan { first_hit: None, degraded })
    }
}

fn hit(column: &str, row: usize, detector: PiiDetector) -> PiiHit {
    PiiHit { column: column.to_string(), row, detector }
}
