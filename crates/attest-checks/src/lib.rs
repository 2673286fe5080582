//! # attest-checks
//!
//! The table-only verification checks and the standard `CheckSuite`.
//!
//! | Check     | Module        | Output                       |
//! |-----------|---------------|------------------------------|
//! | Quality   | [`quality`]   | missing cells, freeform cols |
//! | PII       | [`pii`]       | first hit, degraded flag     |
//! | Relevance | [`relevance`] | claimed label or `Unknown`   |
//! | Bias      | [`bias`]      | `Balanced` / `Imbalanced`    |
//!
//! Authenticity is not here; it needs the seen-hash registry and is run by
//! the executor itself.

pub mod bias;
pub mod ner;
pub mod pii;
pub mod quality;
pub mod relevance;

use std::sync::Arc;

use tracing::debug;

use attest_contracts::{
    check::TableFindings,
    error::AttestResult,
    settings::{CategoryVocabulary, CheckSettings},
    table::Table,
};
use attest_core::traits::{CheckSuite, EntityRecognizer};

pub use ner::{CachingRecognizer, HttpEntityRecognizer};
pub use pii::PiiScanner;

/// The four table checks with their configured thresholds.
///
/// The PII scan is the slow one, so it runs on a scoped thread while the
/// other three run on the caller's thread.
pub struct StandardChecks {
    settings: CheckSettings,
    vocabulary: CategoryVocabulary,
    pii: PiiScanner,
}

impl StandardChecks {
    pub fn new(
        settings: CheckSettings,
        vocabulary: CategoryVocabulary,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
    ) -> Self {
        Self { settings, vocabulary, pii: PiiScanner::new(recognizer) }
    }
}

impl Default for StandardChecks {
    /// Default thresholds and vocabulary, email pattern only.
    fn default() -> Self {
        Self::new(CheckSettings::default(), CategoryVocabulary::default(), None)
    }
}

impl CheckSuite for StandardChecks {
    fn run(&self, table: &Table, claimed_category: &str) -> AttestResult<TableFindings> {
        std::thread::scope(|scope| {
            let pii = scope.spawn(|| self.pii.scan(table));

            let quality = quality::check_quality(table, &self.settings);
            let relevance = relevance::classify(table, claimed_category, &self.vocabulary);
            let bias = bias::detect_bias(table, &self.settings);

            let pii = pii.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;

            debug!(
                missing_values = quality.missing_values,
                incorrect_types = quality.incorrect_types,
                pii_detected = pii.detected(),
                relevance = %relevance,
                bias = %bias,
                "table checks complete"
            );

            Ok(TableFindings { quality, pii, relevance, bias })
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
