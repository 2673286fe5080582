//! Per-check result types.
//!
//! Every check produces one of these records. They are stateless per run and
//! independent of each other; the report assembler folds them into a single
//! decision.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Missing-value and type-consistency counts for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub missing_values: u64,
    pub incorrect_types: u64,
}

/// The label the relevance classifier reports when the claim is not
/// supported by any column name.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Outcome of matching column names against the claimed category's vocabulary.
///
/// The classifier only ever confirms or refutes the claim; it never infers a
/// different category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relevance {
    Confirmed(String),
    Unknown,
}

impl Relevance {
    /// The label written into the report.
    pub fn label(&self) -> &str {
        match self {
            Relevance::Confirmed(category) => category,
            Relevance::Unknown => UNKNOWN_CATEGORY,
        }
    }

    pub fn matches_claim(&self, claimed: &str) -> bool {
        self.label() == claimed
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Demographic balance of the designated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasVerdict {
    Balanced,
    Imbalanced,
}

impl fmt::Display for BiasVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiasVerdict::Balanced => f.write_str("Balanced"),
            BiasVerdict::Imbalanced => f.write_str("Imbalanced"),
        }
    }
}

/// Which PII detector fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PiiDetector {
    EmailPattern,
    NamedEntity,
}

/// Location of the first cell that triggered a PII detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiHit {
    pub column: String,
    pub row: usize,
    pub detector: PiiDetector,
}

/// Result of a PII scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PiiScan {
    /// The first hit, if any. The scan stops there.
    pub first_hit: Option<PiiHit>,
    /// True when entity recognition was unavailable for part or all of the
    /// scan and only the email pattern was applied.
    pub degraded: bool,
}

impl PiiScan {
    pub fn detected(&self) -> bool {
        self.first_hit.is_some()
    }
}

/// The table-only checks: everything except authenticity, which needs the
/// seen-hash registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFindings {
    pub quality: QualityReport,
    pub pii: PiiScan,
    pub relevance: Relevance,
    pub bias: BiasVerdict,
}

/// The full five-check result set handed to the report assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResults {
    pub quality: QualityReport,
    pub pii_detected: bool,
    pub relevance: Relevance,
    pub is_authentic: bool,
    pub bias: BiasVerdict,
}

impl CheckResults {
    pub fn from_findings(findings: TableFindings, is_authentic: bool) -> Self {
        Self {
            quality: findings.quality,
            pii_detected: findings.pii.detected(),
            relevance: findings.relevance,
            is_authentic,
            bias: findings.bias,
        }
    }
}
