//! The verification report: the terminal artifact of one run.
//!
//! Field names and nesting match the JSON shape the trust ledger and its
//! consumers expect (camelCase, `details.dataQuality`, …).

use serde::{Deserialize, Serialize};

use crate::{
    check::{BiasVerdict, QualityReport},
    identity::Digest,
};

/// A signed-off verification outcome for one dataset.
///
/// Created once per run by the report assembler and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Content identity of the dataset.
    pub dataset_hash: Digest,
    /// Seal over the quality and PII fields only.
    pub verification_hash: Digest,
    pub is_verified: bool,
    /// Always within the scoring policy's `[floor, 100]`.
    pub quality_score: i32,
    /// Pointer to the externally stored analysis artifact.
    pub analysis_report: String,
    pub details: ReportDetails,
}

/// The full check result set, as written into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetails {
    pub data_quality: QualityReport,
    pub pii_detected: bool,
    /// Either the claimed category or `"Unknown"`.
    pub relevance: String,
    pub is_duplicate: bool,
    pub bias: BiasVerdict,
}
