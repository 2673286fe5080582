//! Trust-ledger submission types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{identity::Digest, report::VerificationReport};

/// The scalar fields of a report that the ledger records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSubmission {
    pub dataset_hash: Digest,
    pub verification_hash: Digest,
    pub is_verified: bool,
    pub quality_score: i32,
    pub analysis_report: String,
}

impl From<&VerificationReport> for LedgerSubmission {
    fn from(report: &VerificationReport) -> Self {
        Self {
            dataset_hash: report.dataset_hash,
            verification_hash: report.verification_hash,
            is_verified: report.is_verified,
            quality_score: report.quality_score,
            analysis_report: report.analysis_report.clone(),
        }
    }
}

/// Identifier the ledger assigns to an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proof that a submission was finalized on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub tx_id: TransactionId,
    pub dataset_hash: Digest,
    /// Block or sequence number, when the ledger reports one.
    pub block: Option<u64>,
    pub confirmed_at: DateTime<Utc>,
}

/// State of a submitted transaction as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Confirmed(LedgerReceipt),
}

/// Failures at the ledger boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger could not be reached or did not answer in time.
    #[error("ledger network error: {reason}")]
    Network { reason: String },

    /// The transaction could not be signed.
    #[error("ledger signing error: {reason}")]
    Signing { reason: String },

    /// The ledger refused the transaction.
    #[error("ledger rejected transaction: {reason}")]
    Rejected { reason: String },

    /// The transaction was accepted but not confirmed before the deadline.
    #[error("transaction {tx_id} not confirmed within {waited_ms} ms")]
    ConfirmationTimeout { tx_id: TransactionId, waited_ms: u64 },
}

impl LedgerError {
    /// True for failures where another attempt may succeed.
    ///
    /// Signing failures and rejections are deterministic for a given
    /// submission, so retrying them only repeats the error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Network { .. } | LedgerError::ConfirmationTimeout { .. })
    }
}
