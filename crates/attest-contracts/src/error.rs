//! Error types for the attestation pipeline.
//!
//! All fallible operations return `AttestResult<T>`. Check-stage errors abort
//! a run; ledger errors carry the already-computed report so it can be
//! resubmitted.

use thiserror::Error;

use crate::{ledger::LedgerError, report::VerificationReport};

/// The unified error type for the attestation pipeline.
#[derive(Debug, Error)]
pub enum AttestError {
    /// The input file's extension is not one of csv, json, parquet.
    #[error("unsupported file format: '{extension}'")]
    UnsupportedFormat { extension: String },

    /// The loader could not read or parse the input.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// The named-entity recognition service failed or is unreachable.
    ///
    /// The PII detector recovers from this by falling back to pattern
    /// matching; it only reaches callers that use a recognizer directly.
    #[error("entity recognition unavailable: {reason}")]
    EntityRecognitionUnavailable { reason: String },

    /// Submitting to the trust ledger failed. The report is retained so the
    /// caller can resubmit it without re-running the checks.
    #[error("ledger submission failed after {attempts} attempt(s): {source}")]
    LedgerSubmissionFailed {
        #[source]
        source: LedgerError,
        attempts: u32,
        report: Box<VerificationReport>,
    },

    /// The seen-hash registry could not be read or written.
    #[error("hash registry error: {reason}")]
    RegistryError { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A report failed JSON Schema validation before submission.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the attestation crates.
pub type AttestResult<T> = Result<T, AttestError>;
