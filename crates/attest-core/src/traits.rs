//! Trait seams between the verification pipeline and its collaborators.
//!
//! - `TableLoader`      — turns a file into a `Table`
//! - `CheckSuite`       — runs the table-only checks
//! - `EntityRecognizer` — named-entity recognition used by the PII check
//! - `HashRegistry`     — the seen-hash store behind authenticity
//! - `ArtifactStore`    — where the full analysis artifact is kept
//! - `LedgerClient`     — the external trust ledger
//!
//! The executor owns boxed or shared implementations of these and never
//! reaches past them.

use std::collections::HashSet;
use std::path::Path;

use attest_contracts::{
    check::TableFindings,
    entity::EntityLabel,
    error::AttestResult,
    identity::Digest,
    ledger::{LedgerError, LedgerSubmission, TransactionId, TransactionStatus},
    report::ReportDetails,
    table::{LoadedTable, Table},
};

/// Reads a dataset file into memory.
pub trait TableLoader: Send + Sync {
    /// Load the file at `path`.
    ///
    /// Returns `UnsupportedFormat` for unrecognised extensions and
    /// `MalformedInput` when the content cannot be parsed.
    fn load(&self, path: &Path) -> AttestResult<LoadedTable>;
}

/// The quality, PII, relevance, and bias checks.
///
/// Implementations must be deterministic for a given table and claim, and
/// must not touch the seen-hash registry.
pub trait CheckSuite: Send + Sync {
    fn run(&self, table: &Table, claimed_category: &str) -> AttestResult<TableFindings>;
}

/// Named-entity recognition over a single string.
///
/// This is the expensive unit of work in a PII scan; implementations are
/// free to cache.
pub trait EntityRecognizer: Send + Sync {
    /// Return every entity label found in `text`.
    ///
    /// Fails with `EntityRecognitionUnavailable` when the backing service
    /// cannot answer.
    fn detect_entities(&self, text: &str) -> AttestResult<HashSet<EntityLabel>>;
}

/// The process-wide (or persistent) set of dataset identities already seen.
///
/// The set only grows.
pub trait HashRegistry: Send + Sync {
    /// Atomically record `digest` and report whether it was new.
    ///
    /// Returns `true` iff the digest was absent before this call. Two
    /// concurrent calls with the same digest must not both return `true`.
    fn check_and_insert(&self, digest: &Digest) -> AttestResult<bool>;

    fn contains(&self, digest: &Digest) -> AttestResult<bool>;

    fn len(&self) -> AttestResult<usize>;

    fn is_empty(&self) -> AttestResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Persists the full analysis behind a report and returns a pointer to it.
pub trait ArtifactStore: Send + Sync {
    fn store(&self, dataset_hash: &Digest, details: &ReportDetails) -> AttestResult<String>;
}

/// The external append-only trust ledger.
pub trait LedgerClient: Send + Sync {
    /// Broadcast a submission. Returns once the ledger has accepted it, not
    /// once it is final.
    fn submit(&self, submission: &LedgerSubmission) -> Result<TransactionId, LedgerError>;

    /// Current status of a previously submitted transaction.
    fn status(&self, tx_id: &TransactionId) -> Result<TransactionStatus, LedgerError>;

    /// The transaction, pending or confirmed, that records `dataset_hash`.
    fn lookup(&self, dataset_hash: &Digest) -> Result<Option<TransactionId>, LedgerError>;
}
