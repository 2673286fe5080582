//! Delivers verification reports to the trust ledger.
//!
//! One `submit` call:
//!
//!   Validate → [ Lookup → Submit → Await confirmation ] × attempts
//!
//! The lookup by dataset hash runs before every attempt, so a submission
//! whose response was lost is picked up rather than sent twice. Only
//! retryable ledger errors trigger another attempt; backoff doubles from
//! `initial_backoff` up to `max_backoff`.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use attest_contracts::{
    error::{AttestError, AttestResult},
    ledger::{LedgerError, LedgerReceipt, LedgerSubmission, TransactionId, TransactionStatus},
    report::VerificationReport,
};
use attest_core::traits::LedgerClient;

use crate::schema::ReportSchema;

/// Attempt, backoff and confirmation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            confirmation_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Submits reports through a `LedgerClient` with validation, retry and
/// idempotency.
pub struct LedgerSubmitter {
    client: Arc<dyn LedgerClient>,
    schema: ReportSchema,
    policy: RetryPolicy,
}

impl LedgerSubmitter {
    /// Build a submitter using the bundled report schema.
    pub fn new(client: Arc<dyn LedgerClient>, policy: RetryPolicy) -> AttestResult<Self> {
        Ok(Self { client, schema: ReportSchema::bundled()?, policy })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Record `report` on the ledger and wait for confirmation.
    ///
    /// # Errors
    ///
    /// - `SchemaValidation` if the report fails the schema; nothing is sent.
    /// - `LedgerSubmissionFailed` once attempts are exhausted or a
    ///   non-retryable ledger error occurs. The error carries the report.
    pub fn submit(&self, report: &VerificationReport) -> AttestResult<LedgerReceipt> {
        self.schema.validate(report)?;
        let submission = LedgerSubmission::from(report);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(&submission) {
                Ok(receipt) => {
                    info!(
                        dataset_hash = %receipt.dataset_hash,
                        tx_id = %receipt.tx_id,
                        block = ?receipt.block,
                        attempt,
                        "report recorded on ledger"
                    );
                    return Ok(receipt);
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        dataset_hash = %submission.dataset_hash,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "ledger submission failed; retrying"
                    );
                    thread::sleep(delay);
                }
                Err(source) => {
                    warn!(
                        dataset_hash = %submission.dataset_hash,
                        attempt,
                        error = %source,
                        "ledger submission abandoned"
                    );
                    return Err(AttestError::LedgerSubmissionFailed {
                        source,
                        attempts: attempt,
                        report: Box::new(report.clone()),
                    });
                }
            }
        }
    }

    fn attempt(&self, submission: &LedgerSubmission) -> Result<LedgerReceipt, LedgerError> {
        let tx_id = match self.client.lookup(&submission.dataset_hash)? {
            Some(existing) => {
                info!(
                    dataset_hash = %submission.dataset_hash,
                    tx_id = %existing,
                    "dataset already on ledger; awaiting existing transaction"
                );
                existing
            }
            None => {
                let tx_id = self.client.submit(submission)?;
                debug!(dataset_hash = %submission.dataset_hash, tx_id = %tx_id, "transaction accepted");
                tx_id
            }
        };
        self.await_confirmation(&tx_id)
    }

    /// Poll `tx_id` until it confirms or the confirmation timeout passes.
    fn await_confirmation(&self, tx_id: &TransactionId) -> Result<LedgerReceipt, LedgerError> {
        let started = Instant::now();
        let deadline = started + self.policy.confirmation_timeout;

        loop {
            match self.client.status(tx_id)? {
                TransactionStatus::Confirmed(receipt) => return Ok(receipt),
                TransactionStatus::Pending => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(LedgerError::ConfirmationTimeout {
                            tx_id: tx_id.clone(),
                            waited_ms: started.elapsed().as_millis() as u64,
                        });
                    }
                    thread::sleep(self.policy.poll_interval.min(deadline - now));
                }
            }
        }
    }
}
