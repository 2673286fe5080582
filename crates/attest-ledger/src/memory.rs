//! In-process ledger with the same contract as the real one.
//!
//! `InMemoryLedger` is append-only: a dataset hash can be recorded once, and
//! a second submission for it is rejected. Transactions confirm after a
//! configurable number of status polls, and failures can be queued up ahead
//! of time to exercise the submitter's retry paths.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use attest_contracts::{
    identity::Digest,
    ledger::{LedgerError, LedgerReceipt, LedgerSubmission, TransactionId, TransactionStatus},
};
use attest_core::traits::LedgerClient;

/// A failure to inject into the next `submit` call.
#[derive(Debug, Clone)]
pub enum SubmitFault {
    /// Fail without recording anything.
    Fail(LedgerError),
    /// Record the submission, then report a network error as if the
    /// response had been lost.
    LoseResponse,
}

struct Record {
    submission: LedgerSubmission,
    block: u64,
    polls_remaining: u32,
    receipt: Option<LedgerReceipt>,
}

#[derive(Default)]
struct State {
    records: HashMap<TransactionId, Record>,
    by_hash: HashMap<Digest, TransactionId>,
    order: Vec<TransactionId>,
    faults: VecDeque<SubmitFault>,
    submit_calls: u32,
}

/// An append-only, contract-like ledger held in memory.
#[derive(Default)]
pub struct InMemoryLedger {
    confirmation_polls: u32,
    state: Mutex<State>,
}

impl InMemoryLedger {
    /// A ledger that confirms on the first status poll.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that reports `Pending` for the first `polls` status calls of
    /// each transaction. `u32::MAX` never confirms.
    pub fn with_confirmation_delay(polls: u32) -> Self {
        Self { confirmation_polls: polls, state: Mutex::default() }
    }

    /// Queue faults for upcoming `submit` calls, consumed in order.
    pub fn inject_faults(&self, faults: impl IntoIterator<Item = SubmitFault>) {
        self.lock().faults.extend(faults);
    }

    /// Every recorded submission, in the order it was appended.
    pub fn recorded(&self) -> Vec<LedgerSubmission> {
        let state = self.lock();
        state.order.iter().filter_map(|tx| state.records.get(tx)).map(|r| r.submission.clone()).collect()
    }

    /// Number of `submit` calls received, including failed ones.
    pub fn submit_calls(&self) -> u32 {
        self.lock().submit_calls
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LedgerClient for InMemoryLedger {
    fn submit(&self, submission: &LedgerSubmission) -> Result<TransactionId, LedgerError> {
        let mut state = self.lock();
        state.submit_calls += 1;

        let lose_response = match state.faults.pop_front() {
            Some(SubmitFault::Fail(e)) => return Err(e),
            Some(SubmitFault::LoseResponse) => true,
            None => false,
        };

        if let Some(existing) = state.by_hash.get(&submission.dataset_hash) {
            return Err(LedgerError::Rejected {
                reason: format!("dataset {} already recorded in {}", submission.dataset_hash, existing),
            });
        }

        let block = state.order.len() as u64 + 1;
        let tx_id = TransactionId(format!("mem-{:08}", block));
        state.records.insert(
            tx_id.clone(),
            Record {
                submission: submission.clone(),
                block,
                polls_remaining: self.confirmation_polls,
                receipt: None,
            },
        );
        state.by_hash.insert(submission.dataset_hash, tx_id.clone());
        state.order.push(tx_id.clone());
        debug!(tx_id = %tx_id, dataset_hash = %submission.dataset_hash, "ledger record appended");

        if lose_response {
            return Err(LedgerError::Network { reason: "connection reset after send".to_string() });
        }
        Ok(tx_id)
    }

    fn status(&self, tx_id: &TransactionId) -> Result<TransactionStatus, LedgerError> {
        let mut state = self.lock();
        let record = state.records.get_mut(tx_id).ok_or_else(|| LedgerError::Rejected {
            reason: format!("unknown transaction {}", tx_id),
        })?;

        if let Some(receipt) = &record.receipt {
            return Ok(TransactionStatus::Confirmed(receipt.clone()));
        }
        if record.polls_remaining > 0 {
            record.polls_remaining -= 1;
            return Ok(TransactionStatus::Pending);
        }

        let receipt = LedgerReceipt {
            tx_id: tx_id.clone(),
            dataset_hash: record.submission.dataset_hash,
            block: Some(record.block),
            confirmed_at: Utc::now(),
        };
        record.receipt = Some(receipt.clone());
        Ok(TransactionStatus::Confirmed(receipt))
    }

    fn lookup(&self, dataset_hash: &Digest) -> Result<Option<TransactionId>, LedgerError> {
        Ok(self.lock().by_hash.get(dataset_hash).cloned())
    }
}
