//! Duplicate detection against the seen-hash registry.

use std::sync::Arc;

use tracing::debug;

use attest_contracts::{error::AttestResult, identity::Digest};

use crate::traits::HashRegistry;

/// Flags datasets whose identity has been submitted before.
///
/// Holds the registry by reference-counted handle so several executors, or
/// several threads running one executor, share the same seen set.
#[derive(Clone)]
pub struct AuthenticityChecker {
    registry: Arc<dyn HashRegistry>,
}

impl AuthenticityChecker {
    pub fn new(registry: Arc<dyn HashRegistry>) -> Self {
        Self { registry }
    }

    /// Return `true` if `dataset_hash` has never been seen, recording it
    /// either way.
    ///
    /// The check and the insert happen in one registry operation, so for any
    /// digest at most one caller ever receives `true`.
    pub fn check(&self, dataset_hash: &Digest) -> AttestResult<bool> {
        let is_new = self.registry.check_and_insert(dataset_hash)?;
        debug!(dataset_hash = %dataset_hash, is_new, "authenticity checked");
        Ok(is_new)
    }

    pub fn registry(&self) -> &Arc<dyn HashRegistry> {
        &self.registry
    }
}
