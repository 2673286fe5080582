//! In-memory implementation of `HashRegistry`.
//!
//! `InMemoryHashRegistry` keeps every digest in a `HashSet` behind a
//! `Mutex`. It lives as long as the process and starts empty.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use attest_contracts::{
    error::{AttestError, AttestResult},
    identity::Digest,
};
use attest_core::traits::HashRegistry;

/// A process-lifetime seen-hash set.
///
/// # Thread safety
///
/// `check_and_insert` performs the membership test and the insert under a
/// single lock acquisition, so concurrent submissions of the same content
/// cannot both be reported as new.
#[derive(Debug, Default)]
pub struct InMemoryHashRegistry {
    seen: Mutex<HashSet<Digest>>,
}

impl InMemoryHashRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AttestResult<std::sync::MutexGuard<'_, HashSet<Digest>>> {
        self.seen.lock().map_err(|e| AttestError::RegistryError {
            reason: format!("registry lock poisoned: {}", e),
        })
    }
}

impl HashRegistry for InMemoryHashRegistry {
    fn check_and_insert(&self, digest: &Digest) -> AttestResult<bool> {
        let mut seen = self.lock()?;
        let is_new = seen.insert(*digest);
        debug!(dataset_hash = %digest, is_new, size = seen.len(), "registry check-and-insert");
        Ok(is_new)
    }

    fn contains(&self, digest: &Digest) -> AttestResult<bool> {
        Ok(self.lock()?.contains(digest))
    }

    fn len(&self) -> AttestResult<usize> {
        Ok(self.lock()?.len())
    }
}
