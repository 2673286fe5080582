//! Analysis artifact storage.
//!
//! Content-addressed persistence of the full analysis is out of scope, so the
//! only store hands back a fixed URI.

use tracing::debug;

use attest_contracts::{error::AttestResult, identity::Digest, report::ReportDetails};

use crate::traits::ArtifactStore;

/// Default pointer written into reports when no real store is configured.
pub const MOCK_ARTIFACT_URI: &str = "ipfs://mock-report";

/// An `ArtifactStore` that stores nothing and always returns the same URI.
#[derive(Debug, Clone)]
pub struct StaticArtifactStore {
    uri: String,
}

impl StaticArtifactStore {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl Default for StaticArtifactStore {
    fn default() -> Self {
        Self::new(MOCK_ARTIFACT_URI)
    }
}

impl ArtifactStore for StaticArtifactStore {
    fn store(&self, dataset_hash: &Digest, _details: &ReportDetails) -> AttestResult<String> {
        debug!(dataset_hash = %dataset_hash, uri = %self.uri, "artifact store is static; nothing persisted");
        Ok(self.uri.clone())
    }
}
