//! Builds pipeline components from configuration.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use attest_checks::{CachingRecognizer, HttpEntityRecognizer, StandardChecks};
use attest_config::AttestConfig;
use attest_contracts::error::AttestResult;
use attest_core::{
    traits::{EntityRecognizer, HashRegistry, LedgerClient},
    Executor, StaticArtifactStore,
};
use attest_ledger::{HttpLedgerClient, InMemoryLedger, LedgerSubmitter, RetryPolicy};
use attest_loader::PolarsTableLoader;
use attest_registry::{FileHashRegistry, InMemoryHashRegistry};

/// Load the config file at `path`, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> AttestResult<AttestConfig> {
    match path {
        Some(path) => AttestConfig::from_file(path),
        None => Ok(AttestConfig::default()),
    }
}

/// A file-backed registry at `path`, or a fresh in-memory one.
pub fn open_registry(path: Option<&Path>) -> AttestResult<Arc<dyn HashRegistry>> {
    match path {
        Some(path) => Ok(Arc::new(FileHashRegistry::open(path)?)),
        None => Ok(Arc::new(InMemoryHashRegistry::new())),
    }
}

/// The caching HTTP recognizer when an NER endpoint is configured.
pub fn entity_recognizer(config: &AttestConfig) -> AttestResult<Option<Arc<dyn EntityRecognizer>>> {
    let Some(endpoint) = &config.ner.endpoint else {
        return Ok(None);
    };
    let http = HttpEntityRecognizer::new(endpoint.clone(), config.ner.timeout())?;
    info!(endpoint = %endpoint, cache_capacity = config.ner.cache_capacity, "entity recognition enabled");
    Ok(Some(Arc::new(CachingRecognizer::new(Arc::new(http), config.ner.cache_capacity))))
}

/// An executor with the polars loader and the standard checks.
pub fn build_executor(config: &AttestConfig, registry: Arc<dyn HashRegistry>) -> AttestResult<Executor> {
    let checks = StandardChecks::new(
        config.checks.clone(),
        config.categories.clone(),
        entity_recognizer(config)?,
    );
    Ok(Executor::new(
        Box::new(PolarsTableLoader::new()),
        Box::new(checks),
        registry,
        Box::new(StaticArtifactStore::new(config.artifact_uri.clone())),
        config.checks.clone(),
        config.scoring,
    ))
}

pub fn retry_policy(config: &AttestConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.ledger.max_attempts,
        initial_backoff: config.ledger.initial_backoff(),
        max_backoff: config.ledger.max_backoff(),
        confirmation_timeout: config.ledger.confirmation_timeout(),
        poll_interval: config.ledger.poll_interval(),
    }
}

/// The HTTP gateway client when a ledger endpoint is configured, otherwise
/// an in-process ledger.
pub fn ledger_client(config: &AttestConfig) -> AttestResult<Arc<dyn LedgerClient>> {
    match &config.ledger.endpoint {
        Some(endpoint) => Ok(Arc::new(HttpLedgerClient::new(endpoint.clone(), config.ledger.request_timeout())?)),
        None => {
            info!("no ledger endpoint configured; using in-process ledger");
            Ok(Arc::new(InMemoryLedger::new()))
        }
    }
}

pub fn build_submitter(config: &AttestConfig) -> AttestResult<LedgerSubmitter> {
    LedgerSubmitter::new(ledger_client(config)?, retry_policy(config))
}
