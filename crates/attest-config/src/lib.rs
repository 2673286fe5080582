//! # attest-config
//!
//! TOML configuration for the attestation pipeline.
//!
//! One file configures every stage: check thresholds, scoring penalties,
//! the category vocabulary, the NER service and the ledger client. All keys
//! are optional. The bundled `config/default.toml` documents the defaults.
//!
//! ```rust,ignore
//! use attest_config::AttestConfig;
//!
//! let config = AttestConfig::from_file(Path::new("attest.toml"))?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use attest_contracts::{
    error::{AttestError, AttestResult},
    settings::{CategoryVocabulary, CheckSettings, ScoringPolicy},
};

/// The bundled default configuration file.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config/default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttestConfig {
    /// Category assumed when a submission does not claim one.
    pub default_category: String,
    /// Pointer recorded as the report's `analysisReport`.
    pub artifact_uri: String,
    pub checks: CheckSettings,
    pub scoring: ScoringPolicy,
    pub categories: CategoryVocabulary,
    pub ner: NerSettings,
    pub ledger: LedgerSettings,
}

impl Default for AttestConfig {
    fn default() -> Self {
        Self {
            default_category: "Finance".to_string(),
            artifact_uri: "ipfs://mock-report".to_string(),
            checks: CheckSettings::default(),
            scoring: ScoringPolicy::default(),
            categories: CategoryVocabulary::default(),
            ner: NerSettings::default(),
            ledger: LedgerSettings::default(),
        }
    }
}

/// Named-entity recognition service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NerSettings {
    /// Service URL. `None` disables entity recognition.
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    /// Maximum number of distinct strings whose entities are memoised.
    pub cache_capacity: usize,
}

impl Default for NerSettings {
    fn default() -> Self {
        Self { endpoint: None, timeout_ms: 2_000, cache_capacity: 10_000 }
    }
}

impl NerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Ledger gateway and submission policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerSettings {
    /// Gateway base URL. `None` selects the in-process ledger.
    pub endpoint: Option<String>,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub confirmation_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_ms: 5_000,
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
            confirmation_timeout_ms: 30_000,
            poll_interval_ms: 500,
        }
    }
}

impl LedgerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl AttestConfig {
    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AttestError::ConfigError` if the TOML is malformed, contains
    /// unknown keys, or fails [`validate`](Self::validate).
    pub fn from_toml_str(s: &str) -> AttestResult<Self> {
        let config: AttestConfig = toml::from_str(s).map_err(|e| AttestError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            default_category = %config.default_category,
            categories = config.categories.0.len(),
            ner = config.ner.endpoint.is_some(),
            ledger = config.ledger.endpoint.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as configuration.
    pub fn from_file(path: &Path) -> AttestResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AttestError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> AttestResult<()> {
        let invalid = |reason: String| Err(AttestError::ConfigError { reason });

        let threshold = self.checks.imbalance_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return invalid(format!("checks.imbalance_threshold must be in (0, 1], got {}", threshold));
        }
        if self.checks.demographic_column.trim().is_empty() {
            return invalid("checks.demographic_column must not be empty".to_string());
        }
        if self.scoring.floor > 100 {
            return invalid(format!("scoring.floor must be at most 100, got {}", self.scoring.floor));
        }
        if self.default_category.trim().is_empty() {
            return invalid("default_category must not be empty".to_string());
        }
        for category in self.categories.categories() {
            if category.trim().is_empty() {
                return invalid("category labels must not be empty".to_string());
            }
            let keywords = self.categories.keywords(category).unwrap_or_default();
            if keywords.is_empty() || keywords.iter().any(|k| k.trim().is_empty()) {
                return invalid(format!("category '{}' needs at least one non-empty keyword", category));
            }
        }
        if self.ner.endpoint.is_some() && self.ner.timeout_ms == 0 {
            return invalid("ner.timeout_ms must be positive".to_string());
        }
        if self.ledger.max_attempts == 0 {
            return invalid("ledger.max_attempts must be at least 1".to_string());
        }
        if self.ledger.poll_interval_ms == 0 {
            return invalid("ledger.poll_interval_ms must be positive".to_string());
        }
        if self.ledger.initial_backoff_ms > self.ledger.max_backoff_ms {
            return invalid(format!(
                "ledger.initial_backoff_ms ({}) exceeds ledger.max_backoff_ms ({})",
                self.ledger.initial_backoff_ms, self.ledger.max_backoff_ms
            ));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
