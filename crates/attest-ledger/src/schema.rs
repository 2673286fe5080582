//! Structural validation of reports before they leave the process.

use jsonschema::Validator;
use serde_json::Value;
use tracing::warn;

use attest_contracts::{
    error::{AttestError, AttestResult},
    report::VerificationReport,
};

/// The bundled JSON Schema for `VerificationReport`.
pub const REPORT_SCHEMA: &str = include_str!("../schema/verification-report.schema.json");

/// A compiled report schema.
pub struct ReportSchema {
    validator: Validator,
}

impl ReportSchema {
    /// Compile the bundled schema.
    pub fn bundled() -> AttestResult<Self> {
        Self::from_json(REPORT_SCHEMA)
    }

    /// Compile a schema from its JSON text.
    ///
    /// Returns `AttestError::ConfigError` if the text is not JSON or not a
    /// valid schema.
    pub fn from_json(schema: &str) -> AttestResult<Self> {
        let schema: Value = serde_json::from_str(schema).map_err(|e| AttestError::ConfigError {
            reason: format!("report schema is not valid JSON: {}", e),
        })?;
        let validator = jsonschema::validator_for(&schema).map_err(|e| AttestError::ConfigError {
            reason: format!("report schema does not compile: {}", e),
        })?;
        Ok(Self { validator })
    }

    /// Check `report` against the schema.
    ///
    /// Every violation is collected into one `SchemaValidation` error.
    pub fn validate(&self, report: &VerificationReport) -> AttestResult<()> {
        let instance = serde_json::to_value(report).map_err(|e| AttestError::SchemaValidation {
            reason: format!("report does not serialise: {}", e),
        })?;

        let violations: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|error| format!("at '{}': {}", error.instance_path, error))
            .collect();

        if violations.is_empty() {
            return Ok(());
        }
        warn!(
            dataset_hash = %report.dataset_hash,
            violations = violations.len(),
            "report failed schema validation"
        );
        Err(AttestError::SchemaValidation { reason: violations.join("; ") })
    }
}
