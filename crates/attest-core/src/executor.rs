//! The verification executor: one dataset in, one report out.
//!
//! Pipeline per run:
//!
//!   Load → Identity → Table checks → Authenticity → Artifact → Assemble
//!
//! Authenticity runs after the fallible table checks, so a run that aborts
//! while loading or checking never records its dataset hash in the registry.
//! The artifact is stored after the registry insert, since it carries the
//! duplicate flag; if that store fails the hash stays recorded.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use attest_contracts::{
    check::CheckResults,
    error::AttestResult,
    identity::RunId,
    report::VerificationReport,
    settings::{CheckSettings, ScoringPolicy},
    table::Table,
};

use crate::{
    assemble::assemble_report,
    authenticity::AuthenticityChecker,
    digest::dataset_hash,
    traits::{ArtifactStore, CheckSuite, HashRegistry, TableLoader},
};

/// Drives verification runs.
///
/// The executor is shareable across threads; concurrent runs only contend on
/// the registry's check-and-insert.
pub struct Executor {
    loader: Box<dyn TableLoader>,
    checks: Box<dyn CheckSuite>,
    authenticity: AuthenticityChecker,
    artifacts: Box<dyn ArtifactStore>,
    settings: CheckSettings,
    scoring: ScoringPolicy,
}

impl Executor {
    pub fn new(
        loader: Box<dyn TableLoader>,
        checks: Box<dyn CheckSuite>,
        registry: Arc<dyn HashRegistry>,
        artifacts: Box<dyn ArtifactStore>,
        settings: CheckSettings,
        scoring: ScoringPolicy,
    ) -> Self {
        Self {
            loader,
            checks,
            authenticity: AuthenticityChecker::new(registry),
            artifacts,
            settings,
            scoring,
        }
    }

    /// Load the file at `path` and verify it against `claimed_category`.
    ///
    /// # Errors
    ///
    /// Loader errors (`UnsupportedFormat`, `MalformedInput`), check errors,
    /// and registry errors abort the run; no partial report is returned.
    pub fn verify_file(&self, path: &Path, claimed_category: &str) -> AttestResult<VerificationReport> {
        let loaded = self.loader.load(path)?;
        debug!(
            path = %path.display(),
            format = %loaded.format,
            rows = loaded.table.row_count(),
            columns = loaded.table.column_count(),
            bytes = loaded.byte_size,
            "dataset loaded"
        );
        self.verify_table(&loaded.table, claimed_category)
    }

    /// Verify an already-loaded table against `claimed_category`.
    pub fn verify_table(&self, table: &Table, claimed_category: &str) -> AttestResult<VerificationReport> {
        let run_id = RunId::new();
        let identity = dataset_hash(table);

        debug!(
            run_id = %run_id,
            dataset_hash = %identity,
            claimed_category,
            "verification run starting"
        );

        // ── Table checks ─────────────────────────────────────────────────────
        let findings = self.checks.run(table, claimed_category)?;
        if findings.pii.degraded {
            warn!(
                run_id = %run_id,
                "entity recognition unavailable; PII result is pattern-only"
            );
        }
        if let Some(hit) = &findings.pii.first_hit {
            debug!(
                run_id = %run_id,
                column = %hit.column,
                row = hit.row,
                detector = ?hit.detector,
                "PII detected"
            );
        }

        // ── Authenticity ─────────────────────────────────────────────────────
        //
        // Atomic check-and-insert: only one run ever sees a digest as new.
        let is_authentic = self.authenticity.check(&identity)?;
        if !is_authentic {
            info!(run_id = %run_id, dataset_hash = %identity, "duplicate dataset submission");
        }

        // ── Assemble ─────────────────────────────────────────────────────────
        let results = CheckResults::from_findings(findings, is_authentic);
        let draft = assemble_report(
            identity,
            results,
            claimed_category,
            String::new(),
            &self.settings,
            &self.scoring,
        );
        let analysis_report = self.artifacts.store(&draft.dataset_hash, &draft.details)?;
        let report = VerificationReport { analysis_report, ..draft };

        info!(
            run_id = %run_id,
            dataset_hash = %report.dataset_hash,
            is_verified = report.is_verified,
            quality_score = report.quality_score,
            "verification run complete"
        );

        Ok(report)
    }

    pub fn registry(&self) -> &Arc<dyn HashRegistry> {
        self.authenticity.registry()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
