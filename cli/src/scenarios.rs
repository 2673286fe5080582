//! Built-in demo scenarios.
//!
//! Each scenario builds its dataset in memory and runs it through the real
//! executor, checks and ledger submitter. Only the ledger is in-process.

use std::sync::Arc;
use std::time::Duration;

use attest_checks::StandardChecks;
use attest_contracts::{
    error::{AttestError, AttestResult},
    ledger::LedgerError,
    report::VerificationReport,
    settings::{CheckSettings, ScoringPolicy},
    table::{CellValue, DatasetFormat, LoadedTable, Table},
};
use attest_core::{
    traits::{CheckSuite, HashRegistry, TableLoader},
    Executor, StaticArtifactStore,
};
use attest_ledger::{InMemoryLedger, LedgerSubmitter, RetryPolicy, SubmitFault};
use attest_registry::InMemoryHashRegistry;

/// Serves in-memory tables; the demo never touches the filesystem.
struct NoFiles;

impl TableLoader for NoFiles {
    fn load(&self, path: &std::path::Path) -> AttestResult<LoadedTable> {
        DatasetFormat::from_path(path)?;
        Err(AttestError::MalformedInput {
            reason: format!("demo scenarios do not read files ({})", path.display()),
        })
    }
}

fn executor(registry: Arc<dyn HashRegistry>) -> Executor {
    Executor::new(
        Box::new(NoFiles),
        Box::new(StandardChecks::default()),
        registry,
        Box::new(StaticArtifactStore::default()),
        CheckSettings::default(),
        ScoringPolicy::default(),
    )
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(50),
        max_backoff: Duration::from_millis(200),
        confirmation_timeout: Duration::from_secs(1),
        poll_interval: Duration::from_millis(20),
    }
}

/// Daily closing prices with a balanced trader-gender column.
fn market_table() -> AttestResult<Table> {
    let rows = [
        ("2024-03-01", 101.25, 1_200, "F"),
        ("2024-03-04", 102.10, 900, "M"),
        ("2024-03-05", 100.80, 1_450, "F"),
        ("2024-03-06", 99.95, 1_100, "M"),
        ("2024-03-07", 101.60, 1_300, "F"),
        ("2024-03-08", 103.05, 1_000, "M"),
    ];
    Table::from_rows(
        &["trade_date", "close_price", "volume", "gender"],
        rows.iter()
            .map(|(date, price, volume, gender)| {
                vec![
                    CellValue::from(*date),
                    CellValue::Float(*price),
                    CellValue::Int(*volume),
                    CellValue::from(*gender),
                ]
            })
            .collect(),
    )
}

fn print_report(report: &VerificationReport) {
    println!("  Dataset hash:       {}", report.dataset_hash);
    println!("  Verification hash:  {}", report.verification_hash);
    println!(
        "  Missing / freeform: {} / {}",
        report.details.data_quality.missing_values, report.details.data_quality.incorrect_types
    );
    println!("  PII detected:       {}", report.details.pii_detected);
    println!("  Relevance:          {}", report.details.relevance);
    println!("  Duplicate:          {}", report.details.is_duplicate);
    println!("  Bias:               {}", report.details.bias);
    println!(
        "  Verified:           {} (score {})",
        if report.is_verified { "YES" } else { "NO" },
        report.quality_score
    );
}

/// Scenario 1: a clean finance dataset is verified and recorded.
pub fn happy_path() -> AttestResult<()> {
    println!("=== Scenario 1: Clean submission ===");
    println!();

    let exec = executor(Arc::new(InMemoryHashRegistry::new()));
    let report = exec.verify_table(&market_table()?, "Finance")?;
    print_report(&report);

    let ledger = Arc::new(InMemoryLedger::new());
    let receipt = LedgerSubmitter::new(ledger, fast_retry())?.submit(&report)?;
    println!("  Ledger receipt:     {} (block {:?})", receipt.tx_id, receipt.block);
    println!();
    Ok(())
}

/// Scenario 2: the same content submitted twice is flagged on the second run.
pub fn duplicate_resubmission() -> AttestResult<()> {
    println!("=== Scenario 2: Duplicate resubmission ===");
    println!();

    let registry = Arc::new(InMemoryHashRegistry::new());
    let exec = executor(registry.clone());
    let table = market_table()?;

    let first = exec.verify_table(&table, "Finance")?;
    println!("  First submission:   verified={} score={}", first.is_verified, first.quality_score);
    let second = exec.verify_table(&table, "Finance")?;
    println!("  Second submission:  verified={} score={}", second.is_verified, second.quality_score);
    println!("  Same identity:      {}", first.dataset_hash == second.dataset_hash);
    println!("  Registry size:      {}", registry.len()?);
    println!();
    Ok(())
}

/// Scenario 3: an email address in a free-text column blocks verification.
pub fn pii_exposure() -> AttestResult<()> {
    println!("=== Scenario 3: PII exposure ===");
    println!();

    let table = Table::from_rows(
        &["close_price", "desk_contact"],
        vec![
            vec![101.25.into(), "rates desk".into()],
            vec![102.10.into(), "john.doe@example.com".into()],
            vec![100.80.into(), CellValue::Null],
        ],
    )?;

    let findings = StandardChecks::default().run(&table, "Finance")?;
    if let Some(hit) = &findings.pii.first_hit {
        println!("  First hit:          column '{}', row {} ({:?})", hit.column, hit.row, hit.detector);
    }

    let report = executor(Arc::new(InMemoryHashRegistry::new())).verify_table(&table, "Finance")?;
    print_report(&report);
    println!();
    Ok(())
}

/// Scenario 4: the ledger stays unreachable; the report survives the failure.
pub fn ledger_outage() -> AttestResult<()> {
    println!("=== Scenario 4: Ledger outage ===");
    println!();

    let report = executor(Arc::new(InMemoryHashRegistry::new())).verify_table(&market_table()?, "Finance")?;

    let ledger = Arc::new(InMemoryLedger::new());
    ledger.inject_faults(
        (0..3).map(|_| SubmitFault::Fail(LedgerError::Network { reason: "gateway unreachable".to_string() })),
    );
    let submitter = LedgerSubmitter::new(ledger, fast_retry())?;

    match submitter.submit(&report) {
        Err(AttestError::LedgerSubmissionFailed { source, attempts, report: kept }) => {
            println!("  Submission failed after {} attempt(s): {}", attempts, source);
            println!("  Report retained:    {} (score {})", kept.dataset_hash, kept.quality_score);
        }
        Err(other) => return Err(other),
        Ok(receipt) => println!("  Unexpectedly recorded as {}", receipt.tx_id),
    }
    println!();
    Ok(())
}

/// Run every scenario in order.
pub fn run_all() -> AttestResult<()> {
    happy_path()?;
    duplicate_resubmission()?;
    pii_exposure()?;
    ledger_outage()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{market_table, run_all};

    #[test]
    fn test_market_table_shape() {
        let table = market_table().unwrap();
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn test_all_scenarios_complete() {
        run_all().unwrap();
    }
}
