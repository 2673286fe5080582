//! attest: dataset verification CLI
//!
//! Verifies tabular datasets (CSV, JSON, Parquet) and records the resulting
//! reports on a trust ledger.
//!
//! Usage:
//!   attest verify prices.csv --category Finance --registry seen.jsonl
//!   attest verify prices.csv --config attest.toml --submit
//!   attest hash prices.parquet
//!   attest categories
//!   attest demo

mod scenarios;
mod wiring;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use attest_contracts::error::{AttestError, AttestResult};
use attest_core::{digest::dataset_hash, traits::TableLoader};
use attest_loader::PolarsTableLoader;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Dataset verification and trust-ledger attestation.
#[derive(Parser)]
#[command(
    name = "attest",
    version,
    about = "Verify datasets and attest the results on a trust ledger",
    long_about = "Runs quality, PII, relevance, duplicate and bias checks over a dataset,\n\
                  prints the verification report and optionally records it on the ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a dataset file and print its report as JSON.
    Verify {
        /// Dataset file (.csv, .json or .parquet).
        path: PathBuf,
        /// Claimed category; defaults to the configured default.
        #[arg(long)]
        category: Option<String>,
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Persistent seen-hash registry (JSON lines). In-memory if omitted.
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Record the report on the ledger after verification.
        #[arg(long)]
        submit: bool,
    },
    /// Print a dataset's content hash.
    Hash {
        path: PathBuf,
    },
    /// List the configured categories and their column keywords.
    Categories {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the built-in demo scenarios.
    Demo,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-step progress.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Verify { path, category, config, registry, submit } => {
            run_verify(&path, category, config.as_deref(), registry.as_deref(), submit)
        }
        Command::Hash { path } => run_hash(&path),
        Command::Categories { config } => run_categories(config.as_deref()),
        Command::Demo => scenarios::run_all(),
    };

    if let Err(e) = result {
        eprintln!("attest: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_verify(
    path: &Path,
    category: Option<String>,
    config: Option<&Path>,
    registry: Option<&Path>,
    submit: bool,
) -> AttestResult<()> {
    let config = wiring::load_config(config)?;
    let category = category.unwrap_or_else(|| config.default_category.clone());

    let executor = wiring::build_executor(&config, wiring::open_registry(registry)?)?;
    let report = executor.verify_file(path, &category)?;
    print_json(&report)?;

    if submit {
        let receipt = wiring::build_submitter(&config)?.submit(&report)?;
        print_json(&receipt)?;
    }
    Ok(())
}

fn run_hash(path: &Path) -> AttestResult<()> {
    let loaded = PolarsTableLoader::new().load(path)?;
    println!("{}", dataset_hash(&loaded.table));
    Ok(())
}

fn run_categories(config: Option<&Path>) -> AttestResult<()> {
    let config = wiring::load_config(config)?;
    for category in config.categories.categories() {
        let keywords = config.categories.keywords(category).unwrap_or_default();
        let marker = if category == config.default_category { " (default)" } else { "" };
        println!("{}{}: {}", category, marker, keywords.join(", "));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> AttestResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AttestError::SchemaValidation {
        reason: format!("failed to encode output: {}", e),
    })?;
    println!("{}", text);
    Ok(())
}
