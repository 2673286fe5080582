//! # attest-core
//!
//! The deterministic dataset verification runtime.
//!
//! This crate provides:
//! - The trait seams (`TableLoader`, `CheckSuite`, `EntityRecognizer`,
//!   `HashRegistry`, `ArtifactStore`, `LedgerClient`)
//! - Content hashing for dataset identity and the verification seal
//! - The pure report assembler
//! - The `Executor` that runs one dataset through the pipeline
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attest_core::{Executor, traits::{CheckSuite, HashRegistry, TableLoader}};
//!
//! let report = executor.verify_file(Path::new("prices.csv"), "Finance")?;
//! ```

pub mod artifact;
pub mod assemble;
pub mod authenticity;
pub mod digest;
pub mod executor;
pub mod traits;

pub use artifact::StaticArtifactStore;
pub use authenticity::AuthenticityChecker;
pub use executor::Executor;
