//! # attest-ledger
//!
//! Records verification reports on the external trust ledger.
//!
//! - [`LedgerSubmitter`] validates a report against the bundled JSON Schema,
//!   then submits it with bounded retry and a bounded confirmation wait.
//! - [`HttpLedgerClient`] talks to a ledger gateway over HTTP.
//! - [`InMemoryLedger`] is an append-only in-process ledger with fault
//!   injection.
//!
//! ```rust,ignore
//! use attest_ledger::{InMemoryLedger, LedgerSubmitter, RetryPolicy};
//!
//! let submitter = LedgerSubmitter::new(Arc::new(InMemoryLedger::new()), RetryPolicy::default())?;
//! let receipt = submitter.submit(&report)?;
//! ```

pub mod http;
pub mod memory;
pub mod schema;
pub mod submitter;

pub use http::HttpLedgerClient;
pub use memory::{InMemoryLedger, SubmitFault};
pub use schema::ReportSchema;
pub use submitter::{LedgerSubmitter, RetryPolicy};
