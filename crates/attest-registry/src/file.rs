//! Persistent, append-only `HashRegistry` backed by a JSON-lines file.
//!
//! Each line records one digest the first time it is seen:
//!
//! ```text
//! {"datasetHash":"0x…","firstSeen":"2026-01-01T00:00:00Z"}
//! ```
//!
//! The file is read once at open; afterwards the in-memory set is
//! authoritative for this process and new digests are appended and flushed
//! before `check_and_insert` returns.
//!
//! A final line without its newline is the mark of an interrupted append. At
//! open it is cut off (and re-written whole if it still parses). A failed
//! append is rolled back to the last complete line before the next write.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use attest_contracts::{
    error::{AttestError, AttestResult},
    identity::Digest,
};
use attest_core::traits::HashRegistry;

/// One line of the registry file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub dataset_hash: Digest,
    pub first_seen: DateTime<Utc>,
}

struct FileState {
    seen: HashSet<Digest>,
    file: File,
    /// Length of the file up to its last complete line.
    len: u64,
    /// Set when a failed append could not be rolled back yet.
    torn: bool,
}

/// A seen-hash registry that survives process restarts.
pub struct FileHashRegistry {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileHashRegistry {
    /// Open (or create) the registry file at `path` and load every entry.
    ///
    /// An unterminated final line is dropped with a warning, or completed if
    /// it is a valid entry.
    ///
    /// Returns `AttestError::RegistryError` if the file cannot be opened or
    /// a complete line is not a valid entry.
    pub fn open(path: impl AsRef<Path>) -> AttestResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut seen = HashSet::new();
        let mut complete_len = 0u64;
        let mut torn_tail = false;
        let mut tail = None;

        if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| registry_err(&path, e))?;
            let (complete, rest) = match contents.rfind('\n') {
                Some(end) => contents.split_at(end + 1),
                None => ("", contents.as_str()),
            };

            let mut line_count = 0;
            for (idx, line) in complete.lines().enumerate() {
                line_count = idx + 1;
                if line.trim().is_empty() {
                    continue;
                }
                let entry = parse_entry(line).map_err(|e| AttestError::RegistryError {
                    reason: format!("{}:{}: invalid registry entry: {}", path.display(), idx + 1, e),
                })?;
                seen.insert(entry.dataset_hash);
            }
            complete_len = complete.len() as u64;

            if !rest.is_empty() {
                torn_tail = true;
                match parse_entry(rest.trim()) {
                    Ok(entry) => {
                        seen.insert(entry.dataset_hash);
                        tail = Some(rest.trim().to_string());
                    }
                    Err(e) => warn!(
                        path = %path.display(),
                        line = line_count + 1,
                        error = %e,
                        "discarding unterminated registry line"
                    ),
                }
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| registry_err(&path, e))?;

        let mut len = complete_len;
        if torn_tail {
            file.set_len(complete_len).map_err(|e| registry_err(&path, e))?;
        }
        if let Some(line) = tail {
            let line = format!("{}\n", line);
            file.write_all(line.as_bytes()).map_err(|e| registry_err(&path, e))?;
            len += line.len() as u64;
        }

        info!(path = %path.display(), entries = seen.len(), "hash registry opened");

        Ok(Self { path, state: Mutex::new(FileState { seen, file, len, torn: false }) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> AttestResult<MutexGuard<'_, FileState>> {
        self.state.lock().map_err(|e| AttestError::RegistryError {
            reason: format!("registry lock poisoned: {}", e),
        })
    }
}

fn parse_entry(line: &str) -> serde_json::Result<RegistryEntry> {
    serde_json::from_str(line)
}

fn registry_err(path: &Path, e: std::io::Error) -> AttestError {
    AttestError::RegistryError { reason: format!("{}: {}", path.display(), e) }
}

impl HashRegistry for FileHashRegistry {
    /// Test membership and, for a new digest, append and flush its entry,
    /// all under one lock.
    ///
    /// If the append fails the digest is not added to the in-memory set
    /// either, so the next call retries the write.
    fn check_and_insert(&self, digest: &Digest) -> AttestResult<bool> {
        let mut state = self.lock()?;
        if state.seen.contains(digest) {
            return Ok(false);
        }

        let entry = RegistryEntry { dataset_hash: *digest, first_seen: Utc::now() };
        let mut line = serde_json::to_string(&entry).map_err(|e| AttestError::RegistryError {
            reason: format!("failed to encode registry entry: {}", e),
        })?;
        line.push('\n');

        if state.torn {
            let len = state.len;
            state.file.set_len(len).map_err(|e| registry_err(&self.path, e))?;
            state.torn = false;
        }

        let written = state.file.write_all(line.as_bytes()).and_then(|()| state.file.flush());
        if let Err(e) = written {
            let len = state.len;
            if state.file.set_len(len).is_err() {
                state.torn = true;
            }
            return Err(registry_err(&self.path, e));
        }
        state.len += line.len() as u64;
        state.seen.insert(*digest);

        debug!(dataset_hash = %digest, path = %self.path.display(), "registry entry appended");
        Ok(true)
    }

    fn contains(&self, digest: &Digest) -> AttestResult<bool> {
        Ok(self.lock()?.seen.contains(digest))
    }

    fn len(&self) -> AttestResult<usize> {
        Ok(self.lock()?.seen.len())
    }
}
