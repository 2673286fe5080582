//! # attest-registry
//!
//! Seen-hash registries backing the authenticity check.
//!
//! ## Overview
//!
//! A registry is the set of dataset identities already submitted. It only
//! grows. Two implementations of
//! [`HashRegistry`](attest_core::traits::HashRegistry) are provided:
//!
//! - [`InMemoryHashRegistry`] — process lifetime, starts empty
//! - [`FileHashRegistry`] — JSON-lines file, survives restarts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use attest_registry::FileHashRegistry;
//!
//! let registry = Arc::new(FileHashRegistry::open("seen-hashes.jsonl")?);
//! // Pass `registry` to `attest_core::Executor::new(...)`.
//! ```

pub mod file;
pub mod memory;

pub use file::{FileHashRegistry, RegistryEntry};
pub use memory::InMemoryHashRegistry;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use attest_contracts::identity::Digest;
    use attest_core::{traits::HashRegistry, AuthenticityChecker};

    use super::{FileHashRegistry, InMemoryHashRegistry};

    fn digest(byte: u8) -> Digest {
        Digest::from_bytes([byte; 32])
    }

    // ── In-memory ─────────────────────────────────────────────────────────────

    #[test]
    fn test_starts_empty() {
        let registry = InMemoryHashRegistry::new();
        assert!(registry.is_empty().unwrap());
        assert!(!registry.contains(&digest(1)).unwrap());
    }

    /// Same content twice: authentic, then duplicate.
    #[test]
    fn test_duplicate_flagging() {
        let checker = AuthenticityChecker::new(Arc::new(InMemoryHashRegistry::new()));

        assert!(checker.check(&digest(1)).unwrap(), "first sighting is authentic");
        assert!(!checker.check(&digest(1)).unwrap(), "second sighting is a duplicate");
        assert!(!checker.check(&digest(1)).unwrap(), "and stays a duplicate");
        assert!(checker.check(&digest(2)).unwrap(), "other content is unaffected");
        assert_eq!(checker.registry().len().unwrap(), 2);
    }

    /// Many threads racing on the same digest: exactly one sees it as new.
    #[test]
    fn test_concurrent_check_and_insert() {
        const THREADS: usize = 16;
        let registry = Arc::new(InMemoryHashRegistry::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.check_and_insert(&digest(9)).unwrap()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|is_new| *is_new)
            .count();

        assert_eq!(winners, 1, "exactly one concurrent submission may be authentic");
        assert_eq!(registry.len().unwrap(), 1);
    }

    // ── File-backed ───────────────────────────────────────────────────────────

    #[test]
    fn test_file_registry_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");

        {
            let registry = FileHashRegistry::open(&path).unwrap();
            assert!(registry.check_and_insert(&digest(1)).unwrap());
            assert!(registry.check_and_insert(&digest(2)).unwrap());
            assert!(!registry.check_and_insert(&digest(1)).unwrap());
        }

        let reopened = FileHashRegistry::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 2);
        assert!(!reopened.check_and_insert(&digest(2)).unwrap(), "seen before restart");
        assert!(reopened.check_and_insert(&digest(3)).unwrap());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3, "one line per distinct digest");
        assert!(contents.contains(&digest(3).to_string()));
    }

    #[test]
    fn test_file_registry_rejects_corrupt_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");
        std::fs::write(&path, "not json\n").unwrap();

        match FileHashRegistry::open(&path) {
            Err(attest_contracts::error::AttestError::RegistryError { reason }) => {
                assert!(reason.contains(":1:"), "reason should carry the line number: {reason}");
            }
            Err(other) => panic!("expected RegistryError, got {:?}", other),
            Ok(_) => panic!("expected RegistryError, got a registry"),
        }
    }

    #[test]
    fn test_file_registry_recovers_from_interrupted_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");
        {
            let registry = FileHashRegistry::open(&path).unwrap();
            assert!(registry.check_and_insert(&digest(1)).unwrap());
        }
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str(r#"{"datasetHash":"0x0202"#);
        std::fs::write(&path, &contents).unwrap();

        let registry = FileHashRegistry::open(&path).unwrap();
        assert_eq!(registry.len().unwrap(), 1);
        assert!(!registry.check_and_insert(&digest(1)).unwrap());
        assert!(registry.check_and_insert(&digest(2)).unwrap());
        drop(registry);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert_eq!(contents.lines().count(), 2, "partial line is gone: {contents}");

        let reopened = FileHashRegistry::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 2);
        assert!(reopened.contains(&digest(2)).unwrap());
    }

    #[test]
    fn test_file_registry_completes_unterminated_valid_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");
        {
            let registry = FileHashRegistry::open(&path).unwrap();
            registry.check_and_insert(&digest(5)).unwrap();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, contents.trim_end()).unwrap();

        let registry = FileHashRegistry::open(&path).unwrap();
        assert!(registry.contains(&digest(5)).unwrap());
        assert!(registry.check_and_insert(&digest(6)).unwrap());
        drop(registry);

        let reopened = FileHashRegistry::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_file_registry_concurrent_check_and_insert() {
        const THREADS: usize = 8;
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(FileHashRegistry::open(dir.path().join("seen.jsonl")).unwrap());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.check_and_insert(&digest(4)).unwrap()
                })
            })
            .collect();

        let winners = handles.into_iter().map(|h| h.join().unwrap()).filter(|n| *n).count();
        assert_eq!(winners, 1);

        let contents = std::fs::read_to_string(registry.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
