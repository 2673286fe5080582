//! Entity recognizers backing the PII scan.
//!
//! - `HttpEntityRecognizer` calls an NER service over HTTP.
//! - `CachingRecognizer` memoises any recognizer per distinct string.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use attest_contracts::{
    entity::EntityLabel,
    error::{AttestError, AttestResult},
};
use attest_core::traits::EntityRecognizer;

#[derive(Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct NerResponse {
    entities: Vec<NerEntity>,
}

#[derive(Deserialize)]
struct NerEntity {
    label: String,
}

/// Calls an NER service: `POST {endpoint}` with `{"text": …}`, expecting
/// `{"entities": [{"label": "PERSON"}, …]}` back.
///
/// Any transport failure, non-success status, or undecodable body is
/// reported as `EntityRecognitionUnavailable`.
pub struct HttpEntityRecognizer {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpEntityRecognizer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AttestResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AttestError::ConfigError {
                reason: format!("failed to build NER client: {}", e),
            })?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EntityRecognizer for HttpEntityRecognizer {
    fn detect_entities(&self, text: &str) -> AttestResult<HashSet<EntityLabel>> {
        let unavailable = |e: reqwest::Error| AttestError::EntityRecognitionUnavailable {
            reason: format!("{}: {}", self.endpoint, e),
        };

        let response: NerResponse = self
            .client
            .post(&self.endpoint)
            .json(&NerRequest { text })
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?
            .json()
            .map_err(unavailable)?;

        Ok(response.entities.iter().map(|e| EntityLabel::from_tag(&e.label)).collect())
    }
}

/// Memoises another recognizer's answers per distinct input string.
///
/// At most `capacity` strings are cached; once full, new strings are passed
/// through without being stored. Failures are never cached.
pub struct CachingRecognizer {
    inner: Arc<dyn EntityRecognizer>,
    capacity: usize,
    cache: Mutex<HashMap<String, HashSet<EntityLabel>>>,
}

impl CachingRecognizer {
    pub fn new(inner: Arc<dyn EntityRecognizer>, capacity: usize) -> Self {
        Self { inner, capacity, cache: Mutex::new(HashMap::new()) }
    }

    /// Number of cached strings.
    pub fn cached(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl EntityRecognizer for CachingRecognizer {
    fn detect_entities(&self, text: &str) -> AttestResult<HashSet<EntityLabel>> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(labels) = cache.get(text) {
                return Ok(labels.clone());
            }
        }

        // The inner call runs without the lock held.
        let labels = self.inner.detect_entities(text)?;

        if let Ok(mut cache) = self.cache.lock() {
            if cache.len() < self.capacity {
                cache.insert(text.to_string(), labels.clone());
            } else {
                debug!(capacity = self.capacity, "NER cache full; result not stored");
            }
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use attest_contracts::{
        entity::EntityLabel,
        error::{AttestError, AttestResult},
    };
    use attest_core::traits::EntityRecognizer;

    use super::{CachingRecognizer, HttpEntityRecognizer};

    /// Labels every string as an organisation, or fails on demand; counts
    /// every call.
    struct MockRecognizer {
        fail: bool,
        calls: Arc<Mutex<u32>>,
    }

    impl EntityRecognizer for MockRecognizer {
        fn detect_entities(&self, _text: &str) -> AttestResult<HashSet<EntityLabel>> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(AttestError::EntityRecognitionUnavailable { reason: "down".to_string() });
            }
            Ok(HashSet::from([EntityLabel::Organization]))
        }
    }

    fn caching(fail: bool, capacity: usize) -> (CachingRecognizer, Arc<Mutex<u32>>) {
        let calls = Arc::new(Mutex::new(0));
        let inner = Arc::new(MockRecognizer { fail, calls: calls.clone() });
        (CachingRecognizer::new(inner, capacity), calls)
    }

    #[test]
    fn test_repeated_strings_hit_the_cache() {
        let (recognizer, calls) = caching(false, 16);

        for _ in 0..5 {
            let labels = recognizer.detect_entities("Acme Corp").unwrap();
            assert!(labels.contains(&EntityLabel::Organization));
        }
        recognizer.detect_entities("Globex").unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(recognizer.cached(), 2);
    }

    #[test]
    fn test_capacity_bounds_the_cache() {
        let (recognizer, calls) = caching(false, 1);

        recognizer.detect_entities("a").unwrap();
        recognizer.detect_entities("b").unwrap();
        recognizer.detect_entities("b").unwrap();

        assert_eq!(recognizer.cached(), 1);
        assert_eq!(*calls.lock().unwrap(), 3, "'b' did not fit and is recomputed");
    }

    #[test]
    fn test_failures_are_not_cached() {
        let (recognizer, calls) = caching(true, 16);

        assert!(recognizer.detect_entities("x").is_err());
        assert!(recognizer.detect_entities("x").is_err());

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(recognizer.cached(), 0);
    }

    #[test]
    fn test_unreachable_service_is_unavailable() {
        let recognizer =
            HttpEntityRecognizer::new("http://127.0.0.1:9/entities", Duration::from_millis(500)).unwrap();

        let err = recognizer.detect_entities("Alice").unwrap_err();
        assert!(
            matches!(err, AttestError::EntityRecognitionUnavailable { .. }),
            "expected EntityRecognitionUnavailable, got {:?}",
            err
        );
    }
}
