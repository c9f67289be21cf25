//! Cache-aside name classification.
//!
//! Every player name shown to users passes through [`ClassificationCache`].
//! Verdicts live in the persistent store; the external classifier is only
//! consulted on a miss or when the stored verdict has outlived the
//! configured TTL. Classifier failures never propagate; the configured
//! [`FailurePolicy`] turns them into a deterministic boolean.

mod client;
mod policy;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::database::models::ClassificationEntry;
use crate::database::store::VerdictStore;
use crate::error::{Error, Result};

pub use client::{Classifier, ProfanityApiClient};
pub use policy::{ClassifyPolicy, FailurePolicy};

/// Cache-aside layer in front of the external classifier.
///
/// Safe to call concurrently; concurrent misses on the same key may each
/// consult the classifier once (no coalescing), which the upsert makes
/// harmless: last write wins with an equivalent verdict.
pub struct ClassificationCache {
    store: Arc<dyn VerdictStore>,
    classifier: Arc<dyn Classifier>,
    policy: ClassifyPolicy,
    enabled: bool,
}

impl ClassificationCache {
    pub fn new(
        store: Arc<dyn VerdictStore>,
        classifier: Arc<dyn Classifier>,
        policy: ClassifyPolicy,
    ) -> Self {
        Self {
            store,
            classifier,
            policy,
            enabled: true,
        }
    }

    /// Disable screening entirely: `classify` answers `false` without
    /// touching the store or the classifier.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether `text` is sensitive.
    ///
    /// Errors only on store failure; classifier failure is absorbed by
    /// the failure policy.
    pub async fn classify(&self, text: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let cached = self.store.get(text).await.map_err(Error::store)?;

        if let Some(entry) = &cached {
            if self.policy.is_fresh(entry.checked_at, chrono::Utc::now().timestamp()) {
                return Ok(entry.is_sensitive);
            }
            debug!("Verdict for {:?} is stale, refreshing", text);
        }

        match self.classifier.classify(text).await {
            Ok(verdict) => {
                self.store
                    .upsert(&ClassificationEntry::now(text, verdict))
                    .await
                    .map_err(Error::store)?;
                Ok(verdict)
            }
            Err(err) => {
                warn!("Classifier unavailable for {:?}: {err:#}", text);
                Ok(match self.policy.on_failure {
                    FailurePolicy::FailOpen => {
                        cached.map(|entry| entry.is_sensitive).unwrap_or(false)
                    }
                    FailurePolicy::FailClosed => true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::database::MemoryStore;

    /// Classifier stub: answers `verdict`, or fails when `verdict` is None.
    struct StubClassifier {
        verdict: Option<bool>,
        calls: AtomicUsize,
    }

    impl StubClassifier {
        fn answering(verdict: bool) -> Self {
            Self { verdict: Some(verdict), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { verdict: None, calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Classifier for StubClassifier {
        async fn classify(&self, _text: &str) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.ok_or_else(|| anyhow::anyhow!("classifier down"))
        }
    }

    fn cache_with(
        store: Arc<MemoryStore>,
        classifier: Arc<StubClassifier>,
        policy: ClassifyPolicy,
    ) -> ClassificationCache {
        ClassificationCache::new(store, classifier, policy)
    }

    async fn seed(store: &MemoryStore, name: &str, sensitive: bool, age: Duration) {
        let checked_at = chrono::Utc::now().timestamp() - age.as_secs() as i64;
        store
            .upsert(&ClassificationEntry {
                name: name.to_string(),
                is_sensitive: sensitive,
                checked_at,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn second_call_hits_the_cache() {
        let store = Arc::new(MemoryStore::new());
        let classifier = Arc::new(StubClassifier::answering(true));
        let cache = cache_with(store, classifier.clone(), ClassifyPolicy::default());

        assert!(cache.classify("Eve").await.unwrap());
        assert!(cache.classify("Eve").await.unwrap());
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn permanent_policy_never_refreshes() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Old", true, Duration::from_secs(400 * 86_400)).await;
        let classifier = Arc::new(StubClassifier::answering(false));
        let cache = cache_with(
            store,
            classifier.clone(),
            ClassifyPolicy::permanent(FailurePolicy::FailClosed),
        );

        assert!(cache.classify("Old").await.unwrap());
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn stale_entry_triggers_refresh() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Old", true, Duration::from_secs(8 * 86_400)).await;
        let classifier = Arc::new(StubClassifier::answering(false));
        let week = Duration::from_secs(7 * 86_400);
        let cache = cache_with(
            store.clone(),
            classifier.clone(),
            ClassifyPolicy::with_ttl(week, FailurePolicy::FailClosed),
        );

        // Refreshed verdict replaces the stale one.
        assert!(!cache.classify("Old").await.unwrap());
        assert_eq!(classifier.calls(), 1);

        // And the refresh is persisted: the next call stays local.
        assert!(!cache.classify("Old").await.unwrap());
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn fail_closed_defaults_to_sensitive() {
        let store = Arc::new(MemoryStore::new());
        let classifier = Arc::new(StubClassifier::failing());
        let cache = cache_with(
            store,
            classifier,
            ClassifyPolicy::permanent(FailurePolicy::FailClosed),
        );

        assert!(cache.classify("whoever").await.unwrap());
    }

    #[tokio::test]
    async fn fail_open_prefers_stale_verdict() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Known", true, Duration::from_secs(30 * 86_400)).await;
        let classifier = Arc::new(StubClassifier::failing());
        let week = Duration::from_secs(7 * 86_400);
        let cache = cache_with(
            store,
            classifier,
            ClassifyPolicy::with_ttl(week, FailurePolicy::FailOpen),
        );

        // Stale but known: fall back to it.
        assert!(cache.classify("Known").await.unwrap());
        // Never seen: permissive default.
        assert!(!cache.classify("Unknown").await.unwrap());
    }

    #[tokio::test]
    async fn disabled_screening_skips_everything() {
        let store = Arc::new(MemoryStore::new());
        let classifier = Arc::new(StubClassifier::answering(true));
        let cache = cache_with(store, classifier.clone(), ClassifyPolicy::default())
            .enabled(false);

        assert!(!cache.classify("Eve").await.unwrap());
        assert_eq!(classifier.calls(), 0);
    }
}
