//! Account-handle registry.
//!
//! Enforces the two invariants of the handle table: a profile triple is
//! bound by at most one owner globally, and each owner has exactly one
//! active handle while they have any. List order is insertion order and
//! is the contract behind every 1-based selector.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::info;

use crate::database::models::{Handle, ProfileKey};
use crate::database::store::HandleStore;
use crate::error::{Error, Result};

/// Bind-time profile-existence check, answered by the arcade API.
#[async_trait]
pub trait ProfileVerifier: Send + Sync {
    /// `Ok(false)` means the profile definitively does not exist;
    /// transport failures surface as [`Error::Upstream`].
    async fn profile_exists(&self, key: ProfileKey) -> Result<bool>;
}

/// Result of an unbind: the removed handle, plus the handle promoted to
/// active when the removed one held the flag.
#[derive(Debug, Clone, PartialEq)]
pub struct UnbindOutcome {
    pub removed: Handle,
    pub promoted: Option<Handle>,
}

/// Registry of account handles, scoped per owner.
pub struct HandleRegistry {
    store: Arc<dyn HandleStore>,
    verifier: Arc<dyn ProfileVerifier>,
}

impl HandleRegistry {
    pub fn new(store: Arc<dyn HandleStore>, verifier: Arc<dyn ProfileVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Bind a new handle to `owner_id`.
    ///
    /// Rejected when the triple is bound anywhere already. With `verify`,
    /// the upstream profile must exist before anything is written; any
    /// verification failure aborts the bind with no partial write. The
    /// first handle an owner binds becomes their active one; later binds
    /// never steal the flag.
    pub async fn bind(&self, owner_id: &str, key: ProfileKey, verify: bool) -> Result<Handle> {
        if let Some(existing) = self.store.find_by_key(key).await.map_err(Error::store)? {
            return Err(if existing.owner_id == owner_id {
                Error::AlreadyBoundToSelf
            } else {
                Error::AlreadyBoundToOther
            });
        }

        if verify && !self.verifier.profile_exists(key).await? {
            return Err(Error::ProfileNotFound);
        }

        let existing = self.store.list_for_owner(owner_id).await.map_err(Error::store)?;
        let handle = Handle::new(owner_id, key, existing.is_empty());

        self.store.insert(&handle).await.map_err(Error::store)?;
        info!("Owner {} bound handle {}", owner_id, key);

        Ok(handle)
    }

    /// All handles of `owner_id`, in insertion order. Empty is not an error.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Handle>> {
        self.store.list_for_owner(owner_id).await.map_err(Error::store)
    }

    /// Make the `selector`-th handle (1-based, list order) the active one
    /// and demote every other handle of the owner. All flag writes are
    /// issued and awaited before this returns, so a subsequent read of
    /// the same owner sees the reassignment settled.
    pub async fn switch(&self, owner_id: &str, selector: usize) -> Result<Handle> {
        let handles = self.owned_handles(owner_id).await?;
        let index = Self::select(&handles, selector)?;
        let selected = handles[index].key();

        try_join_all(
            handles
                .iter()
                .map(|h| self.store.set_active(h.key(), h.key() == selected)),
        )
        .await
        .map_err(Error::store)?;

        info!("Owner {} switched active handle to {}", owner_id, selected);

        let mut handle = handles[index].clone();
        handle.active = true;
        Ok(handle)
    }

    /// Remove the `selector`-th handle (1-based, list order).
    ///
    /// When the removed handle was active and others remain, the first
    /// remaining handle in the original list order is promoted, keeping
    /// re-election deterministic regardless of bind recency.
    pub async fn unbind(&self, owner_id: &str, selector: usize) -> Result<UnbindOutcome> {
        let handles = self.owned_handles(owner_id).await?;
        let index = Self::select(&handles, selector)?;
        let removed = handles[index].clone();

        self.store.delete(removed.key()).await.map_err(Error::store)?;

        let promoted = if removed.active {
            let next = handles.iter().find(|h| h.key() != removed.key()).cloned();
            if let Some(next) = &next {
                self.store
                    .set_active(next.key(), true)
                    .await
                    .map_err(Error::store)?;
                info!(
                    "Owner {} unbound active handle {}, promoted {}",
                    owner_id,
                    removed.key(),
                    next.key()
                );
            }
            next.map(|mut h| {
                h.active = true;
                h
            })
        } else {
            None
        };

        Ok(UnbindOutcome { removed, promoted })
    }

    /// Which owner, if any, has bound this triple.
    pub async fn lookup(&self, key: ProfileKey) -> Result<Option<String>> {
        Ok(self
            .store
            .find_by_key(key)
            .await
            .map_err(Error::store)?
            .map(|h| h.owner_id))
    }

    /// The owner's active handle.
    pub async fn active_handle(&self, owner_id: &str) -> Result<Handle> {
        let handles = self.owned_handles(owner_id).await?;
        handles
            .into_iter()
            .find(|h| h.active)
            .ok_or(Error::NoActiveHandle)
    }

    async fn owned_handles(&self, owner_id: &str) -> Result<Vec<Handle>> {
        let handles = self.store.list_for_owner(owner_id).await.map_err(Error::store)?;
        if handles.is_empty() {
            return Err(Error::NoHandles);
        }
        Ok(handles)
    }

    fn select(handles: &[Handle], selector: usize) -> Result<usize> {
        if selector == 0 || selector > handles.len() {
            return Err(Error::IndexOutOfRange {
                given: selector,
                len: handles.len(),
            });
        }
        Ok(selector - 1)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::database::models::Region;
    use crate::database::MemoryStore;
    use crate::error::ErrorKind;

    /// Verifier stub: answers `exists`, or fails upstream when `None`.
    struct StubVerifier {
        exists: Option<bool>,
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn answering(exists: bool) -> Self {
            Self { exists: Some(exists), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { exists: None, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ProfileVerifier for StubVerifier {
        async fn profile_exists(&self, _key: ProfileKey) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.exists
                .ok_or_else(|| Error::upstream(anyhow::anyhow!("profile api down")))
        }
    }

    fn key(profile: i64) -> ProfileKey {
        ProfileKey::new(Region::Eu, 1, profile).unwrap()
    }

    fn registry(verifier: StubVerifier) -> (Arc<MemoryStore>, HandleRegistry) {
        let store = Arc::new(MemoryStore::new());
        let registry = HandleRegistry::new(store.clone(), Arc::new(verifier));
        (store, registry)
    }

    /// Active-count invariant: min(1, n) handles active, always.
    async fn assert_invariant(registry: &HandleRegistry, owner: &str) {
        let handles = registry.list(owner).await.unwrap();
        let active = handles.iter().filter(|h| h.active).count();
        assert_eq!(active, handles.len().min(1), "handles: {handles:?}");
    }

    #[tokio::test]
    async fn first_bind_becomes_active_later_binds_do_not() {
        let (_, registry) = registry(StubVerifier::answering(true));

        let first = registry.bind("u1", key(1), false).await.unwrap();
        assert!(first.active);

        let second = registry.bind("u1", key(2), false).await.unwrap();
        assert!(!second.active);

        let listed = registry.list("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].active && !listed[1].active);
        assert_invariant(&registry, "u1").await;
    }

    #[tokio::test]
    async fn bind_rejects_taken_triples() {
        let (_, registry) = registry(StubVerifier::answering(true));
        registry.bind("u1", key(1), false).await.unwrap();

        let same_owner = registry.bind("u1", key(1), false).await.unwrap_err();
        assert!(matches!(same_owner, Error::AlreadyBoundToSelf));
        assert_eq!(same_owner.kind(), ErrorKind::Conflict);

        let other_owner = registry.bind("u2", key(1), false).await.unwrap_err();
        assert!(matches!(other_owner, Error::AlreadyBoundToOther));
        assert_eq!(other_owner.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn verified_bind_rejects_missing_profile_without_writing() {
        let (_, registry) = registry(StubVerifier::answering(false));

        let err = registry
            .bind("u1", ProfileKey::new(Region::Cn, 1, 42).unwrap(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound));
        assert!(registry.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn verifier_outage_aborts_bind() {
        let (_, registry) = registry(StubVerifier::failing());

        let err = registry.bind("u1", key(1), true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert!(registry.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unverified_bind_skips_the_check() {
        let verifier = StubVerifier::failing();
        let store = Arc::new(MemoryStore::new());
        let verifier = Arc::new(verifier);
        let registry = HandleRegistry::new(store, verifier.clone());

        registry.bind("u1", key(1), false).await.unwrap();
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn switch_moves_the_active_flag() {
        let (_, registry) = registry(StubVerifier::answering(true));
        for profile in 1..=3 {
            registry.bind("u1", key(profile), false).await.unwrap();
        }

        let switched = registry.switch("u1", 3).await.unwrap();
        assert_eq!(switched.profile, 3);
        assert!(switched.active);

        let listed = registry.list("u1").await.unwrap();
        let active: Vec<i64> = listed.iter().filter(|h| h.active).map(|h| h.profile).collect();
        assert_eq!(active, vec![3]);
        assert_invariant(&registry, "u1").await;

        registry.switch("u1", 1).await.unwrap();
        assert_eq!(registry.active_handle("u1").await.unwrap().profile, 1);
    }

    #[tokio::test]
    async fn switch_rejects_out_of_range_and_leaves_state_alone() {
        let (_, registry) = registry(StubVerifier::answering(true));
        registry.bind("u1", key(1), false).await.unwrap();
        registry.bind("u1", key(2), false).await.unwrap();

        for selector in [0, 3] {
            let err = registry.switch("u1", selector).await.unwrap_err();
            assert!(matches!(err, Error::IndexOutOfRange { given, len: 2 } if given == selector));
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        // First handle still holds the flag.
        assert_eq!(registry.active_handle("u1").await.unwrap().profile, 1);
    }

    #[tokio::test]
    async fn operations_without_handles_report_no_handles() {
        let (_, registry) = registry(StubVerifier::answering(true));

        assert!(matches!(registry.switch("u1", 1).await.unwrap_err(), Error::NoHandles));
        assert!(matches!(registry.unbind("u1", 1).await.unwrap_err(), Error::NoHandles));
        assert!(matches!(
            registry.active_handle("u1").await.unwrap_err(),
            Error::NoHandles
        ));
        assert!(registry.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unbinding_the_active_handle_promotes_first_remaining() {
        let (_, registry) = registry(StubVerifier::answering(true));
        for profile in 1..=3 {
            registry.bind("u1", key(profile), false).await.unwrap();
        }
        registry.switch("u1", 2).await.unwrap();

        let outcome = registry.unbind("u1", 2).await.unwrap();
        assert_eq!(outcome.removed.profile, 2);
        // First in original order, not the most recently bound.
        assert_eq!(outcome.promoted.unwrap().profile, 1);

        assert_eq!(registry.active_handle("u1").await.unwrap().profile, 1);
        assert_invariant(&registry, "u1").await;
    }

    #[tokio::test]
    async fn unbinding_an_inactive_handle_promotes_nothing() {
        let (_, registry) = registry(StubVerifier::answering(true));
        registry.bind("u1", key(1), false).await.unwrap();
        registry.bind("u1", key(2), false).await.unwrap();

        let outcome = registry.unbind("u1", 2).await.unwrap();
        assert_eq!(outcome.promoted, None);
        assert_eq!(registry.active_handle("u1").await.unwrap().profile, 1);
    }

    #[tokio::test]
    async fn unbinding_the_last_handle_leaves_zero_active() {
        let (_, registry) = registry(StubVerifier::answering(true));
        registry.bind("u1", key(1), false).await.unwrap();

        let outcome = registry.unbind("u1", 1).await.unwrap();
        assert!(outcome.removed.active);
        assert_eq!(outcome.promoted, None);
        assert!(registry.list("u1").await.unwrap().is_empty());
        assert_invariant(&registry, "u1").await;
    }

    #[tokio::test]
    async fn invariant_survives_a_mixed_sequence() {
        let (_, registry) = registry(StubVerifier::answering(true));

        registry.bind("u1", key(1), false).await.unwrap();
        assert_invariant(&registry, "u1").await;
        registry.bind("u1", key(2), false).await.unwrap();
        assert_invariant(&registry, "u1").await;
        registry.switch("u1", 2).await.unwrap();
        assert_invariant(&registry, "u1").await;
        registry.bind("u1", key(3), false).await.unwrap();
        assert_invariant(&registry, "u1").await;
        registry.unbind("u1", 2).await.unwrap();
        assert_invariant(&registry, "u1").await;
        registry.unbind("u1", 1).await.unwrap();
        assert_invariant(&registry, "u1").await;
        registry.unbind("u1", 1).await.unwrap();
        assert_invariant(&registry, "u1").await;

        // Owners do not interfere with each other.
        registry.bind("u2", key(9), false).await.unwrap();
        assert_invariant(&registry, "u1").await;
        assert_invariant(&registry, "u2").await;
    }

    #[tokio::test]
    async fn lookup_reports_the_owning_user() {
        let (_, registry) = registry(StubVerifier::answering(true));
        registry.bind("u1", key(1), false).await.unwrap();

        assert_eq!(registry.lookup(key(1)).await.unwrap().as_deref(), Some("u1"));
        assert_eq!(registry.lookup(key(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn active_handle_distinguishes_missing_flag_from_missing_handles() {
        // Drive the store directly: two handles, neither active. The
        // registry never produces this state itself, but a restart after
        // a torn switch could.
        let store = Arc::new(MemoryStore::new());
        store.insert(&Handle::new("u1", key(1), false)).await.unwrap();
        store.insert(&Handle::new("u1", key(2), false)).await.unwrap();

        let registry = HandleRegistry::new(store, Arc::new(StubVerifier::answering(true)));
        let err = registry.active_handle("u1").await.unwrap_err();
        assert!(matches!(err, Error::NoActiveHandle));
        assert_eq!(err.kind(), ErrorKind::NoActiveState);
    }
}
