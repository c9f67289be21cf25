//! Store traits consumed by the registry, the classification cache and the
//! command layer.
//!
//! Only equality lookups are required of a backend; no range queries,
//! joins or aggregations. Backends provide whatever single-row atomicity
//! they natively have; callers do not get transactions.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{ClassificationEntry, Handle, MapBinding, ProfileKey};

/// CRUD over handle records.
#[async_trait]
pub trait HandleStore: Send + Sync {
    /// All handles of one owner, in insertion order. The 1-based selectors
    /// of switch/unbind index into exactly this order.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Handle>>;

    /// Find a handle by its globally unique account triple.
    async fn find_by_key(&self, key: ProfileKey) -> Result<Option<Handle>>;

    /// Insert a new handle record.
    async fn insert(&self, handle: &Handle) -> Result<()>;

    /// Flip the active flag of the handle with this triple.
    async fn set_active(&self, key: ProfileKey, active: bool) -> Result<()>;

    /// Delete the handle with this triple.
    async fn delete(&self, key: ProfileKey) -> Result<()>;
}

/// Lookup/overwrite of cached classifier verdicts.
#[async_trait]
pub trait VerdictStore: Send + Sync {
    /// Exact-match lookup of a stored verdict.
    async fn get(&self, name: &str) -> Result<Option<ClassificationEntry>>;

    /// Insert or overwrite the verdict for the entry's name.
    async fn upsert(&self, entry: &ClassificationEntry) -> Result<()>;
}

/// CRUD over room-to-map bindings.
#[async_trait]
pub trait MapBindingStore: Send + Sync {
    /// The binding of one room, if any.
    async fn get(&self, room_id: &str) -> Result<Option<MapBinding>>;

    /// Insert or replace the binding of the binding's room.
    async fn upsert(&self, binding: &MapBinding) -> Result<()>;

    /// Remove a room's binding. Returns whether one existed.
    async fn remove(&self, room_id: &str) -> Result<bool>;
}
