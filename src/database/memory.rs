//! In-memory store backend.
//!
//! Implements all store traits over plain collections guarded by
//! `parking_lot` locks. Used by the unit tests and by embedders that want
//! the plugin without a database. Handle insertion order is preserved,
//! matching the ordering contract of [`HandleStore::list_for_owner`].

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::models::{ClassificationEntry, Handle, MapBinding, ProfileKey};
use super::store::{HandleStore, MapBindingStore, VerdictStore};

/// Process-local store holding every table this crate uses.
#[derive(Debug, Default)]
pub struct MemoryStore {
    handles: RwLock<Vec<Handle>>,
    verdicts: RwLock<HashMap<String, ClassificationEntry>>,
    bindings: RwLock<HashMap<String, MapBinding>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HandleStore for MemoryStore {
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Handle>> {
        let handles = self.handles.read();
        Ok(handles
            .iter()
            .filter(|h| h.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_key(&self, key: ProfileKey) -> Result<Option<Handle>> {
        let handles = self.handles.read();
        Ok(handles.iter().find(|h| h.key() == key).cloned())
    }

    async fn insert(&self, handle: &Handle) -> Result<()> {
        self.handles.write().push(handle.clone());
        Ok(())
    }

    async fn set_active(&self, key: ProfileKey, active: bool) -> Result<()> {
        let mut handles = self.handles.write();
        for h in handles.iter_mut().filter(|h| h.key() == key) {
            h.active = active;
        }
        Ok(())
    }

    async fn delete(&self, key: ProfileKey) -> Result<()> {
        self.handles.write().retain(|h| h.key() != key);
        Ok(())
    }
}

#[async_trait]
impl VerdictStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<ClassificationEntry>> {
        Ok(self.verdicts.read().get(name).cloned())
    }

    async fn upsert(&self, entry: &ClassificationEntry) -> Result<()> {
        self.verdicts
            .write()
            .insert(entry.name.clone(), entry.clone());
        Ok(())
    }
}

#[async_trait]
impl MapBindingStore for MemoryStore {
    async fn get(&self, room_id: &str) -> Result<Option<MapBinding>> {
        Ok(self.bindings.read().get(room_id).cloned())
    }

    async fn upsert(&self, binding: &MapBinding) -> Result<()> {
        self.bindings
            .write()
            .insert(binding.room_id.clone(), binding.clone());
        Ok(())
    }

    async fn remove(&self, room_id: &str) -> Result<bool> {
        Ok(self.bindings.write().remove(room_id).is_some())
    }
}
