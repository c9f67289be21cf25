//! Map-binding repository with on-demand caching.
//!
//! Bindings change rarely (admin action) and are read on every lobby
//! query for the room, so they get a longer in-memory window.

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::models::MapBinding;
use crate::database::store::MapBindingStore;
use crate::database::Database;

/// Repository for room-to-map bindings.
pub struct MapBindingRepository {
    collection: Collection<MapBinding>,
    cache: TypedCache<String, MapBinding>,
}

impl MapBindingRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("map_bindings"),
            cache: TypedCache::new("map_bindings", CacheConfig::bindings()),
        }
    }
}

#[async_trait]
impl MapBindingStore for MapBindingRepository {
    async fn get(&self, room_id: &str) -> Result<Option<MapBinding>> {
        if let Some(binding) = self.cache.get(&room_id.to_string()) {
            return Ok(Some(binding));
        }

        let result = self.collection.find_one(doc! { "room_id": room_id }).await?;

        if let Some(binding) = &result {
            self.cache.insert(room_id.to_string(), binding.clone());
        }

        Ok(result)
    }

    async fn upsert(&self, binding: &MapBinding) -> Result<()> {
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .replace_one(doc! { "room_id": &binding.room_id }, binding)
            .with_options(options)
            .await?;

        self.cache.insert(binding.room_id.clone(), binding.clone());
        debug!(
            "Bound room {} to map {}/{}",
            binding.room_id,
            binding.region.id(),
            binding.map_id
        );

        Ok(())
    }

    async fn remove(&self, room_id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "room_id": room_id }).await?;
        self.cache.invalidate(&room_id.to_string());

        if result.deleted_count > 0 {
            debug!("Unbound map for room {}", room_id);
        }

        Ok(result.deleted_count > 0)
    }
}
