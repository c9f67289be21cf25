//! Handle repository over MongoDB.
//!
//! No in-memory layer here: the active flag must reflect the store on
//! every read, and registry operations re-read the owner's list anyway.

use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use tracing::debug;

use crate::database::models::{Handle, ProfileKey};
use crate::database::store::HandleStore;
use crate::database::Database;

/// Repository for account-handle records.
pub struct HandleRepository {
    collection: Collection<Handle>,
}

impl HandleRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("handles"),
        }
    }

    fn key_filter(key: ProfileKey) -> Document {
        doc! {
            "region": key.region.id() as i32,
            "realm": key.realm as i32,
            "profile": key.profile,
        }
    }
}

#[async_trait]
impl HandleStore for HandleRepository {
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Handle>> {
        // created_at has second resolution; _id breaks same-second ties so
        // 1-based selectors stay stable between reads.
        let cursor = self
            .collection
            .find(doc! { "owner_id": owner_id })
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_key(&self, key: ProfileKey) -> Result<Option<Handle>> {
        Ok(self.collection.find_one(Self::key_filter(key)).await?)
    }

    async fn insert(&self, handle: &Handle) -> Result<()> {
        self.collection.insert_one(handle).await?;
        debug!("Inserted handle {} for owner {}", handle.key(), handle.owner_id);
        Ok(())
    }

    async fn set_active(&self, key: ProfileKey, active: bool) -> Result<()> {
        self.collection
            .update_one(Self::key_filter(key), doc! { "$set": { "active": active } })
            .await?;
        Ok(())
    }

    async fn delete(&self, key: ProfileKey) -> Result<()> {
        self.collection.delete_one(Self::key_filter(key)).await?;
        debug!("Deleted handle {}", key);
        Ok(())
    }
}
