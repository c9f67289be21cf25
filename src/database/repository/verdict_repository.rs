//! Verdict repository with an in-memory hot layer.
//!
//! The persistent table is the source of truth (it survives restarts and
//! carries `checked_at` for the staleness policy); the Moka layer only
//! absorbs repeated reads for names that recur within a roster.

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::models::ClassificationEntry;
use crate::database::store::VerdictStore;
use crate::database::Database;

/// Repository for cached classifier verdicts.
pub struct VerdictRepository {
    collection: Collection<ClassificationEntry>,
    cache: TypedCache<String, ClassificationEntry>,
}

impl VerdictRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("sensitive_names"),
            cache: TypedCache::new("verdicts", CacheConfig::verdicts()),
        }
    }
}

#[async_trait]
impl VerdictStore for VerdictRepository {
    async fn get(&self, name: &str) -> Result<Option<ClassificationEntry>> {
        if let Some(entry) = self.cache.get(&name.to_string()) {
            return Ok(Some(entry));
        }

        let result = self.collection.find_one(doc! { "name": name }).await?;

        if let Some(entry) = &result {
            self.cache.insert(name.to_string(), entry.clone());
        }

        Ok(result)
    }

    async fn upsert(&self, entry: &ClassificationEntry) -> Result<()> {
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .replace_one(doc! { "name": &entry.name }, entry)
            .with_options(options)
            .await?;

        self.cache.insert(entry.name.clone(), entry.clone());
        debug!("Stored verdict for {:?}: {}", entry.name, entry.is_sensitive);

        Ok(())
    }
}
