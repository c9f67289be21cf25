//! In-process caching with Moka.
//!
//! Repositories put a small typed cache in front of their MongoDB
//! collection for read-mostly data (verdicts, room bindings) and
//! invalidate on write. Freshness of *persistent* verdicts is a separate
//! concern, evaluated against the stored timestamp by the classification
//! cache; this layer only bounds repeated database reads.

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
