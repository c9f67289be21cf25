//! Cached classifier verdicts.

use serde::{Deserialize, Serialize};

/// A stored classification verdict for one piece of text.
///
/// The raw text is the cache key, matched verbatim, with no normalization.
/// Entries are only ever overwritten on refresh, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// The classified text (a player name), exact-match key.
    pub name: String,
    /// Classifier verdict.
    pub is_sensitive: bool,
    /// Unix timestamp (seconds) of when the verdict was produced.
    pub checked_at: i64,
}

impl ClassificationEntry {
    /// Create an entry stamped with the current time.
    pub fn now(name: impl Into<String>, is_sensitive: bool) -> Self {
        Self {
            name: name.into(),
            is_sensitive,
            checked_at: chrono::Utc::now().timestamp(),
        }
    }
}
