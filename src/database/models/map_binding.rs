//! Room-to-map bindings.

use serde::{Deserialize, Serialize};

use super::Region;

/// Associates one chat room with the `(region, mapId)` pair its lobby
/// queries should target. At most one binding per room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapBinding {
    /// Chat-platform room (guild/group) id.
    pub room_id: String,
    pub region: Region,
    pub map_id: i64,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

impl MapBinding {
    /// Create a binding stamped with the current time.
    pub fn new(room_id: impl Into<String>, region: Region, map_id: i64) -> Self {
        Self {
            room_id: room_id.into(),
            region,
            map_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}
