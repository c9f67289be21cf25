//! Wire types for the arcade API.
//!
//! Shapes are kept loose on purpose: the upstream answers either a bare
//! array or a `{results: [...]}` page depending on endpoint, and several
//! fields come and go between API revisions.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A response body that is either a bare array or a results page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResultsPage<T> {
    Wrapped { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ResultsPage<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { results } => results,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapInfo {
    pub name: String,
}

/// One lobby from `/lobbies/active`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLobby {
    pub map: MapInfo,
    pub slots_humans_taken: u32,
    pub slots_humans_total: u32,
}

/// Slot occupant kind. Anything the API adds later lands in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Human,
    Ai,
    Open,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbySlot {
    pub kind: SlotKind,
    pub slot_number: u32,
    #[serde(default)]
    pub name: Option<String>,
}

/// One room from `/lobbies/history` with `includeSlots=true`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyRoom {
    pub status: String,
    pub slots_humans_taken: u32,
    pub slots_humans_total: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub slots: Vec<LobbySlot>,
}

/// One entry from `/profiles/{...}/matches`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchEntry {
    pub map: MapInfo,
    pub decision: String,
}

/// One entry from `/profiles/{...}/most-played`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPlayStat {
    pub map: MapInfo,
    pub lobbies_started: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInfo {
    pub name: String,
}

/// One entry from `/maps/{...}/player-base`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBaseEntry {
    pub profile: ProfileInfo,
    pub lobbies_started: u64,
}

/// `/maps/{region}/{id}/details` - only the patch-note branch is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDetails {
    pub info: MapDetailsInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDetailsInfo {
    #[serde(default)]
    pub arcade_info: Option<ArcadeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcadeInfo {
    #[serde(default)]
    pub patch_note_sections: Vec<PatchNoteSection>,
}

/// Patch-note items arrive as a mixed array; non-strings are dropped
/// downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNoteSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_accepts_both_shapes() {
        let bare: ResultsPage<MapPlayStat> = serde_json::from_str(
            r#"[{"map": {"name": "Direct Strike"}, "lobbiesStarted": 12}]"#,
        )
        .unwrap();
        assert_eq!(bare.into_vec().len(), 1);

        let wrapped: ResultsPage<MapPlayStat> = serde_json::from_str(
            r#"{"results": [{"map": {"name": "Direct Strike"}, "lobbiesStarted": 12}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_vec()[0].lobbies_started, 12);
    }

    #[test]
    fn unknown_slot_kinds_do_not_fail() {
        let slot: LobbySlot =
            serde_json::from_str(r#"{"kind": "observer", "slotNumber": 3}"#).unwrap();
        assert_eq!(slot.kind, SlotKind::Unknown);
        assert_eq!(slot.name, None);
    }

    #[test]
    fn room_parses_with_slots() {
        let room: LobbyRoom = serde_json::from_str(
            r#"{
                "status": "open",
                "slotsHumansTaken": 1,
                "slotsHumansTotal": 4,
                "createdAt": "2024-03-05T12:00:00.000Z",
                "slots": [{"kind": "human", "slotNumber": 1, "name": "Alice"}]
            }"#,
        )
        .unwrap();
        assert_eq!(room.slots.len(), 1);
        assert_eq!(room.slots[0].name.as_deref(), Some("Alice"));
    }
}
