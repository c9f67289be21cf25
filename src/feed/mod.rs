//! Lobby and profile feed projections.
//!
//! Stateless read-side queries over the arcade API, producing bounded,
//! display-ready values. Player names in rosters are screened through the
//! classification cache before they leave this module; an upstream fetch
//! failure fails the whole query, never a partial result.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;

use crate::arcade::types::{LobbyRoom, LobbySlot, SlotKind};
use crate::arcade::ArcadeApi;
use crate::classify::ClassificationCache;
use crate::database::models::{ProfileKey, Region};
use crate::error::{Error, Result};

/// Replacement suffix for redacted names.
const MASK: &str = "***";

/// Caps per query. History caps are asymmetric on purpose: started rooms
/// are noisier than waiting ones.
const ACTIVE_CAP: usize = 20;
const HISTORY_OPEN_CAP: usize = 20;
const HISTORY_STARTED_CAP: usize = 5;
const MOST_PLAYED_CAP: usize = 10;

/// Which lobby-history rooms a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    /// Still waiting for players.
    Open,
    /// Already launched.
    Started,
}

impl LobbyPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Started => "started",
        }
    }

    fn cap(self) -> usize {
        match self {
            Self::Open => HISTORY_OPEN_CAP,
            Self::Started => HISTORY_STARTED_CAP,
        }
    }
}

/// One currently waiting lobby.
#[derive(Debug, Clone, PartialEq)]
pub struct LobbySummary {
    pub map_name: String,
    pub humans_taken: u32,
    pub humans_total: u32,
}

/// One occupant of a room roster, already screened.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotEntry {
    pub number: u32,
    pub display_name: String,
}

/// One room from lobby history with its screened roster.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub humans_taken: u32,
    pub humans_total: u32,
    pub created_at: DateTime<Utc>,
    pub slots: Vec<SlotEntry>,
}

/// One map in a play-count ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedMap {
    pub map_name: String,
    pub lobbies_started: u64,
}

/// One player in a map's player base.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCount {
    pub player_name: String,
    pub lobbies_started: u64,
}

/// Match result. Codes outside the known four pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Left,
    Win,
    Loss,
    Tie,
    Other(String),
}

impl MatchOutcome {
    fn from_code(code: &str) -> Self {
        match code {
            "left" => Self::Left,
            "win" => Self::Win,
            "loss" => Self::Loss,
            "tie" => Self::Tie,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One played match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub map_name: String,
    pub outcome: MatchOutcome,
}

/// One patch-note section of a map, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchNote {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<String>,
}

/// Read-side queries over lobbies, profiles and map stats.
pub struct FeedAggregator {
    api: Arc<dyn ArcadeApi>,
    names: Arc<ClassificationCache>,
}

impl FeedAggregator {
    pub fn new(api: Arc<dyn ArcadeApi>, names: Arc<ClassificationCache>) -> Self {
        Self { api, names }
    }

    /// Lobbies currently waiting in a region, first 20 in upstream order.
    pub async fn active_lobbies(&self, region: Region) -> Result<Vec<LobbySummary>> {
        let mut lobbies = self.api.active_lobbies(region).await?;
        lobbies.truncate(ACTIVE_CAP);

        Ok(lobbies
            .into_iter()
            .map(|lobby| LobbySummary {
                map_name: lobby.map.name,
                humans_taken: lobby.slots_humans_taken,
                humans_total: lobby.slots_humans_total,
            })
            .collect())
    }

    /// Recent rooms of one map in the given phase, occupied rooms only,
    /// rosters screened. Room order follows the upstream (newest first);
    /// slot order follows slot numbers.
    pub async fn lobby_history(
        &self,
        region: Region,
        map_id: i64,
        phase: LobbyPhase,
    ) -> Result<Vec<RoomSummary>> {
        let rooms: Vec<LobbyRoom> = self
            .api
            .lobby_history(region, map_id)
            .await?
            .into_iter()
            .filter(|room| room.status == phase.as_str() && room.slots_humans_taken > 0)
            .take(phase.cap())
            .collect();

        // Redactions fan out per room and per slot, but every roster is
        // complete before its summary is emitted.
        try_join_all(rooms.iter().map(|room| self.room_summary(room))).await
    }

    /// Top 10 maps of one profile by lobbies started.
    pub async fn most_played(&self, key: ProfileKey) -> Result<Vec<PlayedMap>> {
        let mut maps: Vec<_> = self
            .api
            .most_played(key)
            .await?
            .into_iter()
            .filter(|stat| stat.lobbies_started > 0)
            .collect();

        // Stable sort: upstream order breaks ties.
        maps.sort_by(|a, b| b.lobbies_started.cmp(&a.lobbies_started));
        maps.truncate(MOST_PLAYED_CAP);

        Ok(maps
            .into_iter()
            .map(|stat| PlayedMap {
                map_name: stat.map.name,
                lobbies_started: stat.lobbies_started,
            })
            .collect())
    }

    /// Every player who started at least one lobby on the map, sorted
    /// descending. Deliberately uncapped, unlike [`Self::most_played`].
    pub async fn player_base(&self, region: Region, map_id: i64) -> Result<Vec<PlayerCount>> {
        let mut players: Vec<_> = self
            .api
            .player_base(region, map_id)
            .await?
            .into_iter()
            .filter(|entry| entry.lobbies_started > 0)
            .collect();

        players.sort_by(|a, b| b.lobbies_started.cmp(&a.lobbies_started));

        Ok(players
            .into_iter()
            .map(|entry| PlayerCount {
                player_name: entry.profile.name,
                lobbies_started: entry.lobbies_started,
            })
            .collect())
    }

    /// Recent matches of one profile, newest first, outcomes mapped.
    pub async fn match_history(&self, key: ProfileKey) -> Result<Vec<MatchSummary>> {
        Ok(self
            .api
            .profile_matches(key)
            .await?
            .into_iter()
            .map(|entry| MatchSummary {
                map_name: entry.map.name,
                outcome: MatchOutcome::from_code(&entry.decision),
            })
            .collect())
    }

    /// Patch-note sections of a map, newest first by their date-like
    /// subtitle. Sections without a parseable date keep their upstream
    /// order at the end.
    pub async fn patch_notes(&self, region: Region, map_id: i64) -> Result<Vec<PatchNote>> {
        let details = self.api.map_details(region, map_id).await?;

        let mut notes: Vec<PatchNote> = details
            .info
            .arcade_info
            .map(|info| info.patch_note_sections)
            .unwrap_or_default()
            .into_iter()
            .map(|section| PatchNote {
                items: section
                    .items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
                title: section.title,
                subtitle: section.subtitle,
            })
            .collect();

        notes.sort_by_key(|note| Reverse(parse_note_date(&note.subtitle)));
        Ok(notes)
    }

    async fn room_summary(&self, room: &LobbyRoom) -> Result<RoomSummary> {
        let mut humans: Vec<&LobbySlot> = room
            .slots
            .iter()
            .filter(|slot| slot.kind == SlotKind::Human)
            .collect();
        humans.sort_by_key(|slot| slot.slot_number);

        let slots = try_join_all(humans.into_iter().map(|slot| async move {
            Ok::<_, Error>(SlotEntry {
                number: slot.slot_number,
                display_name: self.display_name(slot.name.as_deref()).await?,
            })
        }))
        .await?;

        Ok(RoomSummary {
            humans_taken: room.slots_humans_taken,
            humans_total: room.slots_humans_total,
            created_at: room.created_at,
            slots,
        })
    }

    /// Screen one occupant name. Sensitive names keep their first
    /// character; missing names degrade to the bare mask.
    async fn display_name(&self, name: Option<&str>) -> Result<String> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(MASK.to_string());
        };

        if self.names.classify(name).await? {
            Ok(match name.chars().next() {
                Some(first) => format!("{first}{MASK}"),
                None => MASK.to_string(),
            })
        } else {
            Ok(name.to_string())
        }
    }
}

/// Parse subtitles like `2024年3月5日` (or `2024-3-5`) into a date.
fn parse_note_date(subtitle: &str) -> Option<NaiveDate> {
    let normalized = subtitle
        .trim()
        .replace('年', "-")
        .replace('月', "-")
        .replace('日', "");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()
}
