//! Arcade API boundary.
//!
//! [`ArcadeApi`] is the trait the feed aggregator consumes; the reqwest
//! client implements it against the live service, tests stub it.

mod client;
pub mod types;

use async_trait::async_trait;

use crate::database::models::{ProfileKey, Region};
use crate::error::Result;

use types::{ActiveLobby, LobbyRoom, MapDetails, MapPlayStat, MatchEntry, PlayerBaseEntry};

pub use client::ArcadeClient;

/// Read-only queries against the arcade lobby/profile service.
#[async_trait]
pub trait ArcadeApi: Send + Sync {
    /// Lobbies currently waiting in a region, upstream order (recency).
    async fn active_lobbies(&self, region: Region) -> Result<Vec<ActiveLobby>>;

    /// Recent lobbies of one map, newest first, with slot rosters.
    async fn lobby_history(&self, region: Region, map_id: i64) -> Result<Vec<LobbyRoom>>;

    /// Recent matches of one profile, newest first.
    async fn profile_matches(&self, key: ProfileKey) -> Result<Vec<MatchEntry>>;

    /// Per-map play counts of one profile.
    async fn most_played(&self, key: ProfileKey) -> Result<Vec<MapPlayStat>>;

    /// Per-player play counts on one map.
    async fn player_base(&self, region: Region, map_id: i64) -> Result<Vec<PlayerBaseEntry>>;

    /// Map details (patch notes and friends).
    async fn map_details(&self, region: Region, map_id: i64) -> Result<MapDetails>;
}
