//! HTTP client for the arcade API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::database::models::{ProfileKey, Region};
use crate::error::{Error, Result};
use crate::handles::ProfileVerifier;

use super::types::{
    ActiveLobby, LobbyRoom, MapDetails, MapPlayStat, MatchEntry, PlayerBaseEntry, ResultsPage,
};
use super::ArcadeApi;

/// Reqwest-backed arcade API client.
///
/// All failures, including non-2xx statuses, surface as
/// [`Error::Upstream`]; the one exception is the 404 of the bind-time
/// profile check, which is an answer, not a failure.
pub struct ArcadeClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArcadeClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.http
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(Error::upstream)?
            .error_for_status()
            .map_err(Error::upstream)?
            .json()
            .await
            .map_err(Error::upstream)
    }
}

#[async_trait]
impl ArcadeApi for ArcadeClient {
    async fn active_lobbies(&self, region: Region) -> Result<Vec<ActiveLobby>> {
        let page: ResultsPage<ActiveLobby> = self
            .get_json(
                "/lobbies/active",
                &[
                    ("regionId", region.id().to_string()),
                    ("includeMapInfo", "true".into()),
                ],
            )
            .await?;
        Ok(page.into_vec())
    }

    async fn lobby_history(&self, region: Region, map_id: i64) -> Result<Vec<LobbyRoom>> {
        let page: ResultsPage<LobbyRoom> = self
            .get_json(
                "/lobbies/history",
                &[
                    ("regionId", region.id().to_string()),
                    ("mapId", map_id.to_string()),
                    ("orderDirection", "desc".into()),
                    ("includeSlots", "true".into()),
                ],
            )
            .await?;
        Ok(page.into_vec())
    }

    async fn profile_matches(&self, key: ProfileKey) -> Result<Vec<MatchEntry>> {
        let path = format!(
            "/profiles/{}/{}/{}/matches",
            key.region.id(),
            key.realm,
            key.profile
        );
        let page: ResultsPage<MatchEntry> = self
            .get_json(&path, &[("orderDirection", "desc".into())])
            .await?;
        Ok(page.into_vec())
    }

    async fn most_played(&self, key: ProfileKey) -> Result<Vec<MapPlayStat>> {
        let path = format!(
            "/profiles/{}/{}/{}/most-played",
            key.region.id(),
            key.realm,
            key.profile
        );
        let page: ResultsPage<MapPlayStat> = self.get_json(&path, &[]).await?;
        Ok(page.into_vec())
    }

    async fn player_base(&self, region: Region, map_id: i64) -> Result<Vec<PlayerBaseEntry>> {
        let path = format!("/maps/{}/{map_id}/player-base", region.id());
        let page: ResultsPage<PlayerBaseEntry> = self
            .get_json(
                &path,
                &[
                    ("orderBy", "lobbiesStarted".into()),
                    ("orderDirection", "desc".into()),
                ],
            )
            .await?;
        Ok(page.into_vec())
    }

    async fn map_details(&self, region: Region, map_id: i64) -> Result<MapDetails> {
        let path = format!("/maps/{}/{map_id}/details", region.id());
        self.get_json(&path, &[("locale", "zhCN".into())]).await
    }
}

#[async_trait]
impl ProfileVerifier for ArcadeClient {
    async fn profile_exists(&self, key: ProfileKey) -> Result<bool> {
        let url = format!(
            "{}/profiles/{}/{}/{}",
            self.base_url,
            key.region.id(),
            key.realm,
            key.profile
        );
        let response = self.http.get(url).send().await.map_err(Error::upstream)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response.error_for_status().map_err(Error::upstream)?;
        Ok(true)
    }
}
