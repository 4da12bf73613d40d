use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::core::{GameCreated, LeaderboardResponse, NewGame, PlayerProfile, RecentGamesResponse};
use crate::error::{Result, WingStatsError};
use crate::providers::{upstream_error, GameApi};

const SERVICE: &str = "wingstats";

/// WingStats REST API client
pub struct WingStatsClient {
    client: Client,
    base_url: String,
}

impl WingStatsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| WingStatsError::from_request(SERVICE, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| WingStatsError::from_request(SERVICE, e))?;

        if response.status() != StatusCode::OK {
            return Err(upstream_error(SERVICE, response).await);
        }

        Self::read_json(response).await
    }
}

#[async_trait]
impl GameApi for WingStatsClient {
    async fn create_game(&self, game: &NewGame) -> Result<GameCreated> {
        let url = format!("{}/games", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(game)
            .send()
            .await
            .map_err(|e| WingStatsError::from_request(SERVICE, e))?;

        if !matches!(response.status(), StatusCode::OK | StatusCode::CREATED) {
            return Err(upstream_error(SERVICE, response).await);
        }

        let created: GameCreated = Self::read_json(response).await?;
        tracing::info!("✅ Game {} recorded ({} players)", created.game_id(), game.players.len());
        Ok(created)
    }

    async fn player_profile(&self, name: &str) -> Result<PlayerProfile> {
        let url = format!("{}/players/{}", self.base_url, urlencoding::encode(name));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WingStatsError::from_request(SERVICE, e))?;

        match response.status() {
            StatusCode::OK => Self::read_json(response).await,
            StatusCode::NOT_FOUND => Err(WingStatsError::PlayerNotFound(name.to_string())),
            _ => Err(upstream_error(SERVICE, response).await),
        }
    }

    async fn leaderboard(&self) -> Result<LeaderboardResponse> {
        let url = format!("{}/players", self.base_url);
        self.get_json(self.client.get(&url)).await
    }

    async fn recent_games(&self, limit: usize) -> Result<RecentGamesResponse> {
        let url = format!("{}/games", self.base_url);
        self.get_json(self.client.get(&url).query(&[("limit", limit)])).await
    }
}
