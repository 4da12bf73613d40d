pub mod attachment;
pub mod giphy;
pub mod scorebird;
pub mod wingstats;

use async_trait::async_trait;
use crate::core::{
    GameCreated, LeaderboardResponse, NewGame, ParseResponse, PlayerProfile, RecentGamesResponse,
};
use crate::error::{Result, WingStatsError};

pub use attachment::HttpImageFetcher;
pub use giphy::GiphyProvider;
pub use scorebird::ScoreBirdClient;
pub use wingstats::WingStatsClient;

/// Downloads scorecard attachments
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Reads a scorecard image into players and winners
#[async_trait]
pub trait ScorecardParser: Send + Sync {
    async fn parse(&self, image: &[u8]) -> Result<ParseResponse>;

    /// Parser name for logging
    fn name(&self) -> &str;
}

/// WingStats game-tracking API
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Record a game
    async fn create_game(&self, game: &NewGame) -> Result<GameCreated>;

    /// Stats for a Discord username or Wingspan name
    async fn player_profile(&self, name: &str) -> Result<PlayerProfile>;

    /// All players, best average first
    async fn leaderboard(&self) -> Result<LeaderboardResponse>;

    /// Most recent games, newest first
    async fn recent_games(&self, limit: usize) -> Result<RecentGamesResponse>;
}

/// Random GIF lookup by tag
#[async_trait]
pub trait GifProvider: Send + Sync {
    /// `Ok(None)` when the search found nothing
    async fn random_gif(&self, tag: &str) -> Result<Option<String>>;
}

/// Turn a non-success response into `Upstream`, keeping the body text
pub(crate) async fn upstream_error(service: &str, response: reqwest::Response) -> WingStatsError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body
    };

    WingStatsError::Upstream {
        service: service.to_string(),
        message,
    }
}
