use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ParsedPlayer;

/// Player row in the WingStats `POST /games` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlayerScore {
    pub name: String,
    pub birds: i64,
    pub bonus: i64,
    pub end_of_round: i64,
    pub eggs: i64,
    pub cached_food: i64,
    pub tucked_cards: i64,
    pub nectar: i64,
    pub duet_tokens: i64,
}

impl From<&ParsedPlayer> for ApiPlayerScore {
    fn from(player: &ParsedPlayer) -> Self {
        let scores = &player.scores;
        Self {
            name: player.name.clone(),
            birds: scores.bird_points,
            bonus: scores.bonus,
            end_of_round: scores.end_of_round,
            eggs: scores.egg,
            cached_food: scores.cache,
            tucked_cards: scores.tuck,
            nectar: scores.nectar,
            duet_tokens: scores.duet_pts,
        }
    }
}

/// `POST /games` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub played_at: DateTime<Utc>,
    pub players: Vec<ApiPlayerScore>,
    /// `Discord:<username>`
    pub uploaded_by: String,
}

impl NewGame {
    /// Build a game played now from canonicalized players
    pub fn from_players(players: &[ParsedPlayer], uploader: &str) -> Self {
        Self {
            played_at: Utc::now(),
            players: players.iter().map(ApiPlayerScore::from).collect(),
            uploaded_by: format!("Discord:{}", uploader),
        }
    }
}

/// `POST /games` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameCreated {
    #[serde(default)]
    pub game: Option<GameRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameRef {
    /// Numeric or string id depending on the API version
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl GameCreated {
    /// Game id for links, `unknown` when the API omitted it
    pub fn game_id(&self) -> String {
        match self.game.as_ref().and_then(|g| g.id.as_ref()) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// `GET /players/{name}` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub stats: PlayerStats,

    #[serde(default)]
    pub identity: PlayerIdentity,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub games_played: i64,
    #[serde(default)]
    pub total_wins: i64,
    /// Fraction (0.0-1.0) on current API versions, percentage on older ones
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub high_score: i64,
    #[serde(default)]
    pub low_score: i64,
}

impl PlayerStats {
    /// Win rate as a percentage
    pub fn win_rate_percent(&self) -> f64 {
        if self.win_rate <= 1.0 {
            self.win_rate * 100.0
        } else {
            self.win_rate
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    #[serde(default)]
    pub discord_username: Option<String>,
    #[serde(default)]
    pub wingspan_names: Vec<String>,
}

/// `GET /players` response body, sorted by average score
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub players: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub discord_username: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub games_played: i64,
    #[serde(default)]
    pub total_wins: i64,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl LeaderboardEntry {
    /// Discord username when linked, otherwise the Wingspan name
    pub fn display_name(&self) -> &str {
        self.discord_username
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.player_name.as_deref())
            .unwrap_or("Unknown")
    }
}

/// `GET /games?limit=n` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentGamesResponse {
    #[serde(default)]
    pub games: Vec<RecentGame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentGame {
    #[serde(default)]
    pub played_at: Option<String>,
    #[serde(default)]
    pub players: Vec<RecentGamePlayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentGamePlayer {
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default)]
    pub is_winner: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScoreBreakdown;

    #[test]
    fn test_new_game_payload_shape() {
        let player = ParsedPlayer {
            name: "Lucy".to_string(),
            scores: ScoreBreakdown {
                bird_points: 50,
                cache: 3,
                tuck: 7,
                duet_pts: 2,
                ..Default::default()
            },
            total: 62,
        };

        let game = NewGame::from_players(&[player], "lucy.b");
        let json = serde_json::to_value(&game).unwrap();

        assert_eq!(json["uploadedBy"], "Discord:lucy.b");
        assert!(json["playedAt"].is_string());
        let row = &json["players"][0];
        assert_eq!(row["name"], "Lucy");
        assert_eq!(row["birds"], 50);
        assert_eq!(row["cachedFood"], 3);
        assert_eq!(row["tuckedCards"], 7);
        assert_eq!(row["duetTokens"], 2);
        assert_eq!(row["endOfRound"], 0);
    }

    #[test]
    fn test_game_id_variants() {
        let created: GameCreated = serde_json::from_str(r#"{"game": {"id": 17}}"#).unwrap();
        assert_eq!(created.game_id(), "17");

        let created: GameCreated = serde_json::from_str(r#"{"game": {"id": "abc"}}"#).unwrap();
        assert_eq!(created.game_id(), "abc");

        let created: GameCreated = serde_json::from_str("{}").unwrap();
        assert_eq!(created.game_id(), "unknown");
    }

    #[test]
    fn test_win_rate_percent() {
        let stats = PlayerStats { win_rate: 0.25, ..Default::default() };
        assert_eq!(stats.win_rate_percent(), 25.0);

        let stats = PlayerStats { win_rate: 40.0, ..Default::default() };
        assert_eq!(stats.win_rate_percent(), 40.0);
    }

    #[test]
    fn test_leaderboard_display_name() {
        let entry: LeaderboardEntry =
            serde_json::from_str(r#"{"playerName": "Lucy", "discordUsername": null}"#).unwrap();
        assert_eq!(entry.display_name(), "Lucy");

        let entry: LeaderboardEntry =
            serde_json::from_str(r#"{"playerName": "Lucy", "discordUsername": "lucy.b"}"#).unwrap();
        assert_eq!(entry.display_name(), "lucy.b");

        assert_eq!(LeaderboardEntry::default().display_name(), "Unknown");
    }
}
