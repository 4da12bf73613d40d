pub mod game;
pub mod scorecard;

pub use game::{
    ApiPlayerScore, GameCreated, LeaderboardEntry, LeaderboardResponse, NewGame, PlayerProfile,
    PlayerStats, RecentGame, RecentGamesResponse,
};
pub use scorecard::{ParseRequest, ParseResponse, ParsedPlayer, ScoreBreakdown};
