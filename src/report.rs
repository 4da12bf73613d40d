//! Text rendering for announcements, leaderboards and stat cards.
//!
//! Everything here is plain data so the Discord adapter and the CLI render
//! the same content.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::core::{LeaderboardEntry, ParsedPlayer, PlayerProfile, RecentGame};
use crate::ranking::{assign_competition_ranks, Medal, RankedEntry};

pub const COLOR_BLUE: u32 = 0x3498db;
pub const COLOR_GOLD: u32 = 0xf1c40f;
pub const COLOR_GREEN: u32 = 0x2ecc71;

/// Leaderboard shows the top N players
pub const LEADERBOARD_SIZE: usize = 10;

/// Embed-like card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<CardField>,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Card {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
            color,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl ToString, inline: bool) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.to_string(),
            inline,
        });
        self
    }

    /// Plain-text rendering (CLI, logs)
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.title.clone()];
        if let Some(description) = &self.description {
            lines.push(description.clone());
        }
        for field in &self.fields {
            lines.push(format!("{}: {}", field.name, field.value));
        }
        lines.join("\n")
    }
}

pub fn game_url(site_base_url: &str, game_id: &str) -> String {
    format!("{}/games/{}", site_base_url.trim_end_matches('/'), game_id)
}

/// `"{rank}. {name} - {score} pts{ medal}"`
pub fn ranked_line(entry: &RankedEntry<ParsedPlayer>) -> String {
    let medal = entry
        .medal()
        .map(|m| format!(" {}", m.emoji()))
        .unwrap_or_default();
    format!("{}. {} - {} pts{}", entry.rank, entry.item.name, entry.item.total, medal)
}

pub fn winner_line(winners: &[String]) -> Option<String> {
    if winners.is_empty() {
        return None;
    }
    Some(format!(":trophy: Winner: **{}**", winners.join(", ")))
}

/// Post-submission announcement
pub fn announcement(ranked: &[RankedEntry<ParsedPlayer>], winners: &[String], game_url: &str) -> String {
    let mut lines = vec!["**Game Recorded!**\n".to_string()];
    lines.extend(ranked.iter().map(ranked_line));

    if let Some(winner) = winner_line(winners) {
        lines.push(format!("\n{}", winner));
    }
    lines.push(format!("\n:link: {}", game_url));

    lines.join("\n")
}

/// Leaderboard lines for the first [`LEADERBOARD_SIZE`] entries, in API order
pub fn leaderboard_lines(entries: &[LeaderboardEntry]) -> Vec<String> {
    let top: Vec<&LeaderboardEntry> = entries.iter().take(LEADERBOARD_SIZE).collect();

    assign_competition_ranks(top, |e| e.average_score)
        .into_iter()
        .map(|ranked| {
            let entry = ranked.item;
            let medal = Medal::for_rank(ranked.rank)
                .map(|m| format!("{} ", m.emoji()))
                .unwrap_or_default();
            let accounts = if entry.aliases.len() > 1 {
                format!(" ({} accounts)", entry.aliases.len())
            } else {
                String::new()
            };

            format!(
                "{}**{}. {}**{} - Avg: {:.1} | Games: {} | Wins: {}",
                medal,
                ranked.rank,
                entry.display_name(),
                accounts,
                entry.average_score,
                entry.games_played,
                entry.total_wins
            )
        })
        .collect()
}

pub fn leaderboard_card(entries: &[LeaderboardEntry]) -> Card {
    let mut card = Card::new("WingStats Leaderboard", COLOR_GOLD);
    card.description = Some(leaderboard_lines(entries).join("\n"));
    card
}

/// Stats card for `/stats`; `lookup_name` is the fallback title
pub fn stats_card(profile: &PlayerProfile, lookup_name: &str) -> Card {
    let stats = &profile.stats;
    let display_name = profile
        .identity
        .discord_username
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(stats.player_name.as_deref())
        .unwrap_or(lookup_name);

    let mut card = Card::new(format!("Stats for {}", display_name), COLOR_BLUE)
        .field("Games Played", stats.games_played, true)
        .field("Wins", stats.total_wins, true)
        .field("Win Rate", format!("{:.1}%", stats.win_rate_percent()), true)
        .field("Avg Score", format!("{:.1}", stats.average_score), true)
        .field("High Score", stats.high_score, true)
        .field("Low Score", stats.low_score, true);

    let aliases = &profile.identity.wingspan_names;
    if aliases.len() > 1 {
        card.description = Some(format!("*Accounts: {}*", aliases.join(", ")));
    }

    card
}

const DATE_FORMAT: &str = "%b %d, %Y";

/// `Jan 05, 2025` from an ISO timestamp or date, else its first 10 characters
pub fn format_played_at(played_at: Option<&str>) -> String {
    let Some(raw) = played_at else {
        return "Unknown date".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DATE_FORMAT).to_string();
    }
    // ISO timestamps without an offset, and bare dates
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DATE_FORMAT).to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(_) => raw.chars().take(10).collect(),
    }
}

/// Card field for one recent game, players sorted by score
pub fn recent_game_field(game: &RecentGame) -> CardField {
    let mut players: Vec<_> = game.players.iter().collect();
    players.sort_by(|a, b| b.total_score.cmp(&a.total_score));

    let lines: Vec<String> = players
        .iter()
        .map(|p| {
            let trophy = if p.is_winner { " :trophy:" } else { "" };
            format!(
                "{}: {}{}",
                p.player_name.as_deref().unwrap_or("Unknown"),
                p.total_score,
                trophy
            )
        })
        .collect();

    CardField {
        name: format_played_at(game.played_at.as_deref()),
        value: if lines.is_empty() {
            "No players".to_string()
        } else {
            lines.join("\n")
        },
        inline: false,
    }
}

pub fn recent_games_card(games: &[RecentGame]) -> Card {
    let mut card = Card::new(format!("Recent Games (Last {})", games.len()), COLOR_GREEN);
    card.fields = games.iter().map(recent_game_field).collect();
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::{PlayerIdentity, PlayerStats, RecentGamePlayer};
    use crate::ranking::rank_by_score;

    fn ranked(players: &[(&str, i64)]) -> Vec<RankedEntry<ParsedPlayer>> {
        let players: Vec<ParsedPlayer> = players.iter().map(|(n, t)| ParsedPlayer::new(*n, *t)).collect();
        rank_by_score(players, |p| p.total)
    }

    #[test]
    fn test_ranked_lines_with_medals() {
        let ranked = ranked(&[("Lucy", 140), ("Sam", 95), ("Pip", 95), ("Robin", 60), ("Wren", 50)]);
        let lines: Vec<String> = ranked.iter().map(ranked_line).collect();
        assert_eq!(
            lines,
            vec![
                "1. Lucy - 140 pts :first_place:",
                "2. Sam - 95 pts :second_place:",
                "2. Pip - 95 pts :second_place:",
                "4. Robin - 60 pts",
                "5. Wren - 50 pts",
            ]
        );
    }

    #[test]
    fn test_announcement_layout() {
        let ranked = ranked(&[("Lucy", 140), ("Sam", 95)]);
        let text = announcement(&ranked, &["Lucy".to_string()], "https://site.test/games/7");
        assert_eq!(
            text,
            "**Game Recorded!**\n\n\
             1. Lucy - 140 pts :first_place:\n\
             2. Sam - 95 pts :second_place:\n\
             \n:trophy: Winner: **Lucy**\n\
             \n:link: https://site.test/games/7"
        );
    }

    #[test]
    fn test_announcement_without_winners() {
        let ranked = ranked(&[("Lucy", 140)]);
        let text = announcement(&ranked, &[], "u");
        assert!(!text.contains(":trophy:"));
        assert!(text.ends_with(":link: u"));
    }

    #[test]
    fn test_leaderboard_lines() {
        let entries = vec![
            LeaderboardEntry {
                discord_username: Some("lucy.b".into()),
                player_name: Some("Lucy".into()),
                average_score: 91.24,
                games_played: 12,
                total_wins: 7,
                aliases: vec!["Lucy".into(), "lucyb".into()],
            },
            LeaderboardEntry {
                player_name: Some("Sam".into()),
                average_score: 91.24,
                games_played: 3,
                total_wins: 1,
                ..Default::default()
            },
            LeaderboardEntry {
                player_name: Some("Pip".into()),
                average_score: 70.0,
                ..Default::default()
            },
            LeaderboardEntry {
                player_name: Some("Wren".into()),
                average_score: 65.0,
                ..Default::default()
            },
        ];

        let lines = leaderboard_lines(&entries);
        assert_eq!(
            lines[0],
            ":first_place: **1. lucy.b** (2 accounts) - Avg: 91.2 | Games: 12 | Wins: 7"
        );
        assert_eq!(lines[1], ":first_place: **1. Sam** - Avg: 91.2 | Games: 3 | Wins: 1");
        assert_eq!(lines[2], ":third_place: **3. Pip** - Avg: 70.0 | Games: 0 | Wins: 0");
        assert_eq!(lines[3], "**4. Wren** - Avg: 65.0 | Games: 0 | Wins: 0");
    }

    #[test]
    fn test_leaderboard_caps_at_ten() {
        let entries: Vec<LeaderboardEntry> = (0..15)
            .map(|i| LeaderboardEntry {
                player_name: Some(format!("P{}", i)),
                average_score: 100.0 - i as f64,
                ..Default::default()
            })
            .collect();
        assert_eq!(leaderboard_lines(&entries).len(), LEADERBOARD_SIZE);
    }

    #[test]
    fn test_stats_card() {
        let profile = PlayerProfile {
            stats: PlayerStats {
                player_name: Some("Lucy".into()),
                games_played: 10,
                total_wins: 4,
                win_rate: 0.4,
                average_score: 87.333,
                high_score: 120,
                low_score: 61,
            },
            identity: PlayerIdentity {
                discord_username: Some("lucy.b".into()),
                wingspan_names: vec!["Lucy".into(), "lucyb".into()],
            },
        };

        let card = stats_card(&profile, "lucy.b");
        assert_eq!(card.title, "Stats for lucy.b");
        assert_eq!(card.description.as_deref(), Some("*Accounts: Lucy, lucyb*"));
        let values: Vec<&str> = card.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["10", "4", "40.0%", "87.3", "120", "61"]);
    }

    #[test]
    fn test_stats_card_falls_back_to_lookup_name() {
        let card = stats_card(&PlayerProfile::default(), "someone");
        assert_eq!(card.title, "Stats for someone");
        assert!(card.description.is_none());
    }

    #[test]
    fn test_format_played_at() {
        assert_eq!(format_played_at(Some("2025-01-05T19:30:00Z")), "Jan 05, 2025");
        assert_eq!(format_played_at(Some("2025-01-05T19:30:00+00:00")), "Jan 05, 2025");
        assert_eq!(format_played_at(Some("2025-01-05T19:30:00")), "Jan 05, 2025");
        assert_eq!(format_played_at(Some("2025-01-05T19:30:00.250")), "Jan 05, 2025");
        assert_eq!(format_played_at(Some("2025-01-05")), "Jan 05, 2025");
        assert_eq!(format_played_at(Some("2025-01-05 garbage")), "2025-01-05");
        assert_eq!(format_played_at(Some("soon")), "soon");
        assert_eq!(format_played_at(None), "Unknown date");
    }

    #[test]
    fn test_recent_game_field() {
        let game = RecentGame {
            played_at: Some("2024-11-30T12:00:00Z".into()),
            players: vec![
                RecentGamePlayer { player_name: Some("Sam".into()), total_score: 80, is_winner: false },
                RecentGamePlayer { player_name: Some("Lucy".into()), total_score: 101, is_winner: true },
            ],
        };

        let field = recent_game_field(&game);
        assert_eq!(field.name, "Nov 30, 2024");
        assert_eq!(field.value, "Lucy: 101 :trophy:\nSam: 80");

        let empty = recent_game_field(&RecentGame::default());
        assert_eq!(empty.value, "No players");
    }
}
