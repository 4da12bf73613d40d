//! Slash-command handlers, independent of the chat client.
//!
//! Input-resolution adapters (who is `/stats` about, how many games does
//! `/recent` show) live here next to the handlers that answer with a
//! [`Reply`]. The Discord layer only maps options in and replies out.

use crate::error::WingStatsError;
use crate::providers::GameApi;
use crate::registry::{AliasStore, Registration};
use crate::report::{self, Card};

pub const RECENT_DEFAULT: i64 = 5;
pub const RECENT_MAX: i64 = 10;

const REGISTER_HINT: &str = "Use `/register <wingspan_name>` to register your name.";

/// Command response
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: Option<String>,
    pub card: Option<Card>,
    /// Only visible to the invoker
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            card: None,
            ephemeral: false,
        }
    }

    pub fn card(card: Card) -> Self {
        Self {
            content: None,
            card: Some(card),
            ephemeral: false,
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Plain-text rendering (CLI)
    pub fn to_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(content) = &self.content {
            parts.push(content.clone());
        }
        if let Some(card) = &self.card {
            parts.push(card.to_text());
        }
        parts.join("\n")
    }
}

/// Who `/stats` should look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsLookup {
    /// A tagged Discord user (lower-cased username)
    Tagged(String),
    /// A typed Discord username or Wingspan name, and the text as typed
    Typed { name: String, input: String },
    /// The invoker (lower-cased username)
    SelfLookup(String),
}

impl StatsLookup {
    /// Resolve from the command options: tagged user, then typed name, then the invoker.
    ///
    /// A typed raw mention (`<@123>`) cannot be resolved without another API
    /// call, so it is rejected with guidance as the error reply.
    pub fn resolve(tagged_user: Option<&str>, player_name: Option<&str>, invoker: &str) -> Result<Self, Reply> {
        if let Some(user) = tagged_user {
            return Ok(StatsLookup::Tagged(user.to_lowercase()));
        }

        if let Some(typed) = player_name {
            let name = typed.strip_prefix('@').unwrap_or(typed);
            if name.starts_with("<@") && name.ends_with('>') {
                return Err(Reply::text(
                    "Please use the `user` parameter to tag a Discord user, \
                     or type their username/Wingspan name directly.",
                ));
            }
            return Ok(StatsLookup::Typed {
                name: name.to_string(),
                input: typed.to_string(),
            });
        }

        Ok(StatsLookup::SelfLookup(invoker.to_lowercase()))
    }

    pub fn name(&self) -> &str {
        match self {
            StatsLookup::Tagged(n) | StatsLookup::Typed { name: n, .. } | StatsLookup::SelfLookup(n) => n,
        }
    }
}

/// `/recent` count clamped to 1..=10
pub fn clamp_recent_count(count: Option<i64>) -> usize {
    count.unwrap_or(RECENT_DEFAULT).clamp(1, RECENT_MAX) as usize
}

/// `/stats`
pub async fn stats(api: &dyn GameApi, lookup: &StatsLookup) -> Reply {
    match api.player_profile(lookup.name()).await {
        Ok(profile) => Reply::card(report::stats_card(&profile, lookup.name())),
        Err(WingStatsError::PlayerNotFound(_)) => match lookup {
            StatsLookup::Typed { input, .. } => Reply::text(format!("Player '{}' not found.", input)),
            _ => Reply::text(
                "No stats found for your Discord account. \
                 Use `/register <wingspan_name>` to link your Wingspan name.",
            ),
        },
        Err(WingStatsError::Upstream { .. }) => Reply::text("Failed to fetch player stats."),
        Err(e) => {
            tracing::warn!("⚠️ /stats failed for {}: {}", lookup.name(), e);
            Reply::text(format!("Error fetching stats: {}", e))
        }
    }
}

/// `/leaderboard`
pub async fn leaderboard(api: &dyn GameApi) -> Reply {
    match api.leaderboard().await {
        Ok(board) if board.players.is_empty() => Reply::text("No players found in the leaderboard."),
        Ok(board) => Reply::card(report::leaderboard_card(&board.players)),
        Err(WingStatsError::Upstream { .. }) => Reply::text("Failed to fetch leaderboard."),
        Err(e) => {
            tracing::warn!("⚠️ /leaderboard failed: {}", e);
            Reply::text(format!("Error fetching leaderboard: {}", e))
        }
    }
}

/// `/recent`
pub async fn recent(api: &dyn GameApi, count: usize) -> Reply {
    match api.recent_games(count).await {
        Ok(recent) if recent.games.is_empty() => Reply::text("No games found."),
        Ok(recent) => Reply::card(report::recent_games_card(&recent.games)),
        Err(WingStatsError::Upstream { .. }) => Reply::text("Failed to fetch recent games."),
        Err(e) => {
            tracing::warn!("⚠️ /recent failed: {}", e);
            Reply::text(format!("Error fetching games: {}", e))
        }
    }
}

/// `/register`
pub async fn register(store: &dyn AliasStore, username: &str, wingspan_name: &str) -> Reply {
    let identity = username.to_lowercase();

    match store.register(&identity, wingspan_name).await {
        Ok(Registration::AlreadyRegistered) => Reply::text(format!(
            "'{}' is already registered to your Discord account.",
            wingspan_name
        ))
        .ephemeral(),
        Ok(Registration::Added { names }) => Reply::text(format!(
            "Registered '{}' to your Discord account!\nYour registered names: {}",
            wingspan_name,
            names.join(", ")
        ))
        .ephemeral(),
        Err(e) => {
            tracing::error!("❌ /register failed for {}: {}", identity, e);
            Reply::text(format!("Registration failed: {}", e)).ephemeral()
        }
    }
}

/// `/mynames`
pub async fn my_names(store: &dyn AliasStore, username: &str) -> Reply {
    match store.names_for(&username.to_lowercase()).await {
        Ok(names) if names.is_empty() => Reply::text(format!(
            "You haven't registered any Wingspan names yet.\n{}",
            REGISTER_HINT
        ))
        .ephemeral(),
        Ok(names) => Reply::text(format!("Your registered Wingspan names: {}", names.join(", "))).ephemeral(),
        Err(e) => Reply::text(format!("Could not read your names: {}", e)).ephemeral(),
    }
}
