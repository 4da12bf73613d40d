//! Environment-driven configuration for the bot and the parse shim.
//!
//! Values are read once at startup. A `.env` file next to the working
//! directory is honoured through `dotenvy` by the binaries before calling
//! [`BotConfig::from_env`] / [`ServiceConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, WingStatsError};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_SCOREBIRD_URL: &str = "http://localhost:8000";
pub const DEFAULT_PLAYERS_JSON_PATH: &str = "/app/ScoreBird/signups/players.json";
pub const DEFAULT_SITE_BASE_URL: &str = "https://wingstats.beatty.codes";

/// Per-call timeouts for every outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// ScoreBird `/parse` call (OCR is slow)
    pub parse: Duration,

    /// WingStats API calls
    pub api: Duration,

    /// Attachment download
    pub download: Duration,

    /// Giphy lookup
    pub gif: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            parse: Duration::from_secs(60),
            api: Duration::from_secs(30),
            download: Duration::from_secs(30),
            gif: Duration::from_secs(10),
        }
    }
}

impl TimeoutConfig {
    /// Build from a lookup function, falling back to defaults per key
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            parse: secs_or(&lookup, "TIMEOUT_PARSE_SECS", defaults.parse),
            api: secs_or(&lookup, "TIMEOUT_API_SECS", defaults.api),
            download: secs_or(&lookup, "TIMEOUT_DOWNLOAD_SECS", defaults.download),
            gif: secs_or(&lookup, "TIMEOUT_GIF_SECS", defaults.gif),
        }
    }
}

impl std::fmt::Display for TimeoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse={}s, api={}s, download={}s, gif={}s",
            self.parse.as_secs(),
            self.api.as_secs(),
            self.download.as_secs(),
            self.gif.as_secs()
        )
    }
}

fn secs_or<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid {}={:?}, using {}s", key, raw, default.as_secs());
                default
            }
        },
        None => default,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub api_base_url: String,
    pub scorebird_url: String,
    pub players_json_path: PathBuf,
    pub site_base_url: String,
    /// `None` disables GIF lookups entirely
    pub giphy_api_key: Option<String>,
    pub timeouts: TimeoutConfig,
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| non_empty(lookup(key)).unwrap_or_else(|| default.to_string());

        Self {
            discord_token: lookup("DISCORD_BOT_TOKEN").unwrap_or_default(),
            api_base_url: or_default("API_BASE_URL", DEFAULT_API_BASE_URL),
            scorebird_url: or_default("SCOREBIRD_URL", DEFAULT_SCOREBIRD_URL),
            players_json_path: PathBuf::from(or_default("PLAYERS_JSON_PATH", DEFAULT_PLAYERS_JSON_PATH)),
            site_base_url: or_default("SITE_BASE_URL", DEFAULT_SITE_BASE_URL),
            giphy_api_key: non_empty(lookup("GIPHY_API_KEY")),
            timeouts: TimeoutConfig::from_lookup(&lookup),
        }
    }

    /// The bot cannot log in without a token
    pub fn require_token(&self) -> Result<&str> {
        if self.discord_token.trim().is_empty() {
            return Err(WingStatsError::Config(
                "DISCORD_BOT_TOKEN environment variable not set! \
                 Set it with: export DISCORD_BOT_TOKEN='your-token-here'"
                    .to_string(),
            ));
        }
        Ok(&self.discord_token)
    }

    /// Public page for a recorded game
    pub fn game_url(&self, game_id: &str) -> String {
        crate::report::game_url(&self.site_base_url, game_id)
    }
}

/// ScoreBird parse service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    /// Program invoked as `<cmd> <image path>`; prints the reader's JSON on stdout
    pub reader_cmd: Option<String>,
    pub reader_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("⚠️ Ignoring invalid PORT={:?}, using 8000", raw);
                8000
            }),
            None => 8000,
        };

        Self {
            port,
            reader_cmd: non_empty(lookup("SCOREBIRD_READER_CMD")),
            reader_timeout: secs_or(&lookup, "READER_TIMEOUT_SECS", Duration::from_secs(120)),
        }
    }
}
