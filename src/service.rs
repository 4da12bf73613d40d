//! ScoreBird parse shim.
//!
//! The scorecard reader itself is an external program. This module decodes
//! the uploaded image, hands it to the reader and translates the reader's
//! raw output into the `/parse` wire format.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tokio::process::Command;

use crate::core::{ParseResponse, ParsedPlayer, ScoreBreakdown};
use crate::error::{Result, WingStatsError};
use crate::providers::ScorecardParser;

/// Decode a base64 image, with or without a `data:image/...;base64,` prefix
pub fn decode_image(payload: &str) -> Result<Vec<u8>> {
    let data = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };
    Ok(STANDARD.decode(data.trim())?)
}

/// Per-category points as the reader names them
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetails {
    #[serde(default)]
    pub bird_pts: Option<i64>,
    #[serde(default)]
    pub bonus_pts: Option<i64>,
    #[serde(default)]
    pub eor_pts: Option<i64>,
    #[serde(default)]
    pub egg_pts: Option<i64>,
    #[serde(default)]
    pub cache_pts: Option<i64>,
    #[serde(default)]
    pub tuck_pts: Option<i64>,
    #[serde(default)]
    pub nectar_pts: Option<i64>,
    #[serde(default)]
    pub duet_pts: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub details: RawDetails,
}

/// Reader output: `{ "players": { "player1": {...} }, "winner": ["name", null] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReaderOutput {
    /// Slot key and player, in the order the reader listed them
    #[serde(default, deserialize_with = "players_in_order")]
    pub players: Vec<(String, RawPlayer)>,
    #[serde(default)]
    pub winner: Vec<Option<String>>,
}

struct PlayersVisitor;

impl<'de> Visitor<'de> for PlayersVisitor {
    type Value = Vec<(String, RawPlayer)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of player slots")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut players = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, RawPlayer>()? {
            players.push(entry);
        }
        Ok(players)
    }
}

fn players_in_order<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, RawPlayer)>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(PlayersVisitor)
}

/// Translate reader output into a successful parse response.
///
/// Players without a read name fall back to their slot key; unread winner
/// slots are dropped.
pub fn translate(raw: RawReaderOutput) -> ParseResponse {
    let players = raw
        .players
        .into_iter()
        .map(|(key, player)| {
            let details = player.details;
            ParsedPlayer {
                name: player.name.filter(|n| !n.is_empty()).unwrap_or(key),
                scores: ScoreBreakdown {
                    bird_points: details.bird_pts.unwrap_or(0),
                    bonus: details.bonus_pts.unwrap_or(0),
                    end_of_round: details.eor_pts.unwrap_or(0),
                    egg: details.egg_pts.unwrap_or(0),
                    cache: details.cache_pts.unwrap_or(0),
                    tuck: details.tuck_pts.unwrap_or(0),
                    nectar: details.nectar_pts.unwrap_or(0),
                    duet_pts: details.duet_pts.unwrap_or(0),
                },
                total: player.score.unwrap_or(0),
            }
        })
        .collect();

    let winners = raw
        .winner
        .into_iter()
        .flatten()
        .filter(|w| !w.is_empty())
        .collect();

    ParseResponse::ok(players, winners)
}

/// Reads a scorecard image into the reader's raw output
#[async_trait]
pub trait ScorecardReader: Send + Sync {
    async fn read(&self, image: &[u8]) -> Result<RawReaderOutput>;
}

/// Runs `<program> <image.png>` and reads JSON from its stdout
pub struct CommandReader {
    program: String,
    timeout: Duration,
}

impl CommandReader {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ScorecardReader for CommandReader {
    async fn read(&self, image: &[u8]) -> Result<RawReaderOutput> {
        // Removed when dropped, after the reader has exited
        let mut scratch = tempfile::Builder::new()
            .prefix("scorebird-")
            .suffix(".png")
            .tempfile()?;
        scratch.write_all(image)?;
        scratch.flush()?;

        tracing::debug!("Parsing image: {}", scratch.path().display());

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .arg(scratch.path())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| WingStatsError::Timeout("reader".to_string()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WingStatsError::Reader(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let raw: RawReaderOutput = serde_json::from_slice(&output.stdout)?;
        tracing::debug!("Reader found {} players", raw.players.len());
        Ok(raw)
    }
}

/// Decode, read and translate one `/parse` request body
pub async fn parse_image(reader: &dyn ScorecardReader, payload: &str) -> Result<ParseResponse> {
    let image = decode_image(payload)?;
    tracing::debug!("Decoded {} byte image", image.len());

    let raw = reader.read(&image).await?;
    Ok(translate(raw))
}

/// `detail` of a failed `/parse`. Bad payloads and reader failures alike are
/// answered with a 500 carrying this text.
pub fn failure_detail(err: &WingStatsError) -> String {
    format!("Failed to parse image: {}", err)
}

/// In-process parser: reader + translation, no HTTP hop
pub struct ReaderParser<R> {
    reader: R,
}

impl<R: ScorecardReader> ReaderParser<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: ScorecardReader> ScorecardParser for ReaderParser<R> {
    async fn parse(&self, image: &[u8]) -> Result<ParseResponse> {
        let raw = self.reader.read(image).await?;
        Ok(translate(raw))
    }

    fn name(&self) -> &str {
        "reader"
    }
}
