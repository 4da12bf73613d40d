use crate::config::BotConfig;
use crate::core::{NewGame, ParseResponse, ParsedPlayer};
use crate::error::{Result, WingStatsError};
use crate::notify::{self, MemberDirectory, NotificationTarget};
use crate::providers::{
    GameApi, GifProvider, GiphyProvider, HttpImageFetcher, ImageSource, ScoreBirdClient,
    ScorecardParser, WingStatsClient,
};
use crate::ranking::{rank_by_score, RankedEntry};
use crate::registry::{AliasStore, AliasTable};
use crate::report;
use std::sync::Arc;
use std::time::Instant;

/// One scorecard submission from chat
#[derive(Debug, Clone)]
pub struct Submission {
    /// Attachment URL of the scorecard image
    pub image_url: String,
    /// Chat username of the submitter
    pub uploader: String,
}

/// Parse result with canonical names applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScorecard {
    /// Canonicalized players, in the order the parser reported them
    pub players: Vec<ParsedPlayer>,
    /// Canonicalized winners
    pub winners: Vec<String>,
}

impl ResolvedScorecard {
    /// Canonicalize player names and winner names independently
    pub fn resolve(parse: ParseResponse, table: &AliasTable) -> Self {
        let players = parse
            .players
            .into_iter()
            .map(|mut player| {
                let canonical = table.canonicalize(&player.name);
                if canonical != player.name {
                    tracing::debug!("Mapped '{}' -> '{}'", player.name, canonical);
                }
                player.name = canonical;
                player
            })
            .collect();

        let winners = parse
            .winners
            .iter()
            .map(|w| table.canonicalize(w))
            .collect();

        Self { players, winners }
    }

    /// Players ranked by total score
    pub fn ranked(&self) -> Vec<RankedEntry<ParsedPlayer>> {
        rank_by_score(self.players.clone(), |p| p.total)
    }
}

/// Everything the chat layer needs to answer a submission
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub game_id: String,
    pub game_url: String,
    pub ranked: Vec<RankedEntry<ParsedPlayer>>,
    pub winners: Vec<String>,
    /// Edited into the "Parsing scorecard..." reply
    pub announcement: String,
    pub targets: Vec<NotificationTarget>,
    /// Sent to the channel when at least one low scorer could be mentioned
    pub taunt: Option<String>,
}

/// Scorecard submission orchestrator
pub struct SubmissionEngine {
    store: Arc<dyn AliasStore>,
    images: Arc<dyn ImageSource>,
    parser: Arc<dyn ScorecardParser>,
    api: Arc<dyn GameApi>,
    gifs: Option<Arc<dyn GifProvider>>,
    site_base_url: String,
}

impl SubmissionEngine {
    pub fn new(
        store: Arc<dyn AliasStore>,
        images: Arc<dyn ImageSource>,
        parser: Arc<dyn ScorecardParser>,
        api: Arc<dyn GameApi>,
        site_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            images,
            parser,
            api,
            gifs: None,
            site_base_url: site_base_url.into(),
        }
    }

    /// Enable GIFs on taunts
    pub fn with_gifs(mut self, gifs: Arc<dyn GifProvider>) -> Self {
        self.gifs = Some(gifs);
        self
    }

    /// Wire up the HTTP collaborators described by `config`
    pub fn from_config(config: &BotConfig, store: Arc<dyn AliasStore>) -> Result<Self> {
        let timeouts = config.timeouts;

        let mut engine = Self::new(
            store,
            Arc::new(HttpImageFetcher::new(timeouts.download)?),
            Arc::new(ScoreBirdClient::new(&config.scorebird_url, timeouts.parse)?),
            Arc::new(WingStatsClient::new(&config.api_base_url, timeouts.api)?),
            &config.site_base_url,
        );

        match &config.giphy_api_key {
            Some(key) => {
                tracing::info!("✅ Giphy API key configured");
                engine = engine.with_gifs(Arc::new(GiphyProvider::new(key, timeouts.gif)?));
            }
            None => tracing::warn!("⚠️ GIPHY_API_KEY not set, taunts will have no GIFs"),
        }

        Ok(engine)
    }

    pub fn store(&self) -> &Arc<dyn AliasStore> {
        &self.store
    }

    pub fn api(&self) -> &Arc<dyn GameApi> {
        &self.api
    }

    /// Download, parse, record and announce one scorecard.
    ///
    /// Any failed required call aborts this submission only; taunt delivery
    /// problems never fail it.
    pub async fn submit(
        &self,
        submission: &Submission,
        directory: &dyn MemberDirectory,
    ) -> Result<SubmissionOutcome> {
        let start = Instant::now();

        let image = self.images.fetch(&submission.image_url).await?;
        tracing::debug!("Parsing {} byte image with {}", image.len(), self.parser.name());
        let parse = self.parser.parse(&image).await?;

        if !parse.success {
            let detail = parse.error.unwrap_or_else(|| "Unknown error".to_string());
            return Err(WingStatsError::ParseFailed(detail));
        }
        if parse.players.is_empty() {
            return Err(WingStatsError::NoPlayers);
        }

        let table = self.store.snapshot().await?;
        let resolved = ResolvedScorecard::resolve(parse, &table);

        let game = NewGame::from_players(&resolved.players, &submission.uploader);
        let created = self.api.create_game(&game).await?;
        let game_id = created.game_id();
        let game_url = report::game_url(&self.site_base_url, &game_id);

        let ranked = resolved.ranked();
        let announcement = report::announcement(&ranked, &resolved.winners, &game_url);

        let targets = notify::resolve_targets(&ranked, &table, directory);
        let taunt = self.taunt_for(&targets).await;

        tracing::info!(
            "✅ Submission from {} recorded as game {} ({} players, {} call-outs, {:.0}ms)",
            submission.uploader,
            game_id,
            ranked.len(),
            notify::mentions(&targets).len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(SubmissionOutcome {
            game_id,
            game_url,
            ranked,
            winners: resolved.winners,
            announcement,
            targets,
            taunt,
        })
    }

    /// Build the low-score call-out; `None` when nobody can be mentioned
    pub async fn taunt_for(&self, targets: &[NotificationTarget]) -> Option<String> {
        let mentions = notify::mentions(targets);
        if mentions.is_empty() {
            return None;
        }

        let taunt = {
            let mut rng = rand::thread_rng();
            notify::pick_taunt(&mut rng)
        };

        let gif_url = match &self.gifs {
            Some(gifs) => {
                tracing::debug!("Searching GIFs for: {}", taunt.gif_tag);
                match gifs.random_gif(taunt.gif_tag).await {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::warn!("⚠️ GIF lookup failed: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        if gif_url.is_none() {
            tracing::debug!("No GIF URL obtained, sending taunt without GIF");
        }

        Some(notify::compose_taunt(&mentions, &taunt, gif_url.as_deref()))
    }
}
