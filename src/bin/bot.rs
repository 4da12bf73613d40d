use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wingstats_bot::config::BotConfig;
use wingstats_bot::providers::ScoreBirdClient;
use wingstats_bot::registry::JsonAliasStore;
use wingstats_bot::{discord, SubmissionEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wingstats_bot=info,serenity=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env();
    config.require_token()?;

    tracing::info!("🚀 Starting WingStats bot");
    tracing::info!("🔌 WingStats API: {}", config.api_base_url);
    tracing::info!("🐦 ScoreBird: {}", config.scorebird_url);
    tracing::info!("⏱️ Timeouts: {}", config.timeouts);

    let scorebird = ScoreBirdClient::new(&config.scorebird_url, config.timeouts.api)?;
    if scorebird.is_available().await {
        tracing::info!("✅ ScoreBird is healthy");
    } else {
        tracing::warn!("⚠️ ScoreBird not reachable at {}, submissions will fail until it is", config.scorebird_url);
    }

    let store = JsonAliasStore::open(&config.players_json_path);

    let engine = SubmissionEngine::from_config(&config, Arc::new(store))?;

    discord::run(&config, engine).await
}
