use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wingstats_bot::commands::{self, clamp_recent_count, StatsLookup};
use wingstats_bot::config::{BotConfig, ServiceConfig};
use wingstats_bot::core::ParseResponse;
use wingstats_bot::engine::ResolvedScorecard;
use wingstats_bot::notify::{self, StaticDirectory};
use wingstats_bot::providers::{ScoreBirdClient, ScorecardParser, WingStatsClient};
use wingstats_bot::registry::{AliasStore, JsonAliasStore};
use wingstats_bot::report;
use wingstats_bot::service::{CommandReader, ReaderParser};

#[derive(Parser)]
#[command(name = "wingstats-cli")]
#[command(about = "WingStats bot tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Alias table path (defaults to PLAYERS_JSON_PATH)
    #[arg(short, long)]
    players: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered Wingspan names
    Names {
        /// Only this Discord username
        identity: Option<String>,
    },

    /// Register a Wingspan name for a Discord username
    Register { identity: String, wingspan_name: String },

    /// Canonicalize, rank and announce a saved parse result without recording it
    Resolve {
        /// ParseResponse JSON file
        parse_file: PathBuf,

        /// Guild member for call-outs, as `username=mention`
        #[arg(short, long)]
        member: Vec<String>,
    },

    /// Parse a scorecard image
    Parse {
        image: PathBuf,

        /// Run the local reader instead of calling the ScoreBird service
        #[arg(long)]
        local: bool,
    },

    /// Player stats from the WingStats API
    Stats { player_name: String },

    /// WingStats leaderboard
    Leaderboard,

    /// Most recent games
    Recent {
        #[arg(short, long)]
        count: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = BotConfig::from_env();
    let players_path = cli.players.unwrap_or_else(|| config.players_json_path.clone());

    match cli.command {
        Commands::Names { identity } => {
            let store = JsonAliasStore::open(players_path);
            let table = store.snapshot().await?;

            match identity {
                Some(identity) => {
                    let names = table.names_for(&identity);
                    if names.is_empty() {
                        println!("❌ {} has no registered names", identity);
                    } else {
                        println!("{}: {}", identity, names.join(", "));
                    }
                }
                None => {
                    println!("📋 {} registered players in {}:", table.len(), store.path().display());
                    for record in table.records() {
                        println!("   {}: {}", record.key, record.names.join(", "));
                    }
                }
            }
        }

        Commands::Register { identity, wingspan_name } => {
            let store = JsonAliasStore::open(players_path);
            let reply = commands::register(&store, &identity, &wingspan_name).await;
            println!("{}", reply.to_text());
        }

        Commands::Resolve { parse_file, member } => {
            let store = JsonAliasStore::open(players_path);
            let table = store.snapshot().await?;

            let parse: ParseResponse = serde_json::from_str(&std::fs::read_to_string(&parse_file)?)?;
            let resolved = ResolvedScorecard::resolve(parse, &table);
            let ranked = resolved.ranked();

            let game_url = config.game_url("unknown");
            println!("{}", report::announcement(&ranked, &resolved.winners, &game_url));

            let directory = member
                .iter()
                .filter_map(|m| m.split_once('='))
                .fold(StaticDirectory::new(), |dir, (name, mention)| dir.with_member(name, mention));

            let targets = notify::resolve_targets(&ranked, &table, &directory);
            if !targets.is_empty() {
                println!("\n📉 Low scores:");
                for target in &targets {
                    println!(
                        "   {} ({} pts) -> {} / {}",
                        target.player,
                        target.score,
                        target.identity.as_deref().unwrap_or("no identity"),
                        target.mention.as_deref().unwrap_or("not mentionable")
                    );
                }
            }
        }

        Commands::Parse { image, local } => {
            let bytes = std::fs::read(&image)?;
            println!("🔍 Parsing {} ({} bytes)", image.display(), bytes.len());

            let parsed = if local {
                let service = ServiceConfig::from_env();
                let program = service
                    .reader_cmd
                    .ok_or_else(|| anyhow::anyhow!("SCOREBIRD_READER_CMD is not set"))?;
                ReaderParser::new(CommandReader::new(program, service.reader_timeout))
                    .parse(&bytes)
                    .await?
            } else {
                ScoreBirdClient::new(&config.scorebird_url, config.timeouts.parse)?
                    .parse(&bytes)
                    .await?
            };

            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }

        Commands::Stats { player_name } => {
            let api = WingStatsClient::new(&config.api_base_url, config.timeouts.api)?;
            let reply = match StatsLookup::resolve(None, Some(&player_name), "") {
                Ok(lookup) => commands::stats(&api, &lookup).await,
                Err(guidance) => guidance,
            };
            println!("{}", reply.to_text());
        }

        Commands::Leaderboard => {
            let api = WingStatsClient::new(&config.api_base_url, config.timeouts.api)?;
            println!("{}", commands::leaderboard(&api).await.to_text());
        }

        Commands::Recent { count } => {
            let api = WingStatsClient::new(&config.api_base_url, config.timeouts.api)?;
            println!("{}", commands::recent(&api, clamp_recent_count(count)).await.to_text());
        }
    }

    Ok(())
}
