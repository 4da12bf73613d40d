//! # WingStats Bot
//!
//! Wingspan scorecard bot and ScoreBird parse shim:
//! - Player alias table (Discord username ↔ Wingspan names), persisted as JSON
//! - Scorecard submission: download, parse, canonicalize, record, announce
//! - Competition ranking with medals
//! - Low-score call-outs with taunts and GIFs
//! - Multiple interfaces: Rust library, Discord bot, HTTP parse service, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wingstats_bot::config::BotConfig;
//! use wingstats_bot::notify::NoDirectory;
//! use wingstats_bot::{JsonAliasStore, Submission, SubmissionEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env();
//!     let store = JsonAliasStore::open(&config.players_json_path);
//!     let engine = SubmissionEngine::from_config(&config, Arc::new(store))?;
//!
//!     let outcome = engine.submit(&Submission {
//!         image_url: "https://cdn.example.com/scorecard.png".to_string(),
//!         uploader: "lucy.b".to_string(),
//!     }, &NoDirectory).await?;
//!
//!     println!("{}", outcome.announcement);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod notify;
pub mod providers;
pub mod ranking;
pub mod registry;
pub mod report;
pub mod service;

// Re-export primary types
pub use core::{ParseResponse, ParsedPlayer, ScoreBreakdown};
pub use engine::{ResolvedScorecard, Submission, SubmissionEngine, SubmissionOutcome};
pub use error::{Result, WingStatsError};
pub use ranking::{rank_by_score, Medal, RankedEntry};
pub use registry::{AliasStore, AliasTable, JsonAliasStore};

// Discord front-end
#[cfg(feature = "bot")]
pub mod discord;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
