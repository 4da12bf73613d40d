//! Low-score call-outs.
//!
//! Players finishing under [`LOW_SCORE_THRESHOLD`] get pinged with a taunt.
//! Every step is best-effort: a player whose name has no registered identity,
//! or whose identity is not a member of the guild, is skipped silently.

pub mod taunt;

use crate::core::ParsedPlayer;
use crate::ranking::RankedEntry;
use crate::registry::{normalize_identity, AliasTable};

pub use taunt::{compose_taunt, pick_taunt, Taunt, TAUNTS};

/// Totals strictly below this get a call-out
pub const LOW_SCORE_THRESHOLD: i64 = 100;

/// Chat-platform member lookup (identity key -> mentionable handle)
pub trait MemberDirectory: Send + Sync {
    fn mention_for(&self, identity: &str) -> Option<String>;
}

/// Used outside a guild (DMs): nobody can be mentioned
pub struct NoDirectory;

impl MemberDirectory for NoDirectory {
    fn mention_for(&self, _identity: &str) -> Option<String> {
        None
    }
}

/// Fixed username -> mention list, matched like guild members are
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    members: Vec<(String, String)>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, username: impl Into<String>, mention: impl Into<String>) -> Self {
        self.members.push((username.into(), mention.into()));
        self
    }
}

impl MemberDirectory for StaticDirectory {
    fn mention_for(&self, identity: &str) -> Option<String> {
        self.members
            .iter()
            .find(|(username, _)| member_matches(username, identity))
            .map(|(_, mention)| mention.clone())
    }
}

/// Member username matches an identity key, ignoring case and leading dots on the key
pub fn member_matches(username: &str, identity: &str) -> bool {
    username.to_lowercase() == normalize_identity(identity)
}

/// One low scorer and how far resolution got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    pub player: String,
    pub score: i64,
    pub identity: Option<String>,
    pub mention: Option<String>,
}

pub fn is_low_score(total: i64) -> bool {
    total < LOW_SCORE_THRESHOLD
}

/// Resolve every low scorer in ranked order
pub fn resolve_targets(
    ranked: &[RankedEntry<ParsedPlayer>],
    table: &AliasTable,
    directory: &dyn MemberDirectory,
) -> Vec<NotificationTarget> {
    ranked
        .iter()
        .map(|entry| &entry.item)
        .filter(|player| is_low_score(player.total))
        .map(|player| {
            tracing::debug!("Low score detected: {} with {} pts", player.name, player.total);

            let identity = table.identity_for_name(&player.name).map(str::to_string);
            let mention = match identity.as_deref() {
                Some(key) => {
                    let mention = directory.mention_for(key);
                    if mention.is_none() {
                        tracing::debug!("Could not find guild member for username: {}", key);
                    }
                    mention
                }
                None => {
                    tracing::debug!("No discord username mapping found for: {}", player.name);
                    None
                }
            };

            NotificationTarget {
                player: player.name.clone(),
                score: player.total,
                identity,
                mention,
            }
        })
        .collect()
}

/// Mentions of the targets that resolved all the way
pub fn mentions(targets: &[NotificationTarget]) -> Vec<String> {
    targets.iter().filter_map(|t| t.mention.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank_by_score;

    fn table() -> AliasTable {
        serde_json::from_str(
            r#"{
                "sam01": {"wingspan name": ["Sam"]},
                ".pip": {"wingspan name": ["Pip"]},
                "lucy.b": {"wingspan name": ["Lucy"]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(is_low_score(99));
        assert!(!is_low_score(100));
        assert!(is_low_score(0));
    }

    #[test]
    fn test_resolve_targets() {
        let players = vec![
            ParsedPlayer::new("Lucy", 140),
            ParsedPlayer::new("Sam", 95),
            ParsedPlayer::new("Pip", 99),
            ParsedPlayer::new("Stranger", 40),
            ParsedPlayer::new("Edge", 100),
        ];
        let ranked = rank_by_score(players, |p| p.total);
        let directory = StaticDirectory::new()
            .with_member("Sam01", "<@1>")
            .with_member("pip", "<@2>");

        let targets = resolve_targets(&ranked, &table(), &directory);

        let names: Vec<&str> = targets.iter().map(|t| t.player.as_str()).collect();
        assert_eq!(names, vec!["Pip", "Sam", "Stranger"]);
        assert_eq!(targets[0].identity.as_deref(), Some(".pip"));
        assert_eq!(targets[0].mention.as_deref(), Some("<@2>"));
        assert_eq!(targets[1].identity.as_deref(), Some("sam01"));
        assert_eq!(targets[2].identity, None);
        assert_eq!(targets[2].mention, None);

        assert_eq!(mentions(&targets), vec!["<@2>", "<@1>"]);
    }

    #[test]
    fn test_unknown_member_is_skipped() {
        let ranked = rank_by_score(vec![ParsedPlayer::new("Sam", 10)], |p| p.total);
        let targets = resolve_targets(&ranked, &table(), &NoDirectory);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].identity.as_deref(), Some("sam01"));
        assert!(mentions(&targets).is_empty());
    }

    #[test]
    fn test_member_matches() {
        assert!(member_matches("Lucy.B", ".lucy.b"));
        assert!(!member_matches(".lucy.b", "lucy.b"));
    }
}
