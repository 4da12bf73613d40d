use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use wingstats_bot::core::{
    GameCreated, LeaderboardResponse, NewGame, ParseResponse, ParsedPlayer, PlayerProfile,
    RecentGamesResponse,
};
use wingstats_bot::notify::{NoDirectory, StaticDirectory, TAUNTS};
use wingstats_bot::providers::{GameApi, GifProvider, ImageSource, ScorecardParser};
use wingstats_bot::{AliasStore, JsonAliasStore, Submission, SubmissionEngine, WingStatsError};

struct FixedImage;

#[async_trait]
impl ImageSource for FixedImage {
    async fn fetch(&self, _url: &str) -> wingstats_bot::Result<Vec<u8>> {
        Ok(b"\x89PNG".to_vec())
    }
}

struct FixedParse(ParseResponse);

#[async_trait]
impl ScorecardParser for FixedParse {
    async fn parse(&self, _image: &[u8]) -> wingstats_bot::Result<ParseResponse> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FailingParse;

#[async_trait]
impl ScorecardParser for FailingParse {
    async fn parse(&self, _image: &[u8]) -> wingstats_bot::Result<ParseResponse> {
        Err(WingStatsError::Upstream {
            service: "scorebird".to_string(),
            message: "reader crashed".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Records created games, answers everything else with "not found"
#[derive(Default)]
struct RecordingApi {
    created: Mutex<Vec<NewGame>>,
}

#[async_trait]
impl GameApi for RecordingApi {
    async fn create_game(&self, game: &NewGame) -> wingstats_bot::Result<GameCreated> {
        self.created.lock().unwrap().push(game.clone());
        Ok(serde_json::from_str(r#"{"game": {"id": 42}}"#)?)
    }

    async fn player_profile(&self, name: &str) -> wingstats_bot::Result<PlayerProfile> {
        Err(WingStatsError::PlayerNotFound(name.to_string()))
    }

    async fn leaderboard(&self) -> wingstats_bot::Result<LeaderboardResponse> {
        Ok(LeaderboardResponse::default())
    }

    async fn recent_games(&self, _limit: usize) -> wingstats_bot::Result<RecentGamesResponse> {
        Ok(RecentGamesResponse::default())
    }
}

struct FixedGif(Option<&'static str>);

#[async_trait]
impl GifProvider for FixedGif {
    async fn random_gif(&self, _tag: &str) -> wingstats_bot::Result<Option<String>> {
        Ok(self.0.map(str::to_string))
    }
}

struct BrokenGif;

#[async_trait]
impl GifProvider for BrokenGif {
    async fn random_gif(&self, _tag: &str) -> wingstats_bot::Result<Option<String>> {
        Err(WingStatsError::Timeout("giphy".to_string()))
    }
}

const PLAYERS_JSON: &str = r#"{
    "sam01": {"wingspan name": ["Sam"]},
    "lucy.b": {"wingspan name": ["Lucy"]}
}"#;

fn store_in(dir: &tempfile::TempDir) -> Arc<JsonAliasStore> {
    let path = dir.path().join("players.json");
    std::fs::write(&path, PLAYERS_JSON).unwrap();
    Arc::new(JsonAliasStore::open(path))
}

fn lucy_and_sam() -> ParseResponse {
    ParseResponse::ok(
        vec![ParsedPlayer::new("lucyb", 140), ParsedPlayer::new("sam", 95)],
        vec!["lucyb".to_string()],
    )
}

fn engine(store: Arc<JsonAliasStore>, parse: ParseResponse, api: Arc<RecordingApi>) -> SubmissionEngine {
    SubmissionEngine::new(
        store,
        Arc::new(FixedImage),
        Arc::new(FixedParse(parse)),
        api,
        "https://wingstats.test",
    )
}

fn submission() -> Submission {
    Submission {
        image_url: "https://cdn.test/scorecard.png".to_string(),
        uploader: "lucy.b".to_string(),
    }
}

#[tokio::test]
async fn test_submission_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    // Parser reads "lucyb"; register it as another name of lucy.b
    store.register("lucy.b", "lucyb").await.unwrap();

    let api = Arc::new(RecordingApi::default());
    let engine = engine(store, lucy_and_sam(), api.clone())
        .with_gifs(Arc::new(FixedGif(Some("https://media.test/clown.gif"))));

    let directory = StaticDirectory::new()
        .with_member("Sam01", "<@2002>")
        .with_member("lucy.b", "<@1001>");

    let outcome = engine.submit(&submission(), &directory).await.unwrap();

    assert_eq!(outcome.game_id, "42");
    assert_eq!(outcome.game_url, "https://wingstats.test/games/42");
    assert_eq!(
        outcome.announcement,
        "**Game Recorded!**\n\n\
         1. Lucy - 140 pts :first_place:\n\
         2. Sam - 95 pts :second_place:\n\
         \n:trophy: Winner: **Lucy**\n\
         \n:link: https://wingstats.test/games/42"
    );
    assert_eq!(outcome.winners, vec!["Lucy".to_string()]);

    assert_eq!(outcome.targets.len(), 1);
    let sam = &outcome.targets[0];
    assert_eq!(sam.player, "Sam");
    assert_eq!(sam.score, 95);
    assert_eq!(sam.identity.as_deref(), Some("sam01"));
    assert_eq!(sam.mention.as_deref(), Some("<@2002>"));

    let taunt = outcome.taunt.unwrap();
    assert!(taunt.starts_with("<@2002> "));
    assert!(taunt.ends_with("\nhttps://media.test/clown.gif"));
    assert!(TAUNTS.iter().any(|t| taunt.contains(t.phrase)));

    // Canonical names are what gets recorded
    let created = api.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let names: Vec<&str> = created[0].players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Lucy", "Sam"]);
    assert_eq!(created[0].uploaded_by, "Discord:lucy.b");
}

#[tokio::test]
async fn test_unmapped_names_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(RecordingApi::default());
    let engine = engine(store_in(&dir), lucy_and_sam(), api);

    let outcome = engine.submit(&submission(), &NoDirectory).await.unwrap();

    // "lucyb" is not registered, "sam" matches "Sam" case-insensitively
    assert!(outcome.announcement.contains("1. lucyb - 140 pts :first_place:"));
    assert!(outcome.announcement.contains("2. Sam - 95 pts :second_place:"));
    assert!(outcome.announcement.contains(":trophy: Winner: **lucyb**"));

    // Sam is a low scorer with an identity, but nobody can be mentioned
    assert_eq!(outcome.targets[0].identity.as_deref(), Some("sam01"));
    assert_eq!(outcome.targets[0].mention, None);
    assert_eq!(outcome.taunt, None);
}

#[tokio::test]
async fn test_taunt_without_gif() {
    let dir = tempfile::tempdir().unwrap();
    let directory = StaticDirectory::new().with_member("sam01", "<@2002>");

    let no_match = engine(store_in(&dir), lucy_and_sam(), Arc::new(RecordingApi::default()))
        .with_gifs(Arc::new(FixedGif(None)));
    let taunt = no_match.submit(&submission(), &directory).await.unwrap().taunt.unwrap();
    assert!(taunt.starts_with("<@2002> "));
    assert!(!taunt.contains('\n'));

    let broken = engine(store_in(&dir), lucy_and_sam(), Arc::new(RecordingApi::default()))
        .with_gifs(Arc::new(BrokenGif));
    let taunt = broken.submit(&submission(), &directory).await.unwrap().taunt.unwrap();
    assert!(!taunt.contains('\n'));
}

#[tokio::test]
async fn test_tied_scores_share_rank() {
    let dir = tempfile::tempdir().unwrap();
    let parse = ParseResponse::ok(
        vec![
            ParsedPlayer::new("Wren", 120),
            ParsedPlayer::new("Robin", 95),
            ParsedPlayer::new("Finch", 95),
            ParsedPlayer::new("Jay", 60),
        ],
        vec!["Wren".to_string()],
    );
    let engine = engine(store_in(&dir), parse, Arc::new(RecordingApi::default()));

    let outcome = engine.submit(&submission(), &NoDirectory).await.unwrap();
    let ranks: Vec<(usize, &str)> = outcome
        .ranked
        .iter()
        .map(|r| (r.rank, r.item.name.as_str()))
        .collect();
    assert_eq!(ranks, vec![(1, "Wren"), (2, "Robin"), (2, "Finch"), (4, "Jay")]);
    assert!(outcome.announcement.contains("4. Jay - 60 pts\n"));
}

#[tokio::test]
async fn test_parse_failure_is_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(RecordingApi::default());

    let mut failed = ParseResponse::ok(vec![], vec![]);
    failed.success = false;
    let err = engine(store_in(&dir), failed, api.clone())
        .submit(&submission(), &NoDirectory)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Could not parse the scorecard: Unknown error");

    let err = engine(store_in(&dir), ParseResponse::ok(vec![], vec![]), api.clone())
        .submit(&submission(), &NoDirectory)
        .await
        .unwrap_err();
    assert!(matches!(err, WingStatsError::NoPlayers));

    let err = SubmissionEngine::new(
        store_in(&dir),
        Arc::new(FixedImage),
        Arc::new(FailingParse),
        api.clone(),
        "https://wingstats.test",
    )
    .submit(&submission(), &NoDirectory)
    .await
    .unwrap_err();
    assert_eq!(err.user_message(), "ScoreBird parsing failed: reader crashed");

    assert!(api.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_registration_changes_next_submission() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let api = Arc::new(RecordingApi::default());
    let engine = engine(store.clone(), lucy_and_sam(), api);

    let before = engine.submit(&submission(), &NoDirectory).await.unwrap();
    assert_eq!(before.winners, vec!["lucyb".to_string()]);

    store.register("Lucy.B", "lucyb").await.unwrap();

    let after = engine.submit(&submission(), &NoDirectory).await.unwrap();
    assert_eq!(after.winners, vec!["Lucy".to_string()]);

    // Persisted under the existing key
    let reopened = JsonAliasStore::open(dir.path().join("players.json"));
    assert_eq!(
        reopened.names_for("lucy.b").await.unwrap(),
        vec!["Lucy".to_string(), "lucyb".to_string()]
    );
}
