use serde::{Deserialize, Deserializer, Serialize};

/// Accept `null` where a number is expected (the reader emits `None` for unread cells)
fn zero_if_null<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Points per scoring category as read from one scorecard row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub bird_points: i64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub bonus: i64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub end_of_round: i64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub egg: i64,

    /// Cached food
    #[serde(default, deserialize_with = "zero_if_null")]
    pub cache: i64,

    /// Tucked cards
    #[serde(default, deserialize_with = "zero_if_null")]
    pub tuck: i64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub nectar: i64,

    /// Duet map tokens
    #[serde(default, deserialize_with = "zero_if_null")]
    pub duet_pts: i64,
}

/// One player row from a parsed scorecard. Lives for a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPlayer {
    /// Display name as read by OCR (canonicalized later)
    pub name: String,

    #[serde(default)]
    pub scores: ScoreBreakdown,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub total: i64,
}

impl ParsedPlayer {
    pub fn new(name: impl Into<String>, total: i64) -> Self {
        Self {
            name: name.into(),
            scores: ScoreBreakdown::default(),
            total,
        }
    }
}

/// Body of `POST /parse`: base64 image, optionally as a data URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    pub image: String,
}

/// Response of `POST /parse`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    pub players: Vec<ParsedPlayer>,

    #[serde(default)]
    pub winners: Vec<String>,

    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<String>,

    /// Base64 annotated image, when the reader provides one
    #[serde(default)]
    pub debug_image: Option<String>,
}

impl ParseResponse {
    pub fn ok(players: Vec<ParsedPlayer>, winners: Vec<String>) -> Self {
        Self {
            players,
            winners,
            success: true,
            error: None,
            debug_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_from_service_json() {
        let json = r#"{
            "players": [
                {"name": "lucyb", "scores": {"bird_points": 40, "bonus": 10, "egg": null}, "total": 140}
            ],
            "winners": ["lucyb"],
            "success": true,
            "error": null,
            "debug_image": null
        }"#;

        let parsed: ParseResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.players.len(), 1);
        assert_eq!(parsed.players[0].scores.bird_points, 40);
        assert_eq!(parsed.players[0].scores.egg, 0);
        assert_eq!(parsed.players[0].scores.nectar, 0);
        assert_eq!(parsed.players[0].total, 140);
        assert_eq!(parsed.winners, vec!["lucyb".to_string()]);
    }

    #[test]
    fn test_failed_parse_response() {
        let parsed: ParseResponse =
            serde_json::from_str(r#"{"success": false, "error": "no scoreboard"}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.players.is_empty());
        assert_eq!(parsed.error.as_deref(), Some("no scoreboard"));
    }
}
