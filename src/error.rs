use thiserror::Error;

/// Main error type for the bot and the parse shim
#[derive(Error, Debug)]
pub enum WingStatsError {
    /// HTTP transport errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors (alias table, reader scratch files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed base64 image payload
    #[error("Invalid base64 image: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Non-success status from an upstream service; `message` is the raw body
    #[error("{service} returned an error: {message}")]
    Upstream { service: String, message: String },

    /// Upstream call exceeded its timeout
    #[error("{0} request timed out")]
    Timeout(String),

    /// Parse service answered but could not read the scorecard
    #[error("Could not parse the scorecard: {0}")]
    ParseFailed(String),

    /// Scorecard read successfully but contained no players
    #[error("No players found in the scorecard")]
    NoPlayers,

    /// Message carried no image attachment
    #[error("No image attachment found")]
    NoImages,

    /// WingStats API has no such player
    #[error("Player '{0}' not found")]
    PlayerNotFound(String),

    /// Alias store errors
    #[error("Alias store error: {0}")]
    Store(String),

    /// External scorecard reader errors
    #[error("Scorecard reader error: {0}")]
    Reader(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl WingStatsError {
    /// Map a reqwest failure for `service`, keeping timeouts distinguishable
    pub fn from_request(service: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WingStatsError::Timeout(service.to_string())
        } else {
            WingStatsError::HttpRequest(err)
        }
    }

    /// Text shown to the submitter when a scorecard submission fails
    pub fn user_message(&self) -> String {
        match self {
            WingStatsError::Timeout(_) => "Request timed out. Please try again.".to_string(),
            WingStatsError::NoPlayers => {
                "No players found in the scorecard. Is this a valid Wingspan score screen?".to_string()
            }
            WingStatsError::NoImages => "Please attach a Wingspan scorecard image when tagging me!\n\
                 You can also reply to a message that has a scorecard image."
                .to_string(),
            WingStatsError::ParseFailed(detail) => format!("Could not parse the scorecard: {}", detail),
            WingStatsError::Upstream { service, message } => match service.as_str() {
                "download" => "Failed to download image.".to_string(),
                "scorebird" => format!("ScoreBird parsing failed: {}", message),
                "wingstats" => format!("Failed to save game: {}", message),
                _ => format!("{} failed: {}", service, message),
            },
            e => format!("An error occurred: {}", e),
        }
    }
}

impl From<String> for WingStatsError {
    fn from(s: String) -> Self {
        WingStatsError::Other(s)
    }
}

impl From<&str> for WingStatsError {
    fn from(s: &str) -> Self {
        WingStatsError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WingStatsError>;
