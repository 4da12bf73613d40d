use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::core::{ParseRequest, ParseResponse};
use crate::error::{Result, WingStatsError};
use crate::providers::{upstream_error, ScorecardParser};

/// HTTP client for the ScoreBird `/parse` endpoint
pub struct ScoreBirdClient {
    client: Client,
    base_url: String,
}

impl ScoreBirdClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Liveness check against `/health`
    pub async fn is_available(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ScorecardParser for ScoreBirdClient {
    async fn parse(&self, image: &[u8]) -> Result<ParseResponse> {
        let url = format!("{}/parse", self.base_url);
        let request = ParseRequest {
            image: STANDARD.encode(image),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WingStatsError::from_request("scorebird", e))?;

        if response.status() != StatusCode::OK {
            return Err(upstream_error("scorebird", response).await);
        }

        let parsed: ParseResponse = response
            .json()
            .await
            .map_err(|e| WingStatsError::from_request("scorebird", e))?;

        tracing::debug!(
            "ScoreBird returned {} players (success={})",
            parsed.players.len(),
            parsed.success
        );

        Ok(parsed)
    }

    fn name(&self) -> &str {
        "scorebird"
    }
}
