use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::{Result, WingStatsError};
use crate::providers::{upstream_error, GifProvider};

pub const GIPHY_BASE_URL: &str = "https://api.giphy.com";

/// Giphy random-by-tag lookup
pub struct GiphyProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GiphyProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, GIPHY_BASE_URL, timeout)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GifProvider for GiphyProvider {
    async fn random_gif(&self, tag: &str) -> Result<Option<String>> {
        let url = format!("{}/v1/gifs/random", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("tag", tag),
                ("rating", "pg-13"),
            ])
            .send()
            .await
            .map_err(|e| WingStatsError::from_request("giphy", e))?;

        if response.status() != StatusCode::OK {
            return Err(upstream_error("giphy", response).await);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WingStatsError::from_request("giphy", e))?;

        // `data` is an empty array when nothing matched the tag
        let gif_url = body
            .pointer("/data/images/original/url")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(gif_url)
    }
}
