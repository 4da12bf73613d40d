use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::{Result, WingStatsError};
use crate::providers::{upstream_error, ImageSource};

/// Plain HTTP GET of a Discord CDN attachment
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WingStatsError::from_request("download", e))?;

        if response.status() != StatusCode::OK {
            return Err(upstream_error("download", response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WingStatsError::from_request("download", e))?;

        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
