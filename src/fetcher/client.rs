//! Heatmap HTTP client
//!
//! Fetches the heatmap payload from the configured endpoint.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use super::HeatmapSource;
use crate::heatmap::HeatmapPayload;

/// Configuration for the heatmap client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the heatmap endpoint (e.g. "http://localhost:8000/heatmap")
    pub url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/heatmap".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// HTTP client for the heatmap endpoint
pub struct HeatmapClient {
    client: Client,
    config: ClientConfig,
}

impl HeatmapClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// GET the endpoint and decode the body.
    ///
    /// The body is read as text first so that malformed JSON surfaces as a
    /// parse error rather than a transport error.
    pub async fn fetch_payload(&self) -> FetchResult<HeatmapPayload> {
        tracing::debug!(url = %self.config.url, "Fetching heatmap");

        let response = self.client.get(&self.config.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Heatmap request failed");
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: HeatmapPayload = serde_json::from_str(&body)?;

        tracing::debug!(
            samples = payload.heat_values.len(),
            raw_counts = payload.raw_counts.len(),
            "Heatmap received"
        );
        Ok(payload)
    }
}

#[async_trait]
impl HeatmapSource for HeatmapClient {
    fn endpoint(&self) -> &str {
        &self.config.url
    }

    async fn fetch(&self) -> FetchResult<HeatmapPayload> {
        self.fetch_payload().await
    }
}
