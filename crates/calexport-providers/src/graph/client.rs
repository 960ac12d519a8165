//! Microsoft Graph HTTP client for calendar event pages.

use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, Page, PageSource};

use super::config::GraphConfig;
use super::http_client;

/// Fetches calendar pages from Graph with a bearer token.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    access_token: String,
}

impl GraphClient {
    /// Creates a client that authenticates every request with `access_token`.
    pub fn new(access_token: impl Into<String>, config: &GraphConfig) -> ProviderResult<Self> {
        Ok(Self {
            http_client: http_client(config.timeout)?,
            access_token: access_token.into(),
        })
    }

    async fn get_page(&self, url: &str) -> ProviderResult<Page> {
        debug!(%url, "GET event page");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_provider("graph")
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(
                ProviderError::from_status(status.as_u16(), &body, retry_after)
                    .with_provider("graph"),
            );
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e)).with_provider("graph")
        })?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_provider("graph")
        })?;

        Page::from_value(&value).map_err(|e| e.with_provider("graph"))
    }
}

impl PageSource for GraphClient {
    fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ProviderResult<Page>> {
        Box::pin(self.get_page(url))
    }
}
