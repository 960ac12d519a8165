//! Client-credentials token acquisition for Microsoft Graph.
//!
//! The app authenticates as itself (no user sign-in), which is what allows
//! reading other users' calendars with the `Calendars.Read` application
//! permission.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::{GRAPH_DEFAULT_SCOPE, GraphConfig, GraphCredentials};
use super::http_client;

/// Exchanges app credentials for a Graph access token.
#[derive(Debug)]
pub struct Authenticator {
    http_client: reqwest::Client,
    config: GraphConfig,
}

impl Authenticator {
    /// Creates an authenticator using `config` for the authority and timeout.
    pub fn new(config: GraphConfig) -> ProviderResult<Self> {
        Ok(Self {
            http_client: http_client(config.timeout)?,
            config,
        })
    }

    /// Requests an access token with the client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the request fails, the service
    /// rejects it, or the response carries no access token.
    pub async fn acquire_token(&self, credentials: &GraphCredentials) -> ProviderResult<String> {
        let url = self.config.token_url(&credentials.tenant_id);
        debug!(%url, client_id = %credentials.client_id, "requesting access token");

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", GRAPH_DEFAULT_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http_client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::authentication(format!("token request failed: {}", e))
                    .with_provider("graph")
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::authentication(format!("failed to read token response: {}", e))
                .with_provider("graph")
        })?;

        let token = parse_token_response(status.is_success(), &body)?;
        info!("obtained Graph access token");
        Ok(token)
    }
}

/// Body of the token endpoint response, success or failure.
#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Extracts the access token from a token endpoint response.
fn parse_token_response(success: bool, body: &str) -> ProviderResult<String> {
    let parsed: TokenResponse = serde_json::from_str(body).unwrap_or_default();

    match parsed.access_token.filter(|t| !t.is_empty()) {
        Some(token) if success => Ok(token),
        _ => {
            let reason = parsed
                .error_description
                .or(parsed.error)
                .unwrap_or_else(|| body.trim().to_string());
            Err(
                ProviderError::authentication(format!("failed to get Graph token: {}", reason))
                    .with_provider("graph"),
            )
        }
    }
}
