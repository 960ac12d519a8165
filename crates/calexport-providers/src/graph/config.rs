//! Microsoft Graph provider configuration.

use std::time::Duration;

use crate::error::{ProviderError, ProviderResult};

/// Default Graph API root.
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Default identity platform authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested with the client-credentials grant.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Events requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// App registration credentials for the client-credentials grant.
#[derive(Clone)]
pub struct GraphCredentials {
    /// Directory (tenant) ID.
    pub tenant_id: String,
    /// Application (client) ID.
    pub client_id: String,
    /// Client secret value.
    pub client_secret: String,
}

impl GraphCredentials {
    /// Creates credentials from known values.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Builds credentials from possibly-missing values.
    ///
    /// Empty values count as missing. The error names every missing value.
    pub fn from_parts(
        tenant_id: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> ProviderResult<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (present(tenant_id), present(client_id), present(client_secret)) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(Self {
                tenant_id,
                client_id,
                client_secret,
            }),
            (tenant_id, client_id, client_secret) => {
                let missing: Vec<&str> = [
                    ("TENANT_ID", tenant_id.is_none()),
                    ("CLIENT_ID", client_id.is_none()),
                    ("CLIENT_SECRET", client_secret.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                Err(ProviderError::configuration(format!(
                    "missing {}; populate the keys file, config.toml or environment variables",
                    missing.join("/")
                )))
            }
        }
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Endpoint and transport settings for the Graph provider.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Graph API root, without trailing slash.
    pub graph_base: String,
    /// Identity platform authority, without trailing slash.
    pub authority: String,
    /// Events requested per page.
    pub page_size: u32,
    /// Request timeout; `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: None,
        }
    }
}

impl GraphConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the Graph API root.
    pub fn with_graph_base(mut self, base: impl Into<String>) -> Self {
        self.graph_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder method to set the authority.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder method to set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// First page of the owner's calendar events.
    pub fn events_url(&self, owner: &str) -> String {
        format!(
            "{}/users/{}/calendar/events?$top={}",
            self.graph_base,
            urlencoding::encode(owner),
            self.page_size
        )
    }

    /// Token endpoint for `tenant_id`.
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority,
            urlencoding::encode(tenant_id)
        )
    }
}
