//! Microsoft Graph calendar provider.
//!
//! # Flow
//!
//! 1. [`Authenticator`] exchanges the app's tenant/client/secret for a token
//! 2. [`GraphClient`] fetches `/users/{owner}/calendar/events` pages with it
//! 3. [`crate::PageWalker`] follows `@odata.nextLink` until the last page
//!
//! ```ignore
//! use calexport_providers::graph::{Authenticator, GraphClient, GraphConfig, GraphCredentials};
//! use calexport_providers::export_owner;
//!
//! let config = GraphConfig::new();
//! let token = Authenticator::new(config.clone())?.acquire_token(&credentials).await?;
//! let client = GraphClient::new(token, &config)?;
//! let export = export_owner(&client, &config.events_url(owner), owner, false).await;
//! ```

use std::time::Duration;

use crate::error::{ProviderError, ProviderResult};

mod auth;
mod client;
mod config;

pub use auth::Authenticator;
pub use client::GraphClient;
pub use config::{
    DEFAULT_AUTHORITY, DEFAULT_GRAPH_BASE, DEFAULT_PAGE_SIZE, GRAPH_DEFAULT_SCOPE, GraphConfig,
    GraphCredentials,
};

/// Builds the shared HTTP client; `None` keeps reqwest's default timeout.
fn http_client(timeout: Option<Duration>) -> ProviderResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        ProviderError::configuration(format!("failed to create HTTP client: {}", e))
            .with_provider("graph")
            .with_source(e)
    })
}
