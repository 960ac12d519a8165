//! Client configuration.
//!
//! Graph settings come from three places, later ones overriding earlier ones:
//!
//! 1. `TENANT_ID`, `CLIENT_ID` and `CLIENT_SECRET` in the environment
//!    (a `.env` file in the working directory is loaded first)
//! 2. the `[graph]` section of `config.toml`, by default at
//!    `~/.config/calexport/config.toml`
//! 3. the loose `keys.txt` file written next to the app registration
//!
//! Credential values in `config.toml` support secret references
//! (`env::VAR`, `file::path`), see [`crate::secret`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use calexport_providers::graph::{GraphConfig, GraphCredentials};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the tenant ID.
pub const TENANT_ID_VAR: &str = "TENANT_ID";
/// Environment variable holding the client ID.
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
/// Environment variable holding the client secret.
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the calexport client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Microsoft Graph settings.
    pub graph: GraphSettings,
}

impl ClientConfig {
    /// Loads configuration from the default path, if the file exists.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ClientError::io(path, e))?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calexport")
    }
}

// ---------------------------------------------------------------------------
// GraphSettings ([graph] in config.toml)
// ---------------------------------------------------------------------------

/// Microsoft Graph settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Directory (tenant) ID. Supports secret references.
    pub tenant_id: Option<String>,

    /// Application (client) ID. Supports secret references.
    pub client_id: Option<String>,

    /// Client secret value. Supports secret references.
    pub client_secret: Option<String>,

    /// Graph API root, e.g. `https://graph.microsoft.com/v1.0`.
    pub graph_base: Option<String>,

    /// Identity platform authority, e.g. `https://login.microsoftonline.com`.
    pub authority: Option<String>,

    /// Events requested per page.
    pub page_size: Option<u32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl GraphSettings {
    /// Converts to provider configuration; unset values keep their defaults.
    pub fn to_provider_config(&self) -> GraphConfig {
        let mut config = GraphConfig::new();

        if let Some(ref base) = self.graph_base {
            config = config.with_graph_base(base);
        }
        if let Some(ref authority) = self.authority {
            config = config.with_authority(authority);
        }
        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config
    }
}

// ---------------------------------------------------------------------------
// KeysFile (keys.txt)
// ---------------------------------------------------------------------------

/// Credentials read from a loosely formatted keys file.
///
/// Lines look like `Tenant ID: ...`, `Client ID = ...` or `Value: ...`.
/// Keys are matched case-insensitively with spaces removed; the value is
/// whatever follows the first `:`, then the first `=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeysFile {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl KeysFile {
    /// Parses keys file content. Unrecognized lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut keys = Self::default();

        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let norm = line.to_lowercase().replace(' ', "");
            let slot = if norm.starts_with("tenantid") {
                &mut keys.tenant_id
            } else if norm.starts_with("appclientid") || norm.starts_with("clientid") {
                &mut keys.client_id
            } else if norm.starts_with("value") || norm.starts_with("clientsecret") {
                &mut keys.client_secret
            } else {
                continue;
            };
            *slot = Some(line_value(line).to_string());
        }

        keys
    }

    /// Loads a keys file; a missing file is not an error.
    pub fn load(path: &Path) -> ClientResult<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "no keys file");
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| ClientError::io(path, e))?;
        Ok(Some(Self::parse(&content)))
    }
}

fn line_value(line: &str) -> &str {
    let after_colon = line.split_once(':').map_or(line, |(_, v)| v);
    let after_equals = after_colon.split_once('=').map_or(after_colon, |(_, v)| v);
    after_equals.trim()
}

// ---------------------------------------------------------------------------
// Credential resolution
// ---------------------------------------------------------------------------

/// Resolves Graph credentials from every source.
///
/// `env` looks up environment variables; it is also used to expand `env::`
/// references in `config.toml`. Empty values never override a lower layer.
pub fn resolve_credentials(
    settings: &GraphSettings,
    keys: Option<&KeysFile>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientResult<GraphCredentials> {
    let from_config = |field: &str, value: &Option<String>| -> ClientResult<Option<String>> {
        value
            .as_deref()
            .map(|raw| {
                crate::secret::resolve_with(raw, &env)
                    .map_err(|e| ClientError::Config(format!("failed to resolve {}: {}", field, e)))
            })
            .transpose()
    };

    let tenant_id = layered([
        env(TENANT_ID_VAR),
        from_config("tenant_id", &settings.tenant_id)?,
        keys.and_then(|k| k.tenant_id.clone()),
    ]);
    let client_id = layered([
        env(CLIENT_ID_VAR),
        from_config("client_id", &settings.client_id)?,
        keys.and_then(|k| k.client_id.clone()),
    ]);
    let client_secret = layered([
        env(CLIENT_SECRET_VAR),
        from_config("client_secret", &settings.client_secret)?,
        keys.and_then(|k| k.client_secret.clone()),
    ]);

    GraphCredentials::from_parts(tenant_id, client_id, client_secret).map_err(ClientError::from)
}

/// Picks the last non-empty value.
fn layered(layers: [Option<String>; 3]) -> Option<String> {
    layers
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .last()
}
