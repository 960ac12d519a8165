//! Client error types.

use std::path::PathBuf;

use calexport_providers::{ProviderError, ProviderErrorCode};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or invalid configuration, including credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token acquisition failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Any other provider failure that reached the top level.
    #[error("provider error: {0}")]
    Provider(String),

    /// The export document given to the projector does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The export document could not be parsed.
    #[error("invalid export document {}: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing a file failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a CSV file failed.
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The export document could not be serialized.
    #[error("failed to serialize export document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ClientError {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a CSV error with the path it happened on.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        match err.code() {
            ProviderErrorCode::ConfigurationError => Self::Config(err.message().to_string()),
            ProviderErrorCode::AuthenticationFailed => Self::Auth(err.message().to_string()),
            _ => Self::Provider(err.to_string()),
        }
    }
}
