//! Crate error types.
//!
//! The evaluators never fail; these cover the I/O seams around them.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Failure to obtain a usable rate snapshot. The previous snapshot stays in use.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the rate service.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Response parsed but lacks the rates we need.
    #[error("Invalid API response format: {0}")]
    MalformedResponse(String),

    #[error("Invalid rate endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Preset name must not be blank")]
    EmptyPresetName,
}
