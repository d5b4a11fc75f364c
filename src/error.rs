//! Error types shared across the crate

use thiserror::Error;

/// Errors produced while looking up suggestions or loading settings
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request itself failed (connect, timeout, body read)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("{backend} answered with HTTP {status}")]
    Status { backend: String, status: u16 },

    /// The response body was not the JSON shape we expected
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// No backend is registered under this name
    #[error("unknown autocomplete backend: {0}")]
    UnknownBackend(String),

    /// A setting holds a value the client cannot use
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
