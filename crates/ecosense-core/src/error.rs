//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Errors from fetching or decoding remote data.
///
/// Normalization itself is total and never produces an error: malformed
/// records are skipped per record. Everything here is a transport or decode
/// failure, and every one of them degrades to a stale-but-consistent
/// displayed state rather than aborting anything.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The HTTP request itself failed (connection, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured endpoint URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias using ecosense-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
