use std::time::Duration;
use thiserror::Error;

/// Top-level error type for Kurumi.
#[derive(Debug, Error)]
pub enum KurumiError {
    /// Error from the chat connection (send, upload, download, metadata).
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// External HTTP fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Image decoding or sticker encoding failed.
    #[error("transcode error: {0}")]
    Transcode(String),

    /// A command unit is malformed or failed to load.
    #[error("command error: {0}")]
    Command(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a bounded HTTP fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within its budget and was aborted.
    #[error("fetch {url} timed out after {}s", after.as_secs())]
    Timeout { url: String, after: Duration },

    /// Upstream answered with a non-success status.
    #[error("fetch {url} failed: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, or body transfer failed.
    #[error("fetch {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The body could not be decoded (e.g. malformed JSON).
    #[error("fetch {url} returned an undecodable body: {reason}")]
    Decode { url: String, reason: String },
}
