//! Error types for controller sessions.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure reported by the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response document lacked an expected field.
    #[error("response has no string field '{0}'")]
    MissingField(&'static str),

    /// A response body decoded but had the wrong shape.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// The controller answered a document request with a non-success status.
    #[error("{path} returned HTTP {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// A value handed in as settings is not a settings object.
    #[error("not an auto-config settings object: {0}")]
    InvalidSettings(String),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}
