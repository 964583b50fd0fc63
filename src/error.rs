//! Error types for the dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! No fetch failure is fatal: every error is caught at the fetch boundary,
//! logged, and normalized into a state transition.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport errors (request rejected, connection failed)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success HTTP status from the API
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: retry after {0} seconds")]
    RateLimit(u64),

    /// JSON parsing errors (malformed payload)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON with an unexpected shape
    #[error("Unexpected payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err.to_string())
    }
}
