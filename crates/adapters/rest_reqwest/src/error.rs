//! REST adapter error types.

use hatchlink_domain::error::HatchError;

/// Errors specific to the REST adapter.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The configured base URL or a request path could not be parsed.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP exchange itself failed (connect, timeout, body read).
    #[error("HTTP request failed")]
    Http(#[source] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The envelope reported `success: false`.
    #[error("API error: {message}")]
    Api { message: String },

    /// The envelope or its payload did not have the expected shape.
    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),
}

impl From<RestError> for HatchError {
    fn from(err: RestError) -> Self {
        HatchError::Rest(Box::new(err))
    }
}
