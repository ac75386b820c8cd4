//! Error types for the HTTP clients.

use thiserror::Error;

/// Errors from talking to either web service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure, an error status, or a non-JSON response
    /// body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response decoded, but not into the shape the API promises.
    #[error("malformed response from {url}: {detail}")]
    MalformedResponse {
        /// The request URL.
        url: String,
        /// What was wrong with the body.
        detail: String,
    },
}
