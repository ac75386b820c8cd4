//! Error types for the extractor.

use thiserror::Error;

/// Errors that can occur during extraction.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The LingSync server rejected the configured credentials.
    #[error("could not log in to the LingSync server at {0}")]
    AuthenticationFailed(String),

    /// The authenticated user may not read the requested corpus.
    #[error("not authorized to access the LingSync corpus {0}")]
    Unauthorized(String),

    /// Source store error (transport, malformed response).
    #[error("source error: {0}")]
    Source(String),

    /// Filesystem error while writing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dump could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
