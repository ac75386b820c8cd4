//! Error types for the converter.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion run. Everything recoverable is a warning
/// in the [`Warnings`](ls2old_domain::Warnings) accumulator instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A session document with neither a `sessionFields` nor a `fields`
    /// attribute cannot be mapped.
    #[error("session {0} has neither a sessionFields nor a fields attribute")]
    SessionMissingFields(String),

    /// A datum document without a `datumFields` attribute cannot be mapped.
    #[error("datum {0} has no datumFields attribute")]
    DatumMissingFields(String),

    /// The raw dump artifact has no `rows` member.
    #[error("no document rows in LingSync dump {0}")]
    MalformedDump(PathBuf),

    /// An artifact on disk exists but cannot be parsed.
    #[error("could not parse artifact {path}: {source}")]
    CorruptArtifact {
        /// Path of the unreadable artifact.
        path: PathBuf,
        /// The underlying parse failure.
        source: serde_json::Error,
    },

    /// Filesystem error while reading or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
