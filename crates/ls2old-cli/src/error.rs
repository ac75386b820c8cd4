//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required setting was supplied neither on the command line nor in
    /// the configuration file
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    /// HTTP client construction error
    #[error(transparent)]
    Client(#[from] ls2old_client::ClientError),

    /// Extraction error
    #[error(transparent)]
    Extract(#[from] ls2old_extractor::ExtractorError),

    /// Conversion error
    #[error(transparent)]
    Convert(#[from] ls2old_converter::ConvertError),

    /// Upload error
    #[error(transparent)]
    Upload(#[from] ls2old_uploader::UploadError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
