//! Error types for the uploader.

use thiserror::Error;

/// Errors that abort an upload run.
///
/// The destination assigns the identifiers later resources depend on, so a
/// failed creation poisons everything downstream and the run stops rather
/// than leaving a partially wired database.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The destination rejected the configured credentials.
    #[error("could not log in to the OLD as user {0}")]
    AuthenticationFailed(String),

    /// Transport-level failure talking to the destination.
    #[error("destination request failed: {0}")]
    Service(String),

    /// The destination did not return an id for a created resource.
    #[error("failed to create an OLD {resource} resource for {key}")]
    CreationFailed {
        /// Resource type being created.
        resource: &'static str,
        /// Natural key of the resource that failed.
        key: String,
    },

    /// The destination rejected an update of an existing resource.
    #[error("failed to update OLD {resource} resource {key}")]
    UpdateFailed {
        /// Resource type being updated.
        resource: &'static str,
        /// Natural key of the resource that failed.
        key: String,
    },

    /// A trashed form was created but could not be deleted again.
    #[error("failed to delete the migrated trashed form for datum {0}")]
    DeletionFailed(String),

    /// The migration tag has no destination id; forms, corpora and
    /// collections cannot be tagged without it.
    #[error("failed to get the OLD id for the migration tag")]
    MigrationTagUnresolved,

    /// A username reduced to nothing after removing OLD-invalid characters.
    #[error("unable to create a valid OLD username for LingSync user {0}")]
    InvalidUsername(String),

    /// The destination returned a resource listing entry without the
    /// expected shape.
    #[error("malformed {resource} resource in destination listing")]
    MalformedResource {
        /// Resource type that was listed.
        resource: &'static str,
    },

    /// A downloaded media file could not be read back for upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrap a destination client error.
pub(crate) fn service_error(error: impl std::fmt::Display) -> UploadError {
    UploadError::Service(error.to_string())
}
