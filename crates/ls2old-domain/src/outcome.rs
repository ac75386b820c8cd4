//! The output of mapping one source document.

use crate::document::DocKind;
use crate::resource::{Collection, Corpus, FilePayload, Form, Speaker, Tag, User};
use crate::warning::DocWarnings;

/// The primary destination payload a source document converts into.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryPayload {
    /// From a session.
    Collection(Collection),
    /// From a datum.
    Form(Form),
    /// From a user document.
    User(User),
    /// From a datalist.
    Corpus(Corpus),
}

/// Resources implied by, but not the primary subject of, a converted
/// document: a datum implies its speakers, its elicitor, its tags and its
/// media files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxiliaryResources {
    /// Inferred elicitor users.
    pub users: Vec<User>,
    /// Inferred speakers.
    pub speakers: Vec<Speaker>,
    /// Tags named by the document.
    pub tags: Vec<Tag>,
    /// Media attachments retained for download.
    pub files: Vec<FilePayload>,
}

impl AuxiliaryResources {
    /// True when the document implied nothing beyond its primary payload.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.speakers.is_empty()
            && self.tags.is_empty()
            && self.files.is_empty()
    }
}

/// The complete result of converting one source document.
///
/// `primary` is `None` only when the document was semantically empty or
/// invalid for its kind (a user without a username) or trashed in a kind
/// that forbids deletion echoing (sessions).
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Kind of the originating document.
    pub kind: DocKind,
    /// Source identifier of the originating document.
    pub source_id: String,
    /// The destination payload, when the document was convertible.
    pub primary: Option<PrimaryPayload>,
    /// Resources implied by this document.
    pub auxiliary: AuxiliaryResources,
    /// Warnings gathered during conversion.
    pub warnings: DocWarnings,
    /// Session language, collected for the application settings.
    pub language: Option<String>,
}

impl ConversionOutcome {
    /// An outcome with no payload (excluded document).
    pub fn empty(kind: DocKind, source_id: impl Into<String>, warnings: DocWarnings) -> Self {
        ConversionOutcome {
            kind,
            source_id: source_id.into(),
            primary: None,
            auxiliary: AuxiliaryResources::default(),
            warnings,
            language: None,
        }
    }
}
