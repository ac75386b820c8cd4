//! Destination resources: payloads accepted by the OLD web service.
//!
//! Each struct mirrors the OLD's create-request schema for that resource
//! type, with explicit fields instead of loose maps so the mapping functions
//! are exhaustively checkable. Fields prefixed `source_` are migration
//! bookkeeping: they persist in the staging artifact but are never sent to
//! the destination (the uploader builds wire payloads itself).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Literal substituted for required destination fields with no source value.
/// Deliberately unwarned; downstream repair tooling searches for it.
pub const PLACEHOLDER: &str = "PLACEHOLDER";

/// Fabricated email for users synthesized from bare username strings.
pub const PLACEHOLDER_EMAIL: &str = "fakeemail@gmail.com";

/// Password assigned to every newly created user.
pub const DEFAULT_PASSWORD: &str = "password9_B";

/// Destination resource types, in upload dependency order.
///
/// The order reflects the OLD's referential constraints: forms reference
/// users, speakers, tags and files; corpora and collections reference forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Singleton corpus-wide settings.
    ApplicationSettings,
    /// OLD users (from LingSync users and inferred elicitors).
    Users,
    /// OLD speakers (inferred from consultant strings).
    Speakers,
    /// OLD tags (from datum tag fields, plus the migration tag).
    Tags,
    /// OLD files (from datum audio/video attachments).
    Files,
    /// OLD forms (from datums).
    Forms,
    /// OLD corpora (from datalists).
    Corpora,
    /// OLD collections (from sessions).
    Collections,
}

impl ResourceKind {
    /// Upload dependency order, leaves first.
    pub const UPLOAD_ORDER: [ResourceKind; 8] = [
        ResourceKind::ApplicationSettings,
        ResourceKind::Users,
        ResourceKind::Speakers,
        ResourceKind::Tags,
        ResourceKind::Files,
        ResourceKind::Forms,
        ResourceKind::Corpora,
        ResourceKind::Collections,
    ];

    /// Pluralized resource name as used in OLD request paths.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::ApplicationSettings => "applicationsettings",
            ResourceKind::Users => "users",
            ResourceKind::Speakers => "speakers",
            ResourceKind::Tags => "tags",
            ResourceKind::Files => "files",
            ResourceKind::Forms => "forms",
            ResourceKind::Corpora => "corpora",
            ResourceKind::Collections => "collections",
        }
    }
}

/// An OLD user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique username, max 255 chars.
    pub username: String,
    /// First name; falls back to the username.
    pub first_name: String,
    /// Last name; falls back to the username.
    pub last_name: String,
    /// Email; [`PLACEHOLDER_EMAIL`] when the source had none.
    pub email: String,
    /// Affiliation, max 255 chars.
    #[serde(default)]
    pub affiliation: String,
    /// OLD role; migrated users are all `administrator`.
    #[serde(default)]
    pub role: String,
    /// Free-text page content accreted from source description fields.
    #[serde(default)]
    pub page_content: String,
}

/// An OLD speaker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    /// First name (or first-name initial).
    pub first_name: String,
    /// Last name (or last-name initials).
    pub last_name: String,
    /// Dialect, when the source session recorded one.
    #[serde(default)]
    pub dialect: String,
    /// Free-text page content.
    #[serde(default)]
    pub page_content: String,
}

/// An OLD tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique tag name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// One translation of a form; the OLD requires at least one per form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// The translation text; [`PLACEHOLDER`] when the source had none.
    pub transcription: String,
    /// Translation grammaticality; empty for migrated data.
    #[serde(default)]
    pub grammaticality: String,
}

/// An OLD file whose binary content still lives at a LingSync URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Filename, max 255 chars.
    #[serde(default)]
    pub filename: String,
    /// MIME type guessed from the filename extension.
    pub mime_type: String,
    /// Free-text description (provenance paragraphs).
    #[serde(default)]
    pub description: String,
    /// Source datum this attachment belonged to.
    pub source_datum_id: String,
    /// Remote URL the binary content is fetched from.
    pub source_url: String,
    /// Remote size in bytes, when the source recorded it.
    #[serde(default)]
    pub source_size: Option<u64>,
    /// MIME type the source claimed, kept for cross-checking.
    #[serde(default)]
    pub source_mime_type: Option<String>,
    /// Local path after the media fetcher has materialized the content.
    #[serde(default)]
    pub local_path: Option<PathBuf>,
}

/// An OLD form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    /// Orthographic transcription; required, max 255 chars.
    pub transcription: String,
    /// Broad phonetic transcription, max 255 chars.
    #[serde(default)]
    pub phonetic_transcription: String,
    /// Morpheme segmentation, max 255 chars.
    #[serde(default)]
    pub morpheme_break: String,
    /// Grammaticality judgement drawn from the marker set.
    #[serde(default)]
    pub grammaticality: String,
    /// Morpheme glosses, max 255 chars.
    #[serde(default)]
    pub morpheme_gloss: String,
    /// Translations; never empty.
    pub translations: Vec<Translation>,
    /// Free-text comments accreted from source metadata and overflow.
    #[serde(default)]
    pub comments: String,
    /// LaTeX syntax tree, max 1023 chars.
    #[serde(default)]
    pub syntax: String,
    /// Elicitation status; migrated forms are `tested`.
    #[serde(default)]
    pub status: String,
    /// Elicitation date in `MM/DD/YYYY`, empty when unparseable.
    #[serde(default)]
    pub date_elicited: String,
    /// Primary speaker, resolved to a destination id during upload.
    #[serde(default)]
    pub speaker: Option<Speaker>,
    /// Elicitor, resolved to a destination id during upload.
    #[serde(default)]
    pub elicitor: Option<User>,
    /// Tags, resolved to destination ids during upload.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Whether the source datum carried usable media attachments.
    #[serde(default)]
    pub has_files: bool,
    /// Source datum identifier; the form's relational key.
    pub source_datum_id: String,
    /// Source session the datum belonged to, for collection contents.
    #[serde(default)]
    pub source_session_id: Option<String>,
    /// Source entry timestamp, for chronological collection ordering.
    #[serde(default)]
    pub date_entered: Option<String>,
    /// Trashed at the source: create, then delete, during upload.
    #[serde(default)]
    pub deleted: bool,
}

/// An OLD collection (from a LingSync session).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Title; required, max 255 chars.
    pub title: String,
    /// Collection type; migrated sessions are `elicitation`.
    #[serde(rename = "type", default)]
    pub collection_type: String,
    /// Free-text description accreted from session metadata.
    #[serde(default)]
    pub description: String,
    /// Elicitation date in `MM/DD/YYYY`, empty when unparseable.
    #[serde(default)]
    pub date_elicited: String,
    /// Primary speaker.
    #[serde(default)]
    pub speaker: Option<Speaker>,
    /// Elicitor.
    #[serde(default)]
    pub elicitor: Option<User>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Source session identifier; the collection's relational key.
    pub source_session_id: String,
}

/// An OLD corpus (from a LingSync datalist).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// Name; required, unique, max 255 chars.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Source datalist identifier; the corpus's relational key.
    pub source_datalist_id: String,
    /// Source datum ids the datalist referenced, in listing order.
    #[serde(default)]
    pub source_datum_ids: Vec<String>,
}

/// OLD application settings synthesized from the whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Object language name; first session language observed.
    #[serde(default)]
    pub object_language_name: String,
    /// Comma-joined distinct grammaticality values across all forms.
    #[serde(default)]
    pub grammaticalities: String,
}

/// MIME types the OLD accepts for file resources.
pub const ALLOWED_FILE_TYPES: [&str; 12] = [
    "application/pdf",
    "image/gif",
    "image/jpeg",
    "image/png",
    "audio/mpeg",
    "audio/ogg",
    "audio/x-wav",
    "video/mpeg",
    "video/mp4",
    "video/ogg",
    "video/quicktime",
    "video/x-ms-wmv",
];

/// Guess a MIME type from a filename or URL extension, restricted to the
/// types the OLD accepts. `None` means the attachment is skipped.
pub fn guess_allowed_mime(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "mp3" => "audio/mpeg",
        "oga" => "audio/ogg",
        "wav" => "audio/x-wav",
        "mpeg" | "mpg" => "video/mpeg",
        "mp4" => "video/mp4",
        "ogg" | "ogv" => "video/ogg",
        "mov" | "qt" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        _ => return None,
    };
    debug_assert!(ALLOWED_FILE_TYPES.contains(&mime));
    Some(mime)
}
