//! The relational map: source keys to destination-assigned identifiers.
//!
//! Built incrementally during upload, strictly in dependency order, and read
//! by every later resource type that references an earlier one. Entries are
//! never removed; the map lives for one upload run only and is not
//! persisted.

use std::collections::HashMap;

/// Destination-assigned identifier (the OLD uses integer ids).
pub type DestinationId = i64;

/// Per-resource-type natural-key lookup tables.
#[derive(Debug, Clone, Default)]
pub struct RelationalMap {
    /// Username (the original source username when sanitization renamed it)
    /// to user id.
    pub users: HashMap<String, DestinationId>,
    /// `"first last"` to speaker id.
    pub speakers: HashMap<String, DestinationId>,
    /// Tag name to tag id.
    pub tags: HashMap<String, DestinationId>,
    /// Source datum id to the ids of the files created from its attachments.
    pub files: HashMap<String, Vec<DestinationId>>,
    /// Source datum id to form id. Trashed forms never enter this map.
    pub forms: HashMap<String, DestinationId>,
    /// Source datalist id to corpus id.
    pub corpora: HashMap<String, DestinationId>,
    /// Source session id to collection id.
    pub collections: HashMap<String, DestinationId>,
}

impl RelationalMap {
    /// New, empty map for the start of an upload run.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The natural key of a speaker: first and last name joined by a space.
pub fn speaker_key(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}
