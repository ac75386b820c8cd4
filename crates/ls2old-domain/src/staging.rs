//! The staging store: every converted destination payload, awaiting upload.
//!
//! Built by folding conversion outcomes in document order; insertion
//! deduplicates by full-payload equality, so two documents implying the
//! identical speaker produce one staged speaker. Arrival order is
//! significant: the consolidator's first-occurrence-wins contract and the
//! uploader's creation order both derive from it.

use crate::outcome::{ConversionOutcome, PrimaryPayload};
use crate::resource::{
    ApplicationSettings, Collection, Corpus, FilePayload, Form, Speaker, Tag, User,
};
use crate::warning::Warnings;
use serde::{Deserialize, Serialize};

/// Converted destination payloads, one ordered list per resource type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagingStore {
    /// Staged users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Staged speakers.
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    /// Staged tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Staged files.
    #[serde(default)]
    pub files: Vec<FilePayload>,
    /// Staged forms.
    #[serde(default)]
    pub forms: Vec<Form>,
    /// Staged corpora.
    #[serde(default)]
    pub corpora: Vec<Corpus>,
    /// Staged collections.
    #[serde(default)]
    pub collections: Vec<Collection>,
    /// The synthesized application settings (zero or one).
    #[serde(default)]
    pub applicationsettings: Vec<ApplicationSettings>,
}

impl StagingStore {
    /// New, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one conversion outcome in: primary payload, auxiliary payloads
    /// and warnings. Payloads equal to an already-staged one are dropped.
    pub fn fold(&mut self, outcome: ConversionOutcome, warnings: &mut Warnings) {
        match outcome.primary {
            Some(PrimaryPayload::Collection(c)) => push_unique(&mut self.collections, c),
            Some(PrimaryPayload::Form(f)) => push_unique(&mut self.forms, f),
            Some(PrimaryPayload::User(u)) => push_unique(&mut self.users, u),
            Some(PrimaryPayload::Corpus(c)) => push_unique(&mut self.corpora, c),
            None => {}
        }
        for u in outcome.auxiliary.users {
            push_unique(&mut self.users, u);
        }
        for s in outcome.auxiliary.speakers {
            push_unique(&mut self.speakers, s);
        }
        for t in outcome.auxiliary.tags {
            push_unique(&mut self.tags, t);
        }
        for f in outcome.auxiliary.files {
            push_unique(&mut self.files, f);
        }
        warnings.absorb(outcome.kind, &outcome.source_id, outcome.warnings);
    }

    /// Per-resource-type counts, in upload order, for summary reporting.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("applicationsettings", self.applicationsettings.len()),
            ("users", self.users.len()),
            ("speakers", self.speakers.len()),
            ("tags", self.tags.len()),
            ("files", self.files.len()),
            ("forms", self.forms.len()),
            ("corpora", self.corpora.len()),
            ("collections", self.collections.len()),
        ]
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}
