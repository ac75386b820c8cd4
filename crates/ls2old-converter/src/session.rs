//! Mapping of LingSync sessions to OLD collections.

use crate::error::ConvertError;
use crate::speakers::infer_speakers;
use crate::text::{
    char_len, join_paragraphs, normalize_date, punctuate_period_safe, render_comments,
    truncate_chars,
};
use ls2old_domain::document::{field_value, SourceDocument};
use ls2old_domain::warning::DocWarnings;
use ls2old_domain::{
    AuxiliaryResources, Collection, ConversionOutcome, PrimaryPayload, User, PLACEHOLDER_EMAIL,
};

const KNOWN_FIELDS: [&str; 10] = [
    "goal",
    "consultants",
    "dialect",
    "language",
    "dateElicited",
    "user",
    "dateSEntered",
    "participants",
    "dateSessionEntered",
    "DateSessionEntered",
];

const KNOWN_ATTRS: [&str; 21] = [
    "_id",
    "_rev",
    "collection",
    "comments",
    "dateCreated",
    "dateModified",
    "lastModifiedBy",
    "pouchname",
    "sessionFields",
    "title",
    "timestamp",
    "api",
    "dbname",
    "fieldDBtype",
    "fields",
    "modifiedByUser",
    "version",
    "dialect",
    "language",
    "trashed",
    "trashedReason",
];

/// Convert a session document to an OLD collection.
///
/// A session with no field list is unmappable and aborts the run. A trashed
/// session yields no payload at all: deleted sessions are not replayed on
/// the destination.
pub fn convert_session(doc: &SourceDocument) -> Result<ConversionOutcome, ConvertError> {
    let fields = doc
        .fields("sessionFields", Some("fields"))
        .ok_or_else(|| ConvertError::SessionMissingFields(doc.id.clone()))?;

    if doc.attr("trashed").as_deref() == Some("deleted") {
        return Ok(ConversionOutcome::empty(doc.kind, &doc.id, DocWarnings::default()));
    }

    let mut warnings = DocWarnings::default();
    let mut auxiliary = AuxiliaryResources::default();

    for attr in doc.unknown_attrs(&KNOWN_ATTRS) {
        warnings.doc(format!(
            "'{}' not a recognized attribute in session {}",
            attr, doc.id
        ));
    }
    for label in ls2old_domain::document::unknown_labels(&fields, &KNOWN_FIELDS) {
        warnings.doc(format!(
            "'{}' not a recognized label in fields for session {}",
            label, doc.id
        ));
    }

    let goal = field_value(&fields, "goal");
    let consultants = field_value(&fields, "consultants");
    let date_elicited_raw = field_value(&fields, "dateElicited");
    let user = field_value(&fields, "user");
    let date_created = doc.attr("dateCreated");
    let date_modified = doc.attr("dateModified");
    let last_modified_by = doc.attr("lastModifiedBy");
    // Field values win over the same-named attributes; corpora in the wild
    // valuate one or the other.
    let dialect = field_value(&fields, "dialect").or_else(|| doc.attr("dialect"));
    let language = field_value(&fields, "language").or_else(|| doc.attr("language"));

    let mut collection = Collection {
        collection_type: "elicitation".to_owned(),
        source_session_id: doc.id.clone(),
        ..Default::default()
    };

    collection.title = match &goal {
        None => {
            warnings.doc(format!(
                "Session {} has no goal so its date elicited is being used for the title of \
                 the OLD collection built from it.",
                doc.id
            ));
            match &date_elicited_raw {
                Some(date) => format!("Elicitation Session on {}", date),
                None => {
                    warnings.doc(format!(
                        "Session {} has no date elicited so its id is being used for the title \
                         of the OLD collection built from it.",
                        doc.id
                    ));
                    format!("Elicitation Session {}", doc.id)
                }
            }
        }
        Some(goal) if char_len(goal) > 255 => {
            warnings.doc(format!(
                "The goal \"{}\" of session {} is too long and will be truncated.",
                goal, doc.id
            ));
            truncate_chars(goal, 255)
        }
        Some(goal) => goal.clone(),
    };

    let mut description = vec![format!(
        "This collection was created from a LingSync session with id {}.",
        doc.id
    )];
    if let Some(goal) = &goal {
        description.push(format!("Goal: {}", punctuate_period_safe(goal)));
    }
    if let Some(consultants) = &consultants {
        description.push(format!("Consultants: {}", punctuate_period_safe(consultants)));
    }
    if let Some(language) = &language {
        description.push(format!("Language: {}", punctuate_period_safe(language)));
    }
    if let Some(dialect) = &dialect {
        description.push(format!("Dialect: {}", punctuate_period_safe(dialect)));
    }
    if let Some(date) = &date_elicited_raw {
        description.push(format!(
            "Elicitation session date: {}",
            punctuate_period_safe(date)
        ));
    }
    let mut creation_metadata = Vec::new();
    if let (Some(user), Some(created)) = (&user, &date_created) {
        creation_metadata.push(format!(
            "Session created in LingSync by {} on {}.",
            user, created
        ));
    }
    if let (Some(modifier), Some(modified)) = (&last_modified_by, &date_modified) {
        creation_metadata.push(format!(
            "Session last modified in LingSync by {} on {}.",
            modifier, modified
        ));
    }
    if !creation_metadata.is_empty() {
        description.push(creation_metadata.join(" "));
    }
    if let Some(comments) = doc.raw_attr("comments") {
        description.extend(render_comments(comments, "session", &doc.id, &mut warnings));
    }
    collection.description = join_paragraphs(&description);

    let speakers = consultants
        .as_deref()
        .map(|c| infer_speakers(c, dialect.as_deref()))
        .unwrap_or_default();
    if let Some(first) = speakers.first() {
        collection.speaker = Some(first.clone());
        if speakers.len() > 1 {
            warnings.doc(format!(
                "Session {} has more than one consultant listed. Since OLD collections only \
                 allow one speaker, we are just going to associate the first speaker to the \
                 OLD collection created from this LingSync session. The additional LingSync \
                 speakers will still be created as OLD speakers, however.",
                doc.id
            ));
        }
    }
    auxiliary.speakers = speakers;

    if let Some(user) = &user {
        warnings.general(format!(
            "Created a user (with username {}) with a fake email: {}. Please fix manually, \
             i.e., from within the Dative/OLD interface.",
            user, PLACEHOLDER_EMAIL
        ));
        let elicitor = User {
            username: user.clone(),
            first_name: user.clone(),
            last_name: user.clone(),
            email: PLACEHOLDER_EMAIL.to_owned(),
            role: "administrator".to_owned(),
            ..Default::default()
        };
        collection.elicitor = Some(elicitor.clone());
        auxiliary.users.push(elicitor);
    }

    if let Some(raw) = &date_elicited_raw {
        // Unparseable values already appear verbatim in the description.
        if let Some(normalized) = normalize_date(raw) {
            collection.date_elicited = normalized;
        }
    }

    Ok(ConversionOutcome {
        kind: doc.kind,
        source_id: doc.id.clone(),
        primary: Some(PrimaryPayload::Collection(collection)),
        auxiliary,
        warnings,
        language,
    })
}
