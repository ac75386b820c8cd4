//! Mapping of LingSync datums to OLD forms.

use crate::error::ConvertError;
use crate::speakers::infer_speakers;
use crate::text::{
    char_len, join_paragraphs, normalize_date, punctuate_period_safe, render_comments,
    truncate_chars,
};
use ls2old_domain::document::{field_raw, field_value, DocField, SourceDocument};
use ls2old_domain::warning::DocWarnings;
use ls2old_domain::{
    guess_allowed_mime, AuxiliaryResources, ConversionOutcome, FilePayload, Form, PrimaryPayload,
    Tag, Translation, User, PLACEHOLDER, PLACEHOLDER_EMAIL,
};
use serde_json::Value;

const KNOWN_FIELDS: [&str; 16] = [
    "judgement",
    "morphemes",
    "utterance",
    "gloss",
    "translation",
    "validationStatus",
    "tags",
    "syntacticCategory",
    "syntacticTreeLatex",
    "enteredByUser",
    "modifiedByUser",
    "comments",
    "markAsNeedsToBeSaved",
    "checked",
    "notes",
    "phonetic",
];

const KNOWN_ATTRS: [&str; 20] = [
    "_id",
    "_rev",
    "audioVideo",
    "collection",
    "comments",
    "dateEntered",
    "dateModified",
    "datumFields",
    "datumTags",
    "images",
    "jsonType",
    "pouchname",
    "session",
    "timestamp",
    "trashed",
    "api",
    "dateCreated",
    "dbname",
    "fieldDBtype",
    "version",
];

const KNOWN_AUDIO_VIDEO_ATTRS: [&str; 29] = [
    "_id",
    "dateCreated",
    "URL",
    "api",
    "checksum",
    "dbname",
    "description",
    "fieldDBtype",
    "fileBaseName",
    "filename",
    "mtime",
    "name",
    "pouchname",
    "praatAudioExtension",
    "resultInfo",
    "resultStatus",
    "script",
    "serviceVersion",
    "size",
    "syllablesAndUtterances",
    "textGridInfo",
    "textGridStatus",
    "textgrid",
    "trashed",
    "type",
    "uploadInfo",
    "version",
    "webResultInfo",
    "webResultStatus",
];

/// Convert a datum document to an OLD form.
///
/// A datum without a `datumFields` attribute is unmappable and aborts the
/// run; an empty field list is fine. Trashed datums are still converted and
/// marked, so the destination assigns them an id before deleting them.
pub fn convert_datum(
    doc: &SourceDocument,
    corpus_name: &str,
) -> Result<ConversionOutcome, ConvertError> {
    if doc.raw_attr("datumFields").is_none() {
        return Err(ConvertError::DatumMissingFields(doc.id.clone()));
    }
    let fields = doc.fields("datumFields", None).unwrap_or_default();

    let mut warnings = DocWarnings::default();
    let mut auxiliary = AuxiliaryResources::default();
    let mut comments: Vec<String> = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();

    for attr in doc.unknown_attrs(&KNOWN_ATTRS) {
        warnings.doc(format!(
            "'{}' not a recognized attribute in datum {}",
            attr, doc.id
        ));
    }
    for label in ls2old_domain::document::unknown_labels(&fields, &KNOWN_FIELDS) {
        warnings.doc(format!(
            "'{}' not a recognized label in datumFields for datum {}",
            label, doc.id
        ));
    }

    let mut form = Form {
        status: "tested".to_owned(),
        source_datum_id: doc.id.clone(),
        ..Default::default()
    };

    // Date elicited comes from the embedded session's field list. The datum
    // keeps its own copy of the session, so no cross-document lookup is
    // needed here.
    let session = doc.raw_attr("session");
    let mut unparseable_date: Option<String> = None;
    if let Some(session) = session {
        let session_fields = embedded_fields(session, "sessionFields", None);
        if let Some(raw) = field_value(&session_fields, "dateElicited") {
            match normalize_date(&raw) {
                Some(normalized) => form.date_elicited = normalized,
                None => {
                    warnings.doc(format!(
                        "Unable to parse {} to an OLD-compatible date in MM/DD/YYYY format \
                         for datum {}.",
                        raw, doc.id
                    ));
                    unparseable_date = Some(raw);
                }
            }
        }
    }

    if let Some(entries) = doc.raw_attr("audioVideo").and_then(Value::as_array) {
        for av in entries {
            if let Some(file) = convert_audio_video(av, &doc.id, &mut warnings) {
                auxiliary.files.push(file);
            }
        }
    }
    form.has_files = !auxiliary.files.is_empty();

    if doc
        .raw_attr("images")
        .map(|v| !v.is_null() && v.as_array().map(|a| !a.is_empty()).unwrap_or(true))
        .unwrap_or(false)
    {
        warnings.doc(format!(
            "Datum {} has an `images` attribute that has been ignored.",
            doc.id
        ));
    }

    // The `tags` datum field is a whitespace-separated string; the
    // `datumTags` attribute is a list of tag objects. Both feed the same
    // tag list.
    match field_raw(&fields, "tags") {
        Some(Value::String(s)) => {
            for name in s.split_whitespace() {
                tags.push(Tag { name: name.to_owned(), ..Default::default() });
            }
        }
        Some(value) if !value_is_blank(value) => {
            warnings.doc(format!(
                "Unable to use value '{}' from datumField tags of datum {}",
                value, doc.id
            ));
        }
        _ => {}
    }
    if let Some(datum_tags) = doc.raw_attr("datumTags") {
        match datum_tags {
            Value::Array(entries) => {
                for entry in entries {
                    match entry {
                        Value::Object(map) => match map.get("tag").and_then(Value::as_str) {
                            Some(name) if !name.trim().is_empty() => {
                                tags.push(Tag { name: name.to_owned(), ..Default::default() });
                            }
                            _ => warnings.doc(format!(
                                "Tag object '{}' from datum.datumTags of datum {} has no \
                                 `tag` attribute and cannot be used.",
                                entry, doc.id
                            )),
                        },
                        _ => warnings.doc(format!(
                            "Unable to use tag '{}' from datum.datumTags of datum {}",
                            entry, doc.id
                        )),
                    }
                }
            }
            value if !value_is_blank(value) => {
                warnings.doc(format!(
                    "Unable to use value '{}' from datum.datumTags of datum {}",
                    value, doc.id
                ));
            }
            _ => {}
        }
    }

    form.deleted = doc.attr("trashed").as_deref() == Some("deleted");

    // Speakers are inferred from the embedded session's consultants value.
    let mut speakers = Vec::new();
    if let Some(session) = session {
        let session_fields = embedded_fields(session, "sessionFields", Some("fields"));
        if let Some(consultants) = field_value(&session_fields, "consultants") {
            let dialect = field_value(&session_fields, "dialect").or_else(|| {
                session
                    .get("dialect")
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty())
            });
            speakers = infer_speakers(&consultants, dialect.as_deref());
        }
    }
    if let Some(first) = speakers.first() {
        form.speaker = Some(first.clone());
        if speakers.len() > 1 {
            warnings.doc(format!(
                "Datum {} has more than one consultant listed. Since OLD forms only allow \
                 one speaker, we are just going to associate the first speaker to the OLD \
                 form created from this LingSync datum. The additional LingSync speakers \
                 will still be created as OLD speakers, however, and ALL LingSync \
                 consultants will be documented in the form's comments field.",
                doc.id
            ));
            let names: Vec<String> = speakers
                .iter()
                .map(|s| format!("{} {}", s.first_name, s.last_name))
                .collect();
            comments.push(punctuate_period_safe(&format!(
                "Consultants: {}",
                names.join(", ")
            )));
        }
    }
    auxiliary.speakers = speakers;

    let entered_by_user = field_value(&fields, "enteredByUser");
    if let Some(username) = &entered_by_user {
        warnings.general(
            "Form elicitor values are being supplied by datum.session.enteredByUser \
             values. This may be inaccurate. Change as needed in the Dative/OLD interface.",
        );
        warnings.general(format!(
            "Created a user (with username {}) with a fake email: {}. Please fix manually, \
             i.e., from within the Dative/OLD interface.",
            username, PLACEHOLDER_EMAIL
        ));
        let elicitor = User {
            username: username.clone(),
            first_name: username.clone(),
            last_name: username.clone(),
            email: PLACEHOLDER_EMAIL.to_owned(),
            role: "administrator".to_owned(),
            ..Default::default()
        };
        form.elicitor = Some(elicitor.clone());
        auxiliary.users.push(elicitor);
    }

    if let Some(status) = field_value(&fields, "validationStatus") {
        if status != "Checked" {
            tags.push(Tag {
                name: format!("validation status: {}", status),
                ..Default::default()
            });
            warnings.doc(format!(
                "Unrecognized validationStatus '{}' in datum {}",
                status, doc.id
            ));
        }
    }

    let utterance = field_value(&fields, "utterance");
    let mut utterance_too_long = false;
    form.transcription = match &utterance {
        None => PLACEHOLDER.to_owned(),
        Some(u) if char_len(u) > 255 => {
            utterance_too_long = true;
            warnings.doc(format!(
                "The utterance \"{}\" of datum {} is too long and will be truncated.",
                u, doc.id
            ));
            truncate_chars(u, 255)
        }
        Some(u) => u.clone(),
    };

    let morphemes = field_value(&fields, "morphemes");
    let mut morphemes_too_long = false;
    if let Some(m) = &morphemes {
        if char_len(m) > 255 {
            morphemes_too_long = true;
            warnings.doc(format!(
                "The morphemes \"{}\" of datum {} is too long and will be truncated.",
                m, doc.id
            ));
            form.morpheme_break = truncate_chars(m, 255);
        } else {
            form.morpheme_break = m.clone();
        }
    }

    let phonetic = field_value(&fields, "phonetic");
    let mut phonetic_too_long = false;
    if let Some(p) = &phonetic {
        if char_len(p) > 255 {
            phonetic_too_long = true;
            warnings.doc(format!(
                "The phonetic value \"{}\" of datum {} is too long and will be truncated.",
                p, doc.id
            ));
            form.phonetic_transcription = truncate_chars(p, 255);
        } else {
            form.phonetic_transcription = p.clone();
        }
    }

    // Some corpora carry comments in the judgement field. A value longer
    // than three characters is split: the leading run of grammaticality
    // markers stays, the whole value goes to the comments.
    if let Some(judgement) = field_value(&fields, "judgement") {
        if char_len(&judgement) > 3 {
            warnings.general(
                "You have some grammaticality values that contain more than three \
                 characters, suggesting that these values are comments and not true \
                 grammaticalities. We have tried to separate the true grammaticalities \
                 from the comments. Search for \"Comment from LingSync judgement field:\" \
                 in the comments field of forms in the resulting OLD database.",
            );
            form.grammaticality = judgement
                .chars()
                .take_while(|c| matches!(c, '*' | '?' | '#' | '!'))
                .collect();
            comments.push(punctuate_period_safe(&format!(
                "Comment from LingSync judgement field: {}",
                judgement
            )));
        } else {
            form.grammaticality = judgement;
        }
    }

    let gloss = field_value(&fields, "gloss");
    let mut gloss_too_long = false;
    if let Some(g) = &gloss {
        if char_len(g) > 255 {
            gloss_too_long = true;
            warnings.doc(format!(
                "The gloss \"{}\" of datum {} is too long and will be truncated.",
                g, doc.id
            ));
            form.morpheme_gloss = truncate_chars(g, 255);
        } else {
            form.morpheme_gloss = g.clone();
        }
    }

    form.translations = vec![Translation {
        transcription: field_value(&fields, "translation")
            .unwrap_or_else(|| PLACEHOLDER.to_owned()),
        grammaticality: String::new(),
    }];

    let tree = field_value(&fields, "syntacticTreeLatex");
    let mut tree_too_long = false;
    if let Some(t) = &tree {
        if char_len(t) > 1023 {
            tree_too_long = true;
            warnings.doc(format!(
                "The syntacticTreeLatex \"{}\" of datum {} is too long and will be truncated.",
                t, doc.id
            ));
            form.syntax = truncate_chars(t, 1023);
        } else {
            form.syntax = t.clone();
        }
    }

    let date_entered = doc.attr("dateEntered");
    if let Some(entered) = &date_entered {
        form.date_entered = Some(entered.clone());
    } else {
        tracing::warn!(datum = %doc.id, "no date entered value");
    }

    let mut creation_metadata = Vec::new();
    if let (Some(username), Some(entered)) = (&entered_by_user, &date_entered) {
        creation_metadata.push(format!(
            "This form was created from LingSync datum {} (in corpus {}), which was created \
             by {} on {}.",
            doc.id, corpus_name, username, entered
        ));
    }
    if let (Some(modifier), Some(modified)) =
        (field_value(&fields, "modifiedByUser"), doc.attr("dateModified"))
    {
        creation_metadata.push(format!(
            "The datum was last modified in LingSync by {} on {}.",
            modifier, modified
        ));
    }
    if let Some(raw) = &unparseable_date {
        creation_metadata.push(format!("The datum was elicited on {}.", raw));
    }
    if !creation_metadata.is_empty() {
        comments.push(creation_metadata.join(" "));
    }

    if let Some(value) = field_raw(&fields, "comments") {
        comments.extend(render_comments(value, "datum", &doc.id, &mut warnings));
    }
    if let Some(value) = doc.raw_attr("comments") {
        comments.extend(render_comments(value, "datum", &doc.id, &mut warnings));
    }
    if let Some(notes) = field_value(&fields, "notes") {
        comments.push(format!("LingSync notes: {}", punctuate_period_safe(&notes)));
    }

    // Overflow and unmappable values are echoed into one comments
    // paragraph, so the truncated data is still recoverable.
    let mut errored = Vec::new();
    if utterance_too_long {
        errored.push(format!(
            "LingSync datum utterance value without truncation: '{}'",
            punctuate_period_safe(&utterance.unwrap_or_default())
        ));
    }
    if morphemes_too_long {
        errored.push(format!(
            "LingSync morphemes value without truncation: '{}'",
            punctuate_period_safe(&morphemes.unwrap_or_default())
        ));
    }
    if phonetic_too_long {
        errored.push(format!(
            "LingSync phonetic value without truncation: '{}'",
            punctuate_period_safe(&phonetic.unwrap_or_default())
        ));
    }
    if gloss_too_long {
        errored.push(format!(
            "LingSync datum gloss value without truncation: '{}'",
            punctuate_period_safe(&gloss.unwrap_or_default())
        ));
    }
    if let Some(category) = field_value(&fields, "syntacticCategory") {
        errored.push(format!("LingSync syntacticCategory value: '{}'", category));
    }
    if tree_too_long {
        errored.push(format!(
            "LingSync datum syntacticTreeLatex value without truncation: '{}'",
            punctuate_period_safe(&tree.unwrap_or_default())
        ));
    }
    if !errored.is_empty() {
        comments.push(errored.join(" "));
    }

    form.comments = join_paragraphs(&comments);

    form.tags = tags.clone();
    auxiliary.tags = tags;

    match session.and_then(|s| s.get("_id")).and_then(Value::as_str) {
        Some(session_id) => form.source_session_id = Some(session_id.to_owned()),
        None => tracing::warn!(datum = %doc.id, "no LingSync session for datum"),
    }

    Ok(ConversionOutcome {
        kind: doc.kind,
        source_id: doc.id.clone(),
        primary: Some(PrimaryPayload::Form(form)),
        auxiliary,
        warnings,
        language: None,
    })
}

/// One `audioVideo` entry as an OLD file payload, or `None` when it is
/// unusable (no URL, trashed, or a MIME type the destination rejects).
fn convert_audio_video(
    av: &Value,
    datum_id: &str,
    warnings: &mut DocWarnings,
) -> Option<FilePayload> {
    let entry = av.as_object()?;
    let url = entry.get("URL").and_then(Value::as_str).filter(|u| !u.is_empty())?;
    if entry.get("trashed").and_then(Value::as_str) == Some("deleted") {
        return None;
    }
    let mime_type = guess_allowed_mime(url)?;

    let mut description = vec![format!(
        "This file was generated from the LingSync audio/video file stored at {}.",
        url
    )];
    if let Some(text) = entry.get("description").and_then(Value::as_str) {
        let text = text.trim();
        if !text.is_empty() {
            description.push(text.to_owned());
        }
    }
    if let Some(created) = entry.get("dateCreated").and_then(Value::as_str) {
        description.push(format!("This file was created on LingSync at {}.", created));
    }

    for attr in entry.keys() {
        if !KNOWN_AUDIO_VIDEO_ATTRS.contains(&attr.as_str()) {
            warnings.doc(format!(
                "Attribute '{}' is not recognized in the `audioVideo` value of datum {}",
                attr, datum_id
            ));
        }
    }

    Some(FilePayload {
        filename: entry
            .get("filename")
            .and_then(Value::as_str)
            .map(|f| f.trim().to_owned())
            .unwrap_or_default(),
        mime_type: mime_type.to_owned(),
        description: join_paragraphs(&description),
        source_datum_id: datum_id.to_owned(),
        source_url: url.to_owned(),
        source_size: entry.get("size").and_then(Value::as_u64),
        source_mime_type: entry
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned),
        local_path: None,
    })
}

/// Parse a labeled field list out of an embedded session object.
fn embedded_fields(session: &Value, primary: &str, fallback: Option<&str>) -> Vec<DocField> {
    let raw = session
        .get(primary)
        .filter(|v| v.as_array().map(|a| !a.is_empty()).unwrap_or(false))
        .or_else(|| {
            fallback
                .and_then(|f| session.get(f))
                .filter(|v| v.as_array().map(|a| !a.is_empty()).unwrap_or(false))
        });
    raw.and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

fn value_is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn datum(body: serde_json::Value) -> SourceDocument {
        SourceDocument::classify(body).unwrap()
    }

    fn form_of(outcome: ConversionOutcome) -> Form {
        match outcome.primary.unwrap() {
            PrimaryPayload::Form(f) => f,
            other => panic!("expected a form, got {:?}", other),
        }
    }

    #[test]
    fn full_datum_maps_to_form() {
        let doc = datum(json!({
            "_id": "d1",
            "collection": "datums",
            "dateEntered": "2014-11-10T02:29:00.000Z",
            "datumFields": [
                {"label": "judgement", "value": "*"},
                {"label": "utterance", "value": "nitsspiyi"},
                {"label": "morphemes", "value": "nit-ihpiyi"},
                {"label": "gloss", "value": "1-dance"},
                {"label": "translation", "value": "I danced"},
                {"label": "validationStatus", "value": "Checked"},
                {"label": "tags", "value": "verbs dancing"},
                {"label": "enteredByUser", "value": "ana"}
            ],
            "session": {
                "_id": "s1",
                "sessionFields": [
                    {"label": "dateElicited", "value": "2014-11-09"},
                    {"label": "consultants", "value": "Dave Smith"}
                ]
            }
        }));
        let outcome = convert_datum(&doc, "testcorpus").unwrap();
        let form = form_of(outcome.clone());
        assert_eq!(form.transcription, "nitsspiyi");
        assert_eq!(form.morpheme_break, "nit-ihpiyi");
        assert_eq!(form.morpheme_gloss, "1-dance");
        assert_eq!(form.grammaticality, "*");
        assert_eq!(form.translations[0].transcription, "I danced");
        assert_eq!(form.date_elicited, "11/09/2014");
        assert_eq!(form.status, "tested");
        assert_eq!(form.source_session_id.as_deref(), Some("s1"));
        assert_eq!(form.tags.len(), 2);
        assert_eq!(form.speaker.as_ref().unwrap().last_name, "Smith");
        assert_eq!(form.elicitor.as_ref().unwrap().username, "ana");
        assert!(!form.deleted);
        assert_eq!(outcome.auxiliary.tags.len(), 2);
        assert_eq!(outcome.auxiliary.users.len(), 1);
        assert_eq!(outcome.auxiliary.speakers.len(), 1);
    }

    #[test]
    fn missing_datum_fields_is_fatal() {
        let doc = datum(json!({"_id": "d2", "collection": "datums"}));
        assert!(matches!(
            convert_datum(&doc, "c"),
            Err(ConvertError::DatumMissingFields(_))
        ));
    }

    #[test]
    fn missing_values_become_placeholders_silently() {
        let doc = datum(json!({
            "_id": "d3",
            "collection": "datums",
            "datumFields": []
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        assert!(outcome.warnings.docspecific.is_empty());
        let form = form_of(outcome);
        assert_eq!(form.transcription, PLACEHOLDER);
        assert_eq!(form.translations[0].transcription, PLACEHOLDER);
    }

    #[test]
    fn long_utterance_truncated_and_echoed_in_comments() {
        let long = "a".repeat(300);
        let doc = datum(json!({
            "_id": "d4",
            "collection": "datums",
            "datumFields": [{"label": "utterance", "value": long}]
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        let form = form_of(outcome.clone());
        assert_eq!(char_len(&form.transcription), 255);
        assert!(form
            .comments
            .contains("LingSync datum utterance value without truncation:"));
        assert_eq!(outcome.warnings.docspecific.len(), 1);
    }

    #[test]
    fn long_judgement_splits_markers_from_comment() {
        let doc = datum(json!({
            "_id": "d5",
            "collection": "datums",
            "datumFields": [{"label": "judgement", "value": "*? this is bad"}]
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        let form = form_of(outcome.clone());
        assert_eq!(form.grammaticality, "*?");
        assert!(form
            .comments
            .contains("Comment from LingSync judgement field: *? this is bad."));
        assert_eq!(outcome.warnings.general.len(), 1);
    }

    #[test]
    fn unchecked_validation_status_becomes_tag() {
        let doc = datum(json!({
            "_id": "d6",
            "collection": "datums",
            "datumFields": [{"label": "validationStatus", "value": "ToBeChecked"}]
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        let form = form_of(outcome.clone());
        assert!(form
            .tags
            .iter()
            .any(|t| t.name == "validation status: ToBeChecked"));
        assert!(outcome
            .warnings
            .docspecific
            .contains(&"Unrecognized validationStatus 'ToBeChecked' in datum d6".to_string()));
    }

    #[test]
    fn trashed_datum_is_marked_deleted() {
        let doc = datum(json!({
            "_id": "d7",
            "collection": "datums",
            "trashed": "deleted",
            "datumFields": []
        }));
        let form = form_of(convert_datum(&doc, "c").unwrap());
        assert!(form.deleted);
    }

    #[test]
    fn audio_video_entries_become_files() {
        let doc = datum(json!({
            "_id": "d8",
            "collection": "datums",
            "datumFields": [],
            "audioVideo": [
                {"URL": "https://media.example.com/rec.mp3", "size": 1024,
                 "type": "audio/mpeg", "filename": "rec.mp3"},
                {"URL": "https://media.example.com/old.mp3", "trashed": "deleted"},
                {"URL": "https://media.example.com/notes.docx"}
            ]
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        assert_eq!(outcome.auxiliary.files.len(), 1);
        let file = &outcome.auxiliary.files[0];
        assert_eq!(file.mime_type, "audio/mpeg");
        assert_eq!(file.source_size, Some(1024));
        assert_eq!(file.source_datum_id, "d8");
        let form = form_of(outcome);
        assert!(form.has_files);
    }

    #[test]
    fn unparseable_date_elicited_warns_and_lands_in_comments() {
        let doc = datum(json!({
            "_id": "d9",
            "collection": "datums",
            "datumFields": [],
            "session": {
                "_id": "s9",
                "sessionFields": [{"label": "dateElicited", "value": "around March"}]
            }
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        let form = form_of(outcome.clone());
        assert_eq!(form.date_elicited, "");
        assert!(form.comments.contains("The datum was elicited on around March."));
        assert!(outcome.warnings.docspecific.iter().any(|w| w.contains(
            "Unable to parse around March to an OLD-compatible date"
        )));
    }

    #[test]
    fn datum_tags_variants() {
        let doc = datum(json!({
            "_id": "d10",
            "collection": "datums",
            "datumFields": [],
            "datumTags": [
                {"tag": "imperative"},
                {"notag": true},
                "bare"
            ]
        }));
        let outcome = convert_datum(&doc, "c").unwrap();
        let form = form_of(outcome.clone());
        assert_eq!(form.tags.len(), 1);
        assert_eq!(form.tags[0].name, "imperative");
        assert_eq!(outcome.warnings.docspecific.len(), 2);
    }
}
