//! Mapping of LingSync datalists to OLD corpora.

use crate::text::{char_len, join_paragraphs, render_comments, truncate_chars};
use ls2old_domain::document::SourceDocument;
use ls2old_domain::warning::DocWarnings;
use ls2old_domain::{ConversionOutcome, Corpus, PrimaryPayload};
use serde_json::Value;

const KNOWN_ATTRS: [&str; 12] = [
    "_id",
    "_rev",
    "audioVideo",
    "collection",
    "comments",
    "dateCreated",
    "dateModified",
    "datumIds",
    "description",
    "pouchname",
    "timestamp",
    "title",
];

/// Convert a datalist document to an OLD corpus.
///
/// The corpus content cannot be rendered yet: the referenced datums only
/// acquire destination form ids during upload, so the datum ids ride along
/// on the payload until then.
pub fn convert_datalist(doc: &SourceDocument) -> ConversionOutcome {
    let mut warnings = DocWarnings::default();

    for attr in doc.unknown_attrs(&KNOWN_ATTRS) {
        warnings.doc(format!(
            "'{}' not a recognized attribute in datalist {}",
            attr, doc.id
        ));
    }

    let mut description = Vec::new();
    if let Some(ls_description) = doc.attr("description") {
        description.push(ls_description);
    }
    let mut metadata = vec![format!(
        "This corpus was generated from LingSync datalist {}.",
        doc.id
    )];
    if let Some(created) = doc.attr("dateCreated") {
        metadata.push(format!("It was created in LingSync on {}.", created));
    }
    if let Some(modified) = doc.attr("dateModified") {
        metadata.push(format!("It was last modified in LingSync on {}.", modified));
    }
    description.push(metadata.join(" "));
    if let Some(comments) = doc.raw_attr("comments") {
        description.extend(render_comments(comments, "datalist", &doc.id, &mut warnings));
    }

    let name = match doc.attr("title") {
        None => {
            let name = format!("Corpus from LingSync datalist {}", doc.id);
            warnings.doc(format!(
                "Datalist {} has no title value; the corpus generated from it has \"{}\" \
                 as its name value.",
                doc.id, name
            ));
            name
        }
        Some(title) if char_len(&title) > 255 => {
            warnings.doc(format!(
                "The title \"{}\" of datalist {} is too long and will be truncated.",
                title, doc.id
            ));
            truncate_chars(&title, 255)
        }
        Some(title) => title,
    };

    let source_datum_ids = doc
        .raw_attr("datumIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let corpus = Corpus {
        name,
        description: join_paragraphs(&description),
        tags: Vec::new(),
        source_datalist_id: doc.id.clone(),
        source_datum_ids,
    };

    ConversionOutcome {
        kind: doc.kind,
        source_id: doc.id.clone(),
        primary: Some(PrimaryPayload::Corpus(corpus)),
        auxiliary: Default::default(),
        warnings,
        language: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn datalist(body: serde_json::Value) -> SourceDocument {
        SourceDocument::classify(body).unwrap()
    }

    fn corpus_of(outcome: ConversionOutcome) -> Corpus {
        match outcome.primary.unwrap() {
            PrimaryPayload::Corpus(c) => c,
            other => panic!("expected a corpus, got {:?}", other),
        }
    }

    #[test]
    fn full_datalist_maps_to_corpus() {
        let doc = datalist(json!({
            "_id": "dl1",
            "collection": "datalists",
            "title": "All nit- data",
            "description": "Result of searching for morphemes:#nit-",
            "dateCreated": "2014-11-10T02:29:25.168Z",
            "dateModified": "2014-11-10T02:29:25.309Z",
            "datumIds": ["d1", "d2", "d3"]
        }));
        let outcome = convert_datalist(&doc);
        let corpus = corpus_of(outcome);
        assert_eq!(corpus.name, "All nit- data");
        assert_eq!(corpus.source_datum_ids, vec!["d1", "d2", "d3"]);
        assert!(corpus
            .description
            .starts_with("Result of searching for morphemes:#nit-"));
        assert!(corpus
            .description
            .contains("This corpus was generated from LingSync datalist dl1."));
        assert!(corpus
            .description
            .contains("It was created in LingSync on 2014-11-10T02:29:25.168Z."));
    }

    #[test]
    fn titleless_datalist_gets_synthetic_name_with_warning() {
        let doc = datalist(json!({
            "_id": "dl2",
            "collection": "datalists",
            "datumIds": []
        }));
        let outcome = convert_datalist(&doc);
        assert_eq!(
            corpus_of(outcome.clone()).name,
            "Corpus from LingSync datalist dl2"
        );
        assert_eq!(outcome.warnings.docspecific.len(), 1);
    }

    #[test]
    fn long_title_truncated_with_warning() {
        let long = "t".repeat(300);
        let doc = datalist(json!({
            "_id": "dl3",
            "collection": "datalists",
            "title": long
        }));
        let outcome = convert_datalist(&doc);
        assert_eq!(char_len(&corpus_of(outcome.clone()).name), 255);
        assert_eq!(outcome.warnings.docspecific.len(), 1);
    }
}
