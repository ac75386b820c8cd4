//! Source documents: LingSync records as they arrive from the document store.
//!
//! A LingSync document announces its kind through its `collection` attribute
//! (`"sessions"`, `"datums"`, ...). Some documents lack it and instead carry a
//! `fieldDBtype` hint with a capitalized singular analog (`"Session"`,
//! `"Datum"`). Documents whose kind cannot be determined are logic (map
//! reduces and the like), not data, and are excluded from conversion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of a convertible LingSync document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocKind {
    /// An elicitation session; becomes an OLD collection.
    Session,
    /// One elicited datum; becomes an OLD form.
    Datum,
    /// A LingSync user; becomes an OLD user.
    User,
    /// A saved datum listing; becomes an OLD corpus.
    Datalist,
}

impl DocKind {
    /// Classify a raw document, or `None` for non-data documents.
    ///
    /// The `collection` attribute wins; `fieldDBtype` is the fallback hint.
    /// LingSync corpus/private-corpus documents hold corpus metadata only
    /// (licensing, expected field inventories) and are treated as non-data.
    pub fn classify(doc: &Value) -> Option<DocKind> {
        let collection = doc
            .get("collection")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| {
                let hint = doc.get("fieldDBtype").and_then(Value::as_str)?;
                match hint {
                    "Session" => Some("sessions".to_owned()),
                    "Datum" => Some("datums".to_owned()),
                    "Corpus" => Some("private_corpuses".to_owned()),
                    _ => None,
                }
            })?;
        match collection.as_str() {
            "sessions" => Some(DocKind::Session),
            "datums" => Some(DocKind::Datum),
            "users" => Some(DocKind::User),
            "datalists" => Some(DocKind::Datalist),
            _ => None,
        }
    }

    /// The LingSync-side name of this kind, used in warning keys.
    pub fn source_name(&self) -> &'static str {
        match self {
            DocKind::Session => "session",
            DocKind::Datum => "datum",
            DocKind::User => "user",
            DocKind::Datalist => "datalist",
        }
    }

    /// The destination resource type this kind converts into.
    pub fn destination(&self) -> ResourceKindName {
        match self {
            DocKind::Session => "collections",
            DocKind::Datum => "forms",
            DocKind::User => "users",
            DocKind::Datalist => "corpora",
        }
    }
}

/// Pluralized destination resource-type name.
pub type ResourceKindName = &'static str;

/// One entry of a LingSync labeled field list (`datumFields`,
/// `sessionFields`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocField {
    /// Field label, e.g. `"utterance"` or `"dateElicited"`.
    #[serde(default)]
    pub label: String,
    /// Field value; usually a string but not guaranteed to be.
    #[serde(default)]
    pub value: Value,
}

/// A classified source document together with its raw JSON body.
///
/// Documents are read-only: every accessor borrows, nothing mutates. The raw
/// body is kept whole so unknown-attribute detection can inspect every key.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Classified kind.
    pub kind: DocKind,
    /// Stable source identifier (`_id`), used for cross-referencing.
    pub id: String,
    /// The raw document body.
    pub body: Value,
}

impl SourceDocument {
    /// Wrap a raw document, classifying it. `None` when the document is
    /// non-data or lacks an `_id`.
    pub fn classify(body: Value) -> Option<SourceDocument> {
        let kind = DocKind::classify(&body)?;
        let id = body.get("_id").and_then(Value::as_str)?.to_owned();
        Some(SourceDocument { kind, id, body })
    }

    /// A string attribute, trimmed, `None` when absent or blank.
    pub fn attr(&self, name: &str) -> Option<String> {
        string_value(self.body.get(name)?)
    }

    /// A raw attribute value.
    pub fn raw_attr(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// The document's labeled field list. Sessions store it under
    /// `sessionFields` with `fields` as a fallback; datums under
    /// `datumFields`.
    pub fn fields(&self, primary: &str, fallback: Option<&str>) -> Option<Vec<DocField>> {
        let raw = self
            .body
            .get(primary)
            .filter(|v| non_empty_array(v))
            .or_else(|| fallback.and_then(|f| self.body.get(f)).filter(|v| non_empty_array(v)))?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// Keys of the document body that are not in `known`, in body order.
    pub fn unknown_attrs(&self, known: &[&str]) -> Vec<String> {
        unknown_keys(&self.body, known)
    }
}

/// Keys of a JSON object not present in `known`, in object order.
pub fn unknown_keys(doc: &Value, known: &[&str]) -> Vec<String> {
    match doc.as_object() {
        Some(map) => map
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

/// First field in `fields` labeled `label`, as a trimmed non-empty string.
///
/// Multiple fields with the same label are attested in the wild; the first
/// one wins, as it did at the source.
pub fn field_value(fields: &[DocField], label: &str) -> Option<String> {
    fields
        .iter()
        .find(|f| f.label == label)
        .and_then(|f| string_value(&f.value))
}

/// First field in `fields` labeled `label`, raw.
pub fn field_raw<'a>(fields: &'a [DocField], label: &str) -> Option<&'a Value> {
    fields.iter().find(|f| f.label == label).map(|f| &f.value)
}

/// Field labels of `fields` not present in `known`.
pub fn unknown_labels(fields: &[DocField], known: &[&str]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| !known.contains(&f.label.as_str()))
        .map(|f| f.label.clone())
        .collect()
}

fn string_value(v: &Value) -> Option<String> {
    let s = v.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}

fn non_empty_array(v: &Value) -> bool {
    v.as_array().map(|a| !a.is_empty()).unwrap_or(false)
}

/// Extract the `rows[*].doc` bodies from a CouchDB `_all_docs` response map.
pub fn rows_to_docs(dump: &Value) -> Option<Vec<Value>> {
    let rows = dump.get("rows")?.as_array()?;
    Some(
        rows.iter()
            .filter_map(|r| r.get("doc").cloned())
            .filter(|d| !d.is_null())
            .collect(),
    )
}

/// Wrapper needed by tests and the extractor: a full `_all_docs` dump.
pub fn docs_to_rows(docs: &[Value]) -> Value {
    let rows: Vec<Value> = docs
        .iter()
        .map(|d| serde_json::json!({ "doc": d }))
        .collect();
    let mut map = Map::new();
    map.insert("total_rows".into(), Value::from(rows.len()));
    map.insert("rows".into(), Value::Array(rows));
    Value::Object(map)
}
