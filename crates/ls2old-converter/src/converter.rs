//! The conversion orchestrator.
//!
//! Reads the raw LingSync dump, maps every document to its destination
//! payload, consolidates duplicates, synthesizes the application settings,
//! downloads media, and writes the staged artifact plus the summary and
//! warnings reports.

use crate::appsettings::synthesize;
use crate::config::ConvertConfig;
use crate::consolidate::consolidate;
use crate::datalist::convert_datalist;
use crate::datum::convert_datum;
use crate::error::ConvertError;
use crate::media::MediaFetcher;
use crate::session::convert_session;
use crate::summary::{destination_summary, source_summary};
use crate::user::convert_user;
use ls2old_domain::document::{rows_to_docs, DocKind, SourceDocument};
use ls2old_domain::{StagingStore, Warnings};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Kinds in conversion order. Sessions go first so their languages are
/// known before the application settings are synthesized; datalists go
/// last since they only reference other documents.
const CONVERSION_ORDER: [DocKind; 4] =
    [DocKind::Session, DocKind::Datum, DocKind::User, DocKind::Datalist];

/// The result of a conversion run.
#[derive(Debug)]
pub struct Conversion {
    /// Path of the staged-resource artifact.
    pub path: PathBuf,
    /// The staged destination resources.
    pub store: StagingStore,
    /// All warnings accrued during the run; empty when the artifact was
    /// reused.
    pub warnings: Warnings,
    /// False when an existing artifact was reused instead of converting.
    pub converted: bool,
}

/// Converts a raw LingSync dump into staged OLD resources.
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    /// A converter for one corpus.
    pub fn new(config: ConvertConfig) -> Converter {
        Converter { config }
    }

    /// Run the conversion, or reuse the staged artifact when it already
    /// exists and conversion is not forced.
    pub fn convert(&self, raw_path: &Path) -> Result<Conversion, ConvertError> {
        let staged_path = self.config.staging_artifact_path();
        if staged_path.is_file() && !self.config.force_convert {
            tracing::info!(path = %staged_path.display(), "reusing staged artifact");
            let store = read_json(&staged_path)?;
            return Ok(Conversion {
                path: staged_path,
                store,
                warnings: Warnings::new(),
                converted: false,
            });
        }

        let dump: Value = read_json(raw_path)?;
        let docs = rows_to_docs(&dump)
            .ok_or_else(|| ConvertError::MalformedDump(raw_path.to_path_buf()))?;
        tracing::info!(corpus = %self.config.corpus, documents = docs.len(), "converting");

        let classified: Vec<SourceDocument> = docs
            .iter()
            .filter_map(|doc| SourceDocument::classify(doc.clone()))
            .collect();

        let mut store = StagingStore::new();
        let mut warnings = Warnings::new();
        let mut languages: Vec<String> = Vec::new();
        for kind in CONVERSION_ORDER {
            for doc in classified.iter().filter(|d| d.kind == kind) {
                let outcome = match kind {
                    DocKind::Session => convert_session(doc)?,
                    DocKind::Datum => convert_datum(doc, &self.config.corpus)?,
                    DocKind::User => convert_user(doc),
                    DocKind::Datalist => convert_datalist(doc),
                };
                if let Some(language) = &outcome.language {
                    if !languages.contains(language) {
                        languages.push(language.clone());
                    }
                }
                store.fold(outcome, &mut warnings);
            }
        }

        consolidate(&mut store, &mut warnings);
        store.applicationsettings = vec![synthesize(&languages, &store.forms, &mut warnings)];

        let fetcher =
            MediaFetcher::new(self.config.media_dir(), self.config.force_media_download);
        fetcher.fetch(&mut store, &mut warnings, self.config.migrate_large_media)?;

        write_text(&staged_path, &serde_json::to_string_pretty(&store)?)?;
        write_text(&self.config.source_summary_path(), &source_summary(&docs))?;
        write_text(&self.config.destination_summary_path(), &destination_summary(&store))?;
        write_text(&self.config.warnings_report_path(), &warnings.render())?;
        tracing::info!(
            path = %staged_path.display(),
            warnings = warnings.count(),
            "conversion complete"
        );

        Ok(Conversion { path: staged_path, store, warnings, converted: true })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConvertError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|source| ConvertError::CorruptArtifact { path: path.to_path_buf(), source })
}

fn write_text(path: &Path, content: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls2old_domain::document::docs_to_rows;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_dump(dir: &Path, corpus: &str, docs: &[Value]) -> PathBuf {
        let path = dir.join("lingsync").join(format!("{}.json", corpus));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string(&docs_to_rows(docs)).unwrap()).unwrap();
        path
    }

    fn config(dir: &Path) -> ConvertConfig {
        ConvertConfig {
            work_dir: dir.to_path_buf(),
            corpus: "testcorpus".to_owned(),
            force_convert: false,
            force_media_download: false,
            migrate_large_media: false,
        }
    }

    fn sample_docs() -> Vec<Value> {
        vec![
            json!({
                "_id": "s1",
                "collection": "sessions",
                "sessionFields": [
                    {"label": "goal", "value": "Elicit verbs"},
                    {"label": "consultants", "value": "Dave Smith"},
                    {"label": "language", "value": "Blackfoot"},
                    {"label": "user", "value": "ana"}
                ]
            }),
            json!({
                "_id": "d1",
                "collection": "datums",
                "datumFields": [
                    {"label": "utterance", "value": "nitsspiyi"},
                    {"label": "judgement", "value": "*"},
                    {"label": "enteredByUser", "value": "ana"}
                ],
                "session": {"_id": "s1"}
            }),
            json!({
                "_id": "u1",
                "collection": "users",
                "username": "ana",
                "email": "ana@example.com"
            }),
            json!({
                "_id": "dl1",
                "collection": "datalists",
                "title": "All data",
                "datumIds": ["d1"]
            }),
            json!({"_id": "_design/pages", "views": {}}),
        ]
    }

    #[test]
    fn full_run_stages_and_reports() {
        let dir = tempdir().unwrap();
        let raw = write_dump(dir.path(), "testcorpus", &sample_docs());
        let conversion = Converter::new(config(dir.path())).convert(&raw).unwrap();
        assert!(conversion.converted);
        assert_eq!(conversion.store.forms.len(), 1);
        assert_eq!(conversion.store.collections.len(), 1);
        assert_eq!(conversion.store.corpora.len(), 1);
        // ana appears as a user document, a session elicitor and a datum
        // elicitor; consolidation leaves one user.
        assert_eq!(conversion.store.users.len(), 1);
        assert_eq!(conversion.store.users[0].email, "ana@example.com");
        assert_eq!(conversion.store.applicationsettings.len(), 1);
        assert_eq!(
            conversion.store.applicationsettings[0].object_language_name,
            "Blackfoot"
        );
        assert_eq!(conversion.store.applicationsettings[0].grammaticalities, "*");
        assert!(conversion.path.is_file());
        let cfg = config(dir.path());
        assert!(cfg.source_summary_path().is_file());
        assert!(cfg.destination_summary_path().is_file());
        let report = fs::read_to_string(cfg.warnings_report_path()).unwrap();
        assert!(report.contains("Conversion Warning"));
    }

    #[test]
    fn existing_artifact_is_reused() {
        let dir = tempdir().unwrap();
        let raw = write_dump(dir.path(), "testcorpus", &sample_docs());
        let first = Converter::new(config(dir.path())).convert(&raw).unwrap();
        assert!(first.converted);
        let second = Converter::new(config(dir.path())).convert(&raw).unwrap();
        assert!(!second.converted);
        assert_eq!(second.store, first.store);

        let mut forced = config(dir.path());
        forced.force_convert = true;
        let third = Converter::new(forced).convert(&raw).unwrap();
        assert!(third.converted);
    }

    #[test]
    fn corrupt_staged_artifact_is_an_error() {
        let dir = tempdir().unwrap();
        let raw = write_dump(dir.path(), "testcorpus", &sample_docs());
        let cfg = config(dir.path());
        fs::create_dir_all(cfg.staging_artifact_path().parent().unwrap()).unwrap();
        fs::write(cfg.staging_artifact_path(), "not json").unwrap();
        assert!(matches!(
            Converter::new(cfg).convert(&raw),
            Err(ConvertError::CorruptArtifact { .. })
        ));
    }

    #[test]
    fn dump_without_rows_is_malformed() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("lingsync").join("testcorpus.json");
        fs::create_dir_all(raw.parent().unwrap()).unwrap();
        fs::write(&raw, "{}").unwrap();
        assert!(matches!(
            Converter::new(config(dir.path())).convert(&raw),
            Err(ConvertError::MalformedDump(_))
        ));
    }
}
