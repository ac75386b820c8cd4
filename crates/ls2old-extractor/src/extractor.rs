//! Core extraction: download a corpus and persist the raw dump.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use ls2old_domain::document::docs_to_rows;
use ls2old_domain::traits::{FetchOutcome, SourceStore};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// The extractor downloads one LingSync corpus through a [`SourceStore`]
/// and writes the dump as a JSON artifact.
pub struct Extractor<S: SourceStore> {
    source: S,
    config: ExtractorConfig,
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Path to the artifact holding the dump.
    pub path: PathBuf,
    /// `false` when an existing artifact was reused without a download.
    pub downloaded: bool,
    /// Number of documents in the dump, when downloaded this run.
    pub document_count: Option<usize>,
}

impl<S: SourceStore> Extractor<S> {
    /// Build an extractor over a source store.
    pub fn new(source: S, config: ExtractorConfig) -> Self {
        Self { source, config }
    }

    /// Download the corpus, or reuse an existing artifact.
    ///
    /// A present artifact short-circuits the network entirely unless
    /// `force_download` is set. Authentication failure and missing read
    /// permission both abort the run.
    pub fn extract(&self) -> Result<Extraction, ExtractorError> {
        let path = self.config.artifact_path();
        if !self.config.force_download && path.is_file() {
            info!(path = %path.display(), "reusing existing LingSync dump");
            return Ok(Extraction { path, downloaded: false, document_count: None });
        }

        if !self
            .source
            .authenticate()
            .map_err(|e| ExtractorError::Source(e.to_string()))?
        {
            return Err(ExtractorError::AuthenticationFailed(self.config.server_url.clone()));
        }
        debug!(corpus = %self.config.corpus, "logged in to the LingSync server");

        let docs = match self
            .source
            .fetch_all_documents(&self.config.corpus)
            .map_err(|e| ExtractorError::Source(e.to_string()))?
        {
            FetchOutcome::Documents(docs) => docs,
            FetchOutcome::Unauthorized => {
                return Err(ExtractorError::Unauthorized(self.config.corpus.clone()))
            }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let dump = docs_to_rows(&docs);
        fs::write(&path, serde_json::to_vec(&dump)?)?;
        info!(
            path = %path.display(),
            count = docs.len(),
            "wrote LingSync dump artifact"
        );
        Ok(Extraction { path, downloaded: true, document_count: Some(docs.len()) })
    }
}
