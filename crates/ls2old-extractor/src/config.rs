//! Configuration for the extractor.

use std::path::{Path, PathBuf};

/// Configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Root of the migration working directory; artifacts land under
    /// `<work_dir>/lingsync/`.
    pub work_dir: PathBuf,
    /// Name of the LingSync corpus (the CouchDB database name).
    pub corpus: String,
    /// The LingSync server URL, for diagnostics.
    pub server_url: String,
    /// Download even when the artifact already exists.
    pub force_download: bool,
}

impl ExtractorConfig {
    /// Where the raw dump for this corpus lives.
    pub fn artifact_path(&self) -> PathBuf {
        raw_artifact_path(&self.work_dir, &self.corpus)
    }
}

/// The raw-dump artifact path for a corpus under a working directory.
pub fn raw_artifact_path(work_dir: &Path, corpus: &str) -> PathBuf {
    work_dir.join("lingsync").join(format!("{}.json", corpus))
}
