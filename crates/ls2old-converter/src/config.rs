//! Configuration for a conversion run.

use std::path::{Path, PathBuf};

/// Configuration for one conversion run. The consent and force flags are
/// operator decisions resolved before the run starts.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Root of the migration working directory.
    pub work_dir: PathBuf,
    /// Name of the LingSync corpus being migrated.
    pub corpus: String,
    /// Convert even when the staged artifact already exists.
    pub force_convert: bool,
    /// Download media files even when a local copy exists.
    pub force_media_download: bool,
    /// Migrate media even when it exceeds the size thresholds.
    pub migrate_large_media: bool,
}

impl ConvertConfig {
    /// Where the staged resource set for this corpus lives.
    pub fn staging_artifact_path(&self) -> PathBuf {
        staging_artifact_path(&self.work_dir, &self.corpus)
    }

    /// Directory the media fetcher downloads into.
    pub fn media_dir(&self) -> PathBuf {
        self.work_dir.join("files").join(&self.corpus)
    }

    /// Path of the source-side summary report.
    pub fn source_summary_path(&self) -> PathBuf {
        self.work_dir
            .join("lingsync")
            .join(format!("{}-summary.txt", self.corpus))
    }

    /// Path of the destination-side summary report.
    pub fn destination_summary_path(&self) -> PathBuf {
        self.work_dir.join("old").join(format!("{}-summary.txt", self.corpus))
    }

    /// Path of the warnings report.
    pub fn warnings_report_path(&self) -> PathBuf {
        self.work_dir
            .join("old")
            .join(format!("{}-conversion-warnings.txt", self.corpus))
    }
}

/// The staged-resource artifact path for a corpus under a working directory.
pub fn staging_artifact_path(work_dir: &Path, corpus: &str) -> PathBuf {
    work_dir.join("old").join(format!("{}.json", corpus))
}
