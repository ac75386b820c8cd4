//! Media download: materializing LingSync attachments on local disk.
//!
//! Attachments can be large, so the total volume is assessed first and big
//! migrations require explicit operator consent. Individual download
//! failures drop the affected file with warnings; they never abort the
//! conversion.

use crate::error::ConvertError;
use ls2old_domain::{FilePayload, StagingStore, Warnings};
use std::fs;
use std::path::PathBuf;

/// A single file above this size is considered big (20 MB).
pub const BIG_FILE_SIZE: u64 = 20_000_000;

/// An aggregate volume above this size is considered big (200 MB).
pub const BIG_DATA: u64 = 200_000_000;

/// Render a byte count with three significant digits in binary units.
pub fn human_bytes(num_bytes: Option<u64>) -> String {
    let num_bytes = match num_bytes {
        Some(n) => n,
        None => return "File size unavailable.".to_owned(),
    };
    // A u64 byte count tops out below a full EiB's worth of ZiB/YiB, so
    // the ladder stops at EiB.
    const UNITS: [(&str, u64); 6] = [
        ("EiB", 1 << 60),
        ("PiB", 1 << 50),
        ("TiB", 1 << 40),
        ("GiB", 1 << 30),
        ("MiB", 1 << 20),
        ("KiB", 1 << 10),
    ];
    for (unit, size) in UNITS.iter() {
        if num_bytes > *size {
            return format!("{} {}", three_sig(num_bytes as f64 / *size as f64), unit);
        }
    }
    format!("{} bytes", num_bytes)
}

fn three_sig(value: f64) -> String {
    let rendered = if value >= 100.0 {
        format!("{:.0}", value)
    } else if value >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    };
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        rendered
    }
}

/// The size assessment for a staged file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaPolicy {
    /// Total bytes across files whose size is known.
    pub total: u64,
    /// At least one file exceeds [`BIG_FILE_SIZE`].
    pub has_big_file: bool,
    /// The total exceeds [`BIG_DATA`].
    pub has_big_data: bool,
}

impl MediaPolicy {
    /// Assess the staged files.
    pub fn assess(files: &[FilePayload]) -> MediaPolicy {
        let sizes: Vec<u64> = files.iter().filter_map(|f| f.source_size).collect();
        let total: u64 = sizes.iter().sum();
        MediaPolicy {
            total,
            has_big_file: sizes.iter().any(|s| *s > BIG_FILE_SIZE),
            has_big_data: total > BIG_DATA,
        }
    }

    /// Whether downloading needs operator consent.
    pub fn requires_consent(&self) -> bool {
        self.has_big_file || self.has_big_data
    }

    /// The consent prompt body, `None` when no consent is needed.
    pub fn message(&self) -> Option<String> {
        match (self.has_big_file, self.has_big_data) {
            (true, true) => Some(format!(
                "Your LingSync corpus contains at least {} worth of (audio/video/image) \
                 file data, including at least one file bigger than {}.",
                human_bytes(Some(self.total)),
                human_bytes(Some(BIG_FILE_SIZE))
            )),
            (true, false) => Some(format!(
                "Your LingSync corpus contains audio/video/image files, some of which are \
                 bigger than {}.",
                human_bytes(Some(BIG_FILE_SIZE))
            )),
            (false, true) => Some(format!(
                "Your LingSync corpus contains at least {} worth of (audio/video/image) \
                 file data.",
                human_bytes(Some(self.total))
            )),
            (false, false) => None,
        }
    }
}

/// How a media fetch pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaOutcome {
    /// Every retrievable file was downloaded (or already present).
    Completed,
    /// The operator declined a big migration; no files were staged.
    Aborted,
}

/// Downloads staged attachments into the corpus media directory.
pub struct MediaFetcher {
    http: reqwest::blocking::Client,
    dir: PathBuf,
    force: bool,
}

impl MediaFetcher {
    /// A fetcher writing into `dir`. With `force`, existing local copies
    /// are re-downloaded.
    pub fn new(dir: PathBuf, force: bool) -> MediaFetcher {
        MediaFetcher { http: reqwest::blocking::Client::new(), dir, force }
    }

    /// Download every staged file, dropping the ones that cannot be
    /// materialized. `consent` is the operator's answer for big
    /// migrations; it is ignored when the volume is small.
    pub fn fetch(
        &self,
        store: &mut StagingStore,
        warnings: &mut Warnings,
        consent: bool,
    ) -> Result<MediaOutcome, ConvertError> {
        if store.files.is_empty() {
            return Ok(MediaOutcome::Completed);
        }
        let policy = MediaPolicy::assess(&store.files);
        if policy.requires_consent() && !consent {
            warnings.add_general(
                "You have lots of file data (i.e., audio, video, or images) in your \
                 LingSync corpus and you chose not to migrate them.",
            );
            store.files.clear();
            return Ok(MediaOutcome::Aborted);
        }

        fs::create_dir_all(&self.dir)?;
        let mut downloaded = Vec::new();
        for mut file in std::mem::take(&mut store.files) {
            let filename = if file.filename.is_empty() {
                url_basename(&file.source_url).unwrap_or_default()
            } else {
                file.filename.clone()
            };
            if file.source_url.is_empty() || filename.is_empty() {
                warnings.add_general(format!(
                    "We were unable to download the file data for a file associated to \
                     LingSync datum {}; URL or filename was not retrievable.",
                    file.source_datum_id
                ));
                continue;
            }
            let path = self.dir.join(&filename);
            if path.is_file() && !self.force {
                tracing::debug!(path = %path.display(), "media file already downloaded");
                file.local_path = Some(path);
                downloaded.push(file);
                continue;
            }
            if self.download(&file.source_url, &path, warnings) {
                file.local_path = Some(path);
                downloaded.push(file);
            } else {
                warnings.add_general(format!(
                    "We were unable to download the file data for a file associated to \
                     LingSync datum {}; download and/or local write failed.",
                    file.source_datum_id
                ));
            }
        }
        store.files = downloaded;
        Ok(MediaOutcome::Completed)
    }

    fn download(&self, url: &str, path: &std::path::Path, warnings: &mut Warnings) -> bool {
        let body = self
            .http
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(|r| r.bytes());
        let body = match body {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(url, %error, "media download failed");
                warnings.add_general(format!(
                    "Attempt to download LingSync file at {} failed.",
                    url
                ));
                return false;
            }
        };
        match fs::write(path, &body) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "media write failed");
                false
            }
        }
    }
}

fn url_basename(url: &str) -> Option<String> {
    url.rsplit('/')
        .next()
        .map(str::to_owned)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn file(url: &str, filename: &str, size: Option<u64>) -> FilePayload {
        FilePayload {
            filename: filename.to_owned(),
            mime_type: "audio/mpeg".to_owned(),
            source_datum_id: "d1".to_owned(),
            source_url: url.to_owned(),
            source_size: size,
            ..Default::default()
        }
    }

    #[test]
    fn human_bytes_three_significant_digits() {
        assert_eq!(human_bytes(None), "File size unavailable.");
        assert_eq!(human_bytes(Some(512)), "512 bytes");
        assert_eq!(human_bytes(Some(20_971_520)), "20 MiB");
        assert_eq!(human_bytes(Some(1_580_000)), "1.51 MiB");
        assert_eq!(human_bytes(Some(24_536_481)), "23.4 MiB");
    }

    #[test]
    fn policy_thresholds() {
        let small = MediaPolicy::assess(&[file("u", "a.mp3", Some(1024))]);
        assert!(!small.requires_consent());
        assert!(small.message().is_none());

        let big_file = MediaPolicy::assess(&[file("u", "a.mp3", Some(BIG_FILE_SIZE + 1))]);
        assert!(big_file.has_big_file);
        assert!(big_file.requires_consent());

        let many = vec![file("u", "a.mp3", Some(BIG_FILE_SIZE)); 11];
        let big_data = MediaPolicy::assess(&many);
        assert!(big_data.has_big_data);
        assert!(big_data.message().unwrap().contains("worth of"));
    }

    // The consent thresholds are decimal megabytes, distinct from the
    // binary 20 MiB JSON-upload ceiling applied later.
    #[test]
    fn consent_thresholds_are_decimal_megabytes() {
        let policy = MediaPolicy::assess(&[file("u", "a.mp3", Some(20_000_001))]);
        assert!(policy.has_big_file);

        let ten = vec![file("u", "a.mp3", Some(20_000_001)); 10];
        assert!(MediaPolicy::assess(&ten).has_big_data);
    }

    #[test]
    fn unknown_sizes_do_not_trigger_consent() {
        let policy = MediaPolicy::assess(&[file("u", "a.mp3", None)]);
        assert_eq!(policy.total, 0);
        assert!(!policy.requires_consent());
    }

    #[test]
    fn refused_consent_clears_files() {
        let dir = tempdir().unwrap();
        let fetcher = MediaFetcher::new(dir.path().to_path_buf(), false);
        let mut store = StagingStore::new();
        store.files = vec![file("https://x.test/a.mp3", "a.mp3", Some(BIG_FILE_SIZE + 1))];
        let mut warnings = Warnings::new();
        let outcome = fetcher.fetch(&mut store, &mut warnings, false).unwrap();
        assert_eq!(outcome, MediaOutcome::Aborted);
        assert!(store.files.is_empty());
        assert_eq!(warnings.count(), 1);
    }

    #[test]
    fn unretrievable_filename_drops_file_with_warning() {
        let dir = tempdir().unwrap();
        let fetcher = MediaFetcher::new(dir.path().to_path_buf(), false);
        let mut store = StagingStore::new();
        store.files = vec![file("", "", Some(10))];
        let mut warnings = Warnings::new();
        let outcome = fetcher.fetch(&mut store, &mut warnings, true).unwrap();
        assert_eq!(outcome, MediaOutcome::Completed);
        assert!(store.files.is_empty());
        assert!(warnings
            .general()
            .iter()
            .any(|w| w.contains("URL or filename was not retrievable.")));
    }

    #[test]
    fn existing_local_copy_is_reused() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"audio").unwrap();
        let fetcher = MediaFetcher::new(dir.path().to_path_buf(), false);
        let mut store = StagingStore::new();
        store.files = vec![file("https://x.test/a.mp3", "a.mp3", Some(10))];
        let mut warnings = Warnings::new();
        fetcher.fetch(&mut store, &mut warnings, true).unwrap();
        assert_eq!(store.files.len(), 1);
        assert_eq!(
            store.files[0].local_path.as_deref(),
            Some(dir.path().join("a.mp3").as_path())
        );
        assert_eq!(warnings.count(), 0);
    }
}
