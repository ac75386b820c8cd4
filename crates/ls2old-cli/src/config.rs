//! Configuration: the optional TOML file and the resolved run settings.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// LingSync server URL used when none is configured.
pub const DEFAULT_LINGSYNC_URL: &str = "https://corpus.lingsync.org";

/// Working directory used when none is configured.
pub const DEFAULT_WORK_DIR: &str = "ls2old";

/// The TOML configuration file. Every member is optional; command-line
/// arguments take precedence over file values.
///
/// ```toml
/// work_dir = "/data/migrations"
///
/// [lingsync]
/// url = "https://corpus.lingsync.org"
/// corpus = "ana-firstcorpus"
/// username = "ana"
/// password = "..."
///
/// [old]
/// url = "https://projects.example.org/blaold"
/// username = "admin"
/// password = "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Migration working directory.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// LingSync server settings.
    #[serde(default)]
    pub lingsync: ServerSection,

    /// Destination OLD settings.
    #[serde(default)]
    pub old: ServerSection,
}

/// Connection settings for one server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    /// Server URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Corpus name (LingSync side only).
    #[serde(default)]
    pub corpus: Option<String>,

    /// Username.
    #[serde(default)]
    pub username: Option<String>,

    /// Password.
    #[serde(default)]
    pub password: Option<String>,
}

impl ConfigFile {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

/// The fully resolved settings for one migration run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Migration working directory.
    pub work_dir: PathBuf,
    /// LingSync server URL.
    pub ls_url: String,
    /// LingSync corpus name.
    pub ls_corpus: String,
    /// LingSync username.
    pub ls_username: String,
    /// LingSync password.
    pub ls_password: String,
    /// Destination OLD URL.
    pub old_url: String,
    /// OLD username.
    pub old_username: String,
    /// OLD password.
    pub old_password: String,
    /// Re-download the corpus dump.
    pub force_download: bool,
    /// Re-run the conversion.
    pub force_convert: bool,
    /// Re-download media files.
    pub force_file_download: bool,
    /// Migrate media past the size thresholds.
    pub migrate_large_media: bool,
    /// Update matching pre-existing OLD users.
    pub overwrite_users: bool,
    /// Update matching pre-existing OLD speakers.
    pub overwrite_speakers: bool,
    /// Print the full warnings report.
    pub verbose: bool,
}

impl Settings {
    /// Merge command-line arguments over the configuration file. Arguments
    /// win; the file fills the gaps; servers and credentials without a
    /// default are required.
    pub fn resolve(cli: Cli) -> Result<Settings> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Ok(Settings {
            work_dir: cli
                .work_dir
                .or(file.work_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR)),
            ls_url: cli
                .ls_url
                .or(file.lingsync.url)
                .unwrap_or_else(|| DEFAULT_LINGSYNC_URL.to_owned()),
            ls_corpus: cli
                .ls_corpus
                .or(file.lingsync.corpus)
                .ok_or(CliError::MissingSetting("LingSync corpus name"))?,
            ls_username: cli
                .ls_username
                .or(file.lingsync.username)
                .ok_or(CliError::MissingSetting("LingSync username"))?,
            ls_password: cli
                .ls_password
                .or(file.lingsync.password)
                .ok_or(CliError::MissingSetting("LingSync password"))?,
            old_url: cli
                .old_url
                .or(file.old.url)
                .ok_or(CliError::MissingSetting("OLD URL"))?,
            old_username: cli
                .old_username
                .or(file.old.username)
                .ok_or(CliError::MissingSetting("OLD username"))?,
            old_password: cli
                .old_password
                .or(file.old.password)
                .ok_or(CliError::MissingSetting("OLD password"))?,
            force_download: cli.force_download,
            force_convert: cli.force_convert,
            force_file_download: cli.force_file_download,
            migrate_large_media: cli.migrate_large_media,
            overwrite_users: cli.overwrite_users,
            overwrite_speakers: cli.overwrite_speakers,
            verbose: cli.verbose,
        })
    }
}
