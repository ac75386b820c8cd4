//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Migrate a LingSync corpus to an Online Linguistic Database.
///
/// The migration runs in three steps: download the corpus from the LingSync
/// server, convert its documents to OLD resources on disk, and create those
/// resources on the destination OLD. The first two steps cache their output
/// under the working directory, so an interrupted migration picks up where
/// it left off.
#[derive(Debug, Parser)]
#[command(name = "ls2old")]
#[command(version, about)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Migration working directory (dumps, staged resources, media)
    #[arg(short, long)]
    pub work_dir: Option<PathBuf>,

    /// LingSync server URL
    #[arg(long)]
    pub ls_url: Option<String>,

    /// Name of the LingSync corpus to migrate
    #[arg(long)]
    pub ls_corpus: Option<String>,

    /// LingSync username
    #[arg(long)]
    pub ls_username: Option<String>,

    /// LingSync password
    #[arg(long, env = "LS2OLD_LS_PASSWORD", hide_env_values = true)]
    pub ls_password: Option<String>,

    /// Destination OLD URL
    #[arg(long)]
    pub old_url: Option<String>,

    /// OLD username
    #[arg(long)]
    pub old_username: Option<String>,

    /// OLD password
    #[arg(long, env = "LS2OLD_OLD_PASSWORD", hide_env_values = true)]
    pub old_password: Option<String>,

    /// Re-download the corpus even when a local dump exists
    #[arg(short = 'd', long)]
    pub force_download: bool,

    /// Re-run the conversion even when staged resources exist
    #[arg(short = 'c', long)]
    pub force_convert: bool,

    /// Re-download media files even when local copies exist
    #[arg(short = 'f', long)]
    pub force_file_download: bool,

    /// Migrate media files even when they exceed the size thresholds
    #[arg(long)]
    pub migrate_large_media: bool,

    /// Update pre-existing OLD users that match migrated ones
    #[arg(long)]
    pub overwrite_users: bool,

    /// Update pre-existing OLD speakers that match migrated ones
    #[arg(long)]
    pub overwrite_speakers: bool,

    /// Print the full conversion warnings report after the run
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
