//! ls2old CLI library.
//!
//! Argument parsing, configuration resolution, terminal output and the
//! end-to-end pipeline driver for the `ls2old` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use cli::Cli;
pub use config::{ConfigFile, Settings};
pub use error::{CliError, Result};
pub use output::Printer;
