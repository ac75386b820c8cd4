//! ls2old Extractor
//!
//! Step one of the migration: pull every document of a LingSync corpus and
//! persist the raw dump to a local JSON artifact. The artifact is the input
//! to the converter, and it makes the pipeline resumable: an existing
//! artifact is reused unless a fresh download is forced.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod extractor;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::{Extraction, Extractor};
