//! ls2old Uploader
//!
//! Step three of the migration: create the staged resources on the
//! destination OLD in dependency order. Application settings, users,
//! speakers and tags go first; files next; then forms, which reference all
//! of the former; finally corpora and collections, whose contents are
//! rendered from the destination form ids assigned along the way.
//!
//! Every run starts by creating a fresh migration tag; every form, corpus
//! and collection created during the run carries it, so a migration can be
//! identified (and undone by hand) on the destination afterwards.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod report;
pub mod run;
pub mod uploader;

pub use error::UploadError;
pub use report::UploadReport;
pub use run::UploadRun;
pub use uploader::{UploadConfig, Uploader};
