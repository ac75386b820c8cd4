//! ls2old Converter
//!
//! Step two of the migration: map every LingSync document in the raw dump to
//! OLD resource payloads, consolidate duplicates, synthesize the application
//! settings, download media, and persist the staged resource set plus
//! summary and warnings reports.
//!
//! The mapping functions are pure: each takes a classified source document
//! and returns a [`ConversionOutcome`](ls2old_domain::ConversionOutcome)
//! carrying the payloads, implied auxiliary resources and warnings. The
//! orchestrator in [`converter`] folds the outcomes into the staging store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod appsettings;
pub mod config;
pub mod consolidate;
pub mod converter;
pub mod datalist;
pub mod datum;
pub mod error;
pub mod media;
pub mod session;
pub mod speakers;
pub mod summary;
pub mod text;
pub mod user;

pub use config::ConvertConfig;
pub use converter::{Conversion, Converter};
pub use error::ConvertError;
