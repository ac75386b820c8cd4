//! ls2old Domain Layer
//!
//! Core data model for the LingSync-to-OLD migration pipeline. This crate
//! defines the two incompatible data models the migration bridges and the
//! bookkeeping structures that connect them:
//!
//! - **Source documents**: records pulled from a LingSync corpus (a CouchDB
//!   document store), tagged by kind (session, datum, user, datalist).
//! - **Destination resources**: payloads accepted by an Online Linguistic
//!   Database (OLD) web service (users, speakers, tags, files, forms,
//!   corpora, collections, application settings).
//! - **Staging store**: the full converted resource set awaiting upload.
//! - **Relational map**: source-key to destination-id lookup built during
//!   upload, in dependency order.
//! - **Warnings**: the non-fatal diagnostic taxonomy (general vs.
//!   per-document) accumulated across the whole migration.
//!
//! Infrastructure (HTTP clients, filesystem staging) lives in other crates;
//! the trait interfaces they implement are defined in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod outcome;
pub mod relmap;
pub mod resource;
pub mod staging;
pub mod traits;
pub mod warning;

pub use document::{DocField, DocKind, SourceDocument};
pub use outcome::{AuxiliaryResources, ConversionOutcome, PrimaryPayload};
pub use relmap::{speaker_key, RelationalMap};
pub use resource::{
    guess_allowed_mime, ApplicationSettings, Collection, Corpus, FilePayload, Form, ResourceKind,
    Speaker, Tag, Translation, User, DEFAULT_PASSWORD, PLACEHOLDER, PLACEHOLDER_EMAIL,
};
pub use staging::StagingStore;
pub use traits::{DestinationService, FetchOutcome, SourceStore};
pub use warning::{DocWarnings, Warnings};
