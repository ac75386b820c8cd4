//! Trait definitions for the pipeline's external collaborators.
//!
//! These traits define the boundary between migration logic and the HTTP
//! infrastructure. The real implementations live in `ls2old-client`; tests
//! substitute in-memory mocks.

use serde_json::Value;

/// Result of fetching a source collection's documents.
///
/// An authorization failure is an explicit value, distinguished from a
/// normal empty corpus.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// All documents of the collection, in store order.
    Documents(Vec<Value>),
    /// The authenticated user may not read this collection.
    Unauthorized,
}

/// The source document store (LingSync's CouchDB API).
pub trait SourceStore {
    /// Error type for source operations.
    type Error: std::fmt::Display;

    /// Log in with the configured credentials. `Ok(false)` means the
    /// credentials were rejected.
    fn authenticate(&self) -> Result<bool, Self::Error>;

    /// Fetch every document in the named collection.
    fn fetch_all_documents(&self, collection: &str) -> Result<FetchOutcome, Self::Error>;
}

/// The destination web service (the OLD's JSON/REST API).
///
/// Responses are raw JSON: a successful create/update/delete carries an
/// `id`; error responses carry an `error` description instead. The uploader
/// interprets them.
pub trait DestinationService {
    /// Error type for destination operations.
    type Error: std::fmt::Display;

    /// Log in with the given credentials. `Ok(false)` means rejected.
    fn authenticate(&self, username: &str, password: &str) -> Result<bool, Self::Error>;

    /// Create a resource; returns the created resource with its new id, or
    /// an error payload.
    fn create(&self, resource: &str, payload: &Value) -> Result<Value, Self::Error>;

    /// Update an existing resource by id.
    fn update(&self, resource: &str, id: i64, payload: &Value) -> Result<Value, Self::Error>;

    /// Delete an existing resource by id.
    fn delete(&self, resource: &str, id: i64) -> Result<Value, Self::Error>;

    /// List all existing resources of a type.
    fn list(&self, resource: &str) -> Result<Vec<Value>, Self::Error>;

    /// Search resources with a destination-side filter expression.
    fn search(&self, resource: &str, query: &Value) -> Result<Vec<Value>, Self::Error>;
}
