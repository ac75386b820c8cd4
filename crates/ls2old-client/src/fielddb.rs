//! Client for the LingSync document store (CouchDB HTTP API).

use crate::error::ClientError;
use ls2old_domain::traits::{FetchOutcome, SourceStore};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Blocking client for a LingSync CouchDB server.
///
/// Authentication uses the CouchDB `_session` endpoint; the session cookie
/// is retained for the lifetime of the client, so [`authenticate`] must be
/// called once before any fetch.
///
/// [`authenticate`]: SourceStore::authenticate
pub struct FieldDbClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl FieldDbClient {
    /// Build a client against the given server URL (scheme, host and
    /// optional port, no trailing slash).
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl SourceStore for FieldDbClient {
    type Error = ClientError;

    /// `POST <base>/_session` with the configured credentials. CouchDB
    /// answers `{"ok": true, ...}` on success.
    fn authenticate(&self) -> Result<bool, ClientError> {
        let url = format!("{}/_session", self.base_url);
        debug!(url = %url, username = %self.username, "logging in to CouchDB");
        let response = self
            .http
            .post(&url)
            .json(&json!({"name": self.username, "password": self.password}))
            .send()?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(false);
        }
        let body: Value = response.json()?;
        Ok(body.get("ok").and_then(Value::as_bool).unwrap_or(false))
    }

    /// `GET <base>/<collection>/_all_docs?include_docs=true`, unwrapping
    /// each row to its embedded document.
    ///
    /// CouchDB reports a permissions failure as a normal JSON body with an
    /// `"error": "unauthorized"` member; that becomes
    /// [`FetchOutcome::Unauthorized`] rather than an `Err`.
    fn fetch_all_documents(&self, collection: &str) -> Result<FetchOutcome, ClientError> {
        let url = format!("{}/{}/_all_docs", self.base_url, collection);
        info!(url = %url, "downloading all documents");
        let body: Value = self
            .http
            .get(&url)
            .query(&[("include_docs", "true")])
            .send()?
            .json()?;
        if body.get("error").and_then(Value::as_str) == Some("unauthorized") {
            return Ok(FetchOutcome::Unauthorized);
        }
        let rows = body
            .get("rows")
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::MalformedResponse {
                url: url.clone(),
                detail: "no 'rows' array in _all_docs response".to_string(),
            })?;
        let docs = rows
            .iter()
            .filter_map(|row| row.get("doc"))
            .filter(|doc| !doc.is_null())
            .cloned()
            .collect::<Vec<Value>>();
        debug!(count = docs.len(), collection = %collection, "documents downloaded");
        Ok(FetchOutcome::Documents(docs))
    }
}
