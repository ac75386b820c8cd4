//! Client for the Online Linguistic Database JSON/REST API.

use crate::error::ClientError;
use ls2old_domain::traits::DestinationService;
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Blocking client for an OLD web service.
///
/// The OLD authenticates with a session cookie obtained from
/// `POST /login/authenticate`; all later requests ride on it. Create,
/// update and delete return the affected resource as JSON on success and a
/// body with an `error` member on failure, both with status 200 in the
/// common case, so callers inspect the body rather than the status.
pub struct OldClient {
    http: Client,
    base_url: String,
}

impl OldClient {
    /// Build a client against the given OLD base URL (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn expect_array(url: String, body: Value) -> Result<Vec<Value>, ClientError> {
        match body {
            Value::Array(items) => Ok(items),
            other => Err(ClientError::MalformedResponse {
                url,
                detail: format!("expected a JSON array, got {}", kind_name(&other)),
            }),
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl DestinationService for OldClient {
    type Error = ClientError;

    /// `POST /login/authenticate`; the OLD answers
    /// `{"authenticated": true}` on success.
    fn authenticate(&self, username: &str, password: &str) -> Result<bool, ClientError> {
        let url = self.url("login/authenticate");
        info!(url = %url, username = %username, "logging in to the OLD");
        let body: Value = self
            .http
            .post(&url)
            .json(&json!({"username": username, "password": password}))
            .send()?
            .json()?;
        Ok(body.get("authenticated").and_then(Value::as_bool).unwrap_or(false))
    }

    fn create(&self, resource: &str, payload: &Value) -> Result<Value, ClientError> {
        let url = self.url(resource);
        debug!(resource = %resource, "creating resource");
        Ok(self.http.post(&url).json(payload).send()?.json()?)
    }

    fn update(&self, resource: &str, id: i64, payload: &Value) -> Result<Value, ClientError> {
        let url = self.url(&format!("{}/{}", resource, id));
        debug!(resource = %resource, id, "updating resource");
        Ok(self.http.put(&url).json(payload).send()?.json()?)
    }

    fn delete(&self, resource: &str, id: i64) -> Result<Value, ClientError> {
        let url = self.url(&format!("{}/{}", resource, id));
        debug!(resource = %resource, id, "deleting resource");
        Ok(self.http.delete(&url).send()?.json()?)
    }

    fn list(&self, resource: &str) -> Result<Vec<Value>, ClientError> {
        let url = self.url(resource);
        debug!(resource = %resource, "listing resources");
        let body: Value = self.http.get(&url).send()?.json()?;
        Self::expect_array(url, body)
    }

    /// The OLD's query interface uses the nonstandard `SEARCH` HTTP method
    /// with a JSON filter expression in the body.
    fn search(&self, resource: &str, query: &Value) -> Result<Vec<Value>, ClientError> {
        let url = self.url(resource);
        debug!(resource = %resource, "searching resources");
        let method = Method::from_bytes(b"SEARCH").map_err(|_| ClientError::MalformedResponse {
            url: url.clone(),
            detail: "SEARCH is not a valid HTTP method token".to_string(),
        })?;
        let body: Value = self.http.request(method, &url).json(query).send()?.json()?;
        Self::expect_array(url, body)
    }
}
