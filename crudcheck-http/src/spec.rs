//! Finalized request descriptions and raw responses

use crate::errors::HttpError;
use crate::types::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use url::Url;

/// A finalized, immutable request description
///
/// Produced by [`crate::RequestBuilder::build`]. `path` is either relative to
/// the transport's base URL or an absolute `http(s)` URL, and never contains
/// unresolved `{placeholder}` segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub body: Option<JsonValue>,
}

impl RequestSpec {
    /// Resolve the full URL against `base`, percent-encoding query parameters
    pub fn resolve_url(&self, base: &Url) -> Result<Url, HttpError> {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            Url::parse(&self.path)
        } else {
            let joined = format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                self.path.trim_start_matches('/')
            );
            Url::parse(&joined)
        }
        .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", self.path, e)))?;

        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Path with the query string appended, for logs and diagnostics
    pub fn path_and_query(&self) -> String {
        if self.query_params.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Multi-line human readable description
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.method, self.path_and_query());
        for (name, value) in &self.headers {
            let _ = write!(out, "\n{}: {}", name, value);
        }
        if let Some(ref body) = self.body {
            let rendered = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            let _ = write!(out, "\n\n{}", rendered);
        }
        out
    }
}

/// Status code and body text as returned by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub body_text: String,
}

impl RawResponse {
    pub fn new(status_code: u16, body_text: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body_text: body_text.into(),
        }
    }

    /// Response carrying `body` serialized as JSON
    pub fn json(status_code: u16, body: &JsonValue) -> Self {
        let mut response = Self::new(status_code, body.to_string());
        response
            .headers
            .insert("content-type".to_string(), "application/json".to_string());
        response
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Parse the body as JSON
    pub fn body_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::from_str(&self.body_text)
    }

    pub fn describe(&self) -> String {
        let mut out = format!("HTTP {}", self.status_code);
        for (name, value) in &self.headers {
            let _ = write!(out, "\n{}: {}", name, value);
        }
        if !self.body_text.is_empty() {
            let _ = write!(out, "\n\n{}", self.body_text);
        }
        out
    }
}
