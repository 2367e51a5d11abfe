//! Fluent request builder

use crate::errors::HttpError;
use crate::spec::{RawResponse, RequestSpec};
use crate::transport::Transport;
use crate::types::HttpMethod;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Characters escaped in a substituted path parameter so it stays one segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

type BodySource = Arc<dyn Fn() -> Result<JsonValue, serde_json::Error> + Send + Sync>;

/// Accumulates a request description and executes it through a [`Transport`]
///
/// The body is serialized on every [`build`](Self::build), so each execution
/// sends a fresh snapshot. `execute` borrows the builder and may be called
/// more than once; every call sends the request again.
///
/// ```rust,ignore
/// let response = RequestBuilder::get("/api/authors/{id}")
///     .path_param("id", 7)
///     .query_param("expand", "books")
///     .execute(transport.as_ref())
///     .await?;
/// ```
#[derive(Clone)]
pub struct RequestBuilder {
    method: HttpMethod,
    path: String,
    path_params: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    query_params: BTreeMap<String, String>,
    body: Option<BodySource>,
}

impl RequestBuilder {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: Vec::new(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Replace verb and path, keeping everything else
    pub fn method(mut self, method: HttpMethod, path: impl Into<String>) -> Self {
        self.method = method;
        self.path = path.into();
        self
    }

    /// Set the payload; serialized to JSON at execution time
    pub fn body<B>(mut self, value: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(move || serde_json::to_value(&value)));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers<K, V>(mut self, headers: HashMap<K, V>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.headers.insert(key.into(), value.into());
        }
        self
    }

    /// Add a query parameter; the value only goes through `to_string()`
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.insert(key.into(), value.to_string());
        self
    }

    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in params {
            self.query_params.insert(key.into(), value.to_string());
        }
        self
    }

    /// Substitute `{name}` in the path
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.push((name.into(), value.to_string()));
        self
    }

    pub fn http_method(&self) -> HttpMethod {
        self.method
    }

    /// Produce a new immutable [`RequestSpec`]
    pub fn build(&self) -> Result<RequestSpec, HttpError> {
        let path = resolve_placeholders(&self.path, &self.path_params)?;

        let body = match self.body {
            Some(ref source) => Some(source()?),
            None => None,
        };

        let mut headers = self.headers.clone();
        if body.is_some() && !has_header(&headers, "content-type") {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        Ok(RequestSpec {
            method: self.method,
            path,
            headers,
            query_params: self.query_params.clone(),
            body,
        })
    }

    /// Build a spec and hand it to `transport`
    pub async fn execute(&self, transport: &dyn Transport) -> Result<RawResponse, HttpError> {
        let spec = self.build()?;
        debug!("Executing {} {}", spec.method, spec.path_and_query());
        transport.execute(spec).await
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("path_params", &self.path_params)
            .field("headers", &self.headers)
            .field("query_params", &self.query_params)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

fn has_header(headers: &BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}

fn resolve_placeholders(path: &str, params: &[(String, String)]) -> Result<String, HttpError> {
    let mut resolved = path.to_string();
    for (name, value) in params {
        let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
        resolved = resolved.replace(&format!("{{{}}}", name), &encoded);
    }

    if let Some(start) = resolved.find('{') {
        if resolved[start..].contains('}') {
            return Err(HttpError::UnresolvedPlaceholder(resolved));
        }
    }

    Ok(resolved)
}
