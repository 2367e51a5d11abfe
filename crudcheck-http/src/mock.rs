//! Scripted offline transport

use crate::diagnostics::{DiagnosticSink, RecordedExchange};
use crate::errors::HttpError;
use crate::spec::{RawResponse, RequestSpec};
use crate::transport::Transport;
use crate::types::HttpMethod;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Transport that answers from scripted responses instead of the network
///
/// Responses are keyed by `"METHOD:path"` (query string excluded). Each key
/// holds a queue; responses are handed out in order and the last one repeats.
/// Every received spec is kept for assertions.
#[derive(Debug, Default)]
pub struct MockTransport {
    mocks: Mutex<HashMap<String, VecDeque<RawResponse>>>,
    requests: Mutex<Vec<RequestSpec>>,
    diagnostics: DiagnosticSink,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(diagnostics: DiagnosticSink) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }

    fn key(method: HttpMethod, path: &str) -> String {
        format!("{}:{}", method.as_str(), path)
    }

    /// Queue a response for `method` + `path`
    pub fn add_mock(&self, method: HttpMethod, path: &str, response: RawResponse) {
        let mut mocks = self.mocks.lock().unwrap_or_else(PoisonError::into_inner);
        mocks
            .entry(Self::key(method, path))
            .or_default()
            .push_back(response);
        debug!("Added mock response for {} {}", method, path);
    }

    /// Queue a JSON response for `method` + `path`
    pub fn add_json_mock(&self, method: HttpMethod, path: &str, status: u16, body: JsonValue) {
        self.add_mock(method, path, RawResponse::json(status, &body));
    }

    /// Add a mock using a string method (e.g. loaded from a fixture file)
    pub fn add_mock_str(
        &self,
        method: &str,
        path: &str,
        response: RawResponse,
    ) -> Result<(), crate::types::HttpMethodError> {
        let method: HttpMethod = method.parse()?;
        self.add_mock(method, path, response);
        Ok(())
    }

    pub fn clear_mocks(&self) {
        self.mocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Specs received so far, oldest first
    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_response(&self, spec: &RequestSpec) -> Option<RawResponse> {
        let mut mocks = self.mocks.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = mocks.get_mut(&Self::key(spec.method, &spec.path))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, spec: RequestSpec) -> Result<RawResponse, HttpError> {
        let started_at = Utc::now();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(spec.clone());

        let outcome = self
            .next_response(&spec)
            .ok_or_else(|| HttpError::NoMockResponse(format!("{} {}", spec.method, spec.path)));

        let (response, error) = match outcome {
            Ok(ref response) => (Some(response.clone()), None),
            Err(ref e) => (None, Some(e.to_string())),
        };

        self.diagnostics.record(RecordedExchange {
            request: spec,
            url: None,
            response,
            error,
            started_at,
            duration_ms: 0,
        });

        outcome
    }

    fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }
}
