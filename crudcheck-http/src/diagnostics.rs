//! Per-instance record of request/response exchanges
//!
//! Every transport owns one [`DiagnosticSink`] and writes to it on every
//! call. A failure reporter pulls the last pair from it when a test fails;
//! nothing is pushed anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::spec::{RawResponse, RequestSpec};

const DEFAULT_CAPACITY: usize = 20;

/// One request and whatever came back for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedExchange {
    pub request: RequestSpec,
    /// Fully resolved URL, when the transport got that far
    pub url: Option<String>,
    pub response: Option<RawResponse>,
    /// Transport failure message when no response was received
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RecordedExchange {
    pub fn request_description(&self) -> String {
        match self.url {
            Some(ref url) => {
                let mut description = self.request.describe();
                description.push_str(&format!("\nURL: {}", url));
                description
            }
            None => self.request.describe(),
        }
    }

    pub fn response_description(&self) -> String {
        match (&self.response, &self.error) {
            (Some(response), _) => response.describe(),
            (None, Some(error)) => format!("Transport error: {}", error),
            (None, None) => "No response recorded".to_string(),
        }
    }
}

#[derive(Debug)]
struct SinkState {
    capacity: usize,
    exchanges: VecDeque<RecordedExchange>,
}

/// Bounded history of exchanges; clones share the same history
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    state: Arc<Mutex<SinkState>>,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` exchanges (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Arc::new(Mutex::new(SinkState {
                capacity,
                exchanges: VecDeque::with_capacity(capacity),
            })),
        }
    }

    pub fn record(&self, exchange: RecordedExchange) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.exchanges.len() == state.capacity {
            state.exchanges.pop_front();
        }
        state.exchanges.push_back(exchange);
    }

    pub fn last(&self) -> Option<RecordedExchange> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.exchanges.back().cloned()
    }

    pub fn last_request_description(&self) -> Option<String> {
        self.last().map(|exchange| exchange.request_description())
    }

    pub fn last_response_description(&self) -> Option<String> {
        self.last().map(|exchange| exchange.response_description())
    }

    /// Oldest first
    pub fn history(&self) -> Vec<RecordedExchange> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.exchanges.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.exchanges.clear();
    }

    /// The last request/response pair formatted for attaching to a failed test
    pub fn render_report(&self) -> String {
        match self.last() {
            Some(exchange) => format!(
                "--- Last request ({} ms) ---\n{}\n--- Last response ---\n{}",
                exchange.duration_ms,
                exchange.request_description(),
                exchange.response_description()
            ),
            None => "No HTTP exchange recorded".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;
    use std::collections::BTreeMap;

    fn exchange(path: &str, status: Option<u16>) -> RecordedExchange {
        RecordedExchange {
            request: RequestSpec {
                method: HttpMethod::Get,
                path: path.to_string(),
                headers: BTreeMap::new(),
                query_params: BTreeMap::new(),
                body: None,
            },
            url: None,
            response: status.map(|code| RawResponse::new(code, "{}")),
            error: if status.is_none() {
                Some("connection refused".to_string())
            } else {
                None
            },
            started_at: Utc::now(),
            duration_ms: 3,
        }
    }

    #[test]
    fn test_empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(sink.is_empty());
        assert!(sink.last_request_description().is_none());
        assert_eq!(sink.render_report(), "No HTTP exchange recorded");
    }

    #[test]
    fn test_last_pair_tracks_latest_exchange() {
        let sink = DiagnosticSink::new();
        sink.record(exchange("/authors/1", Some(200)));
        sink.record(exchange("/authors/2", Some(404)));

        assert_eq!(sink.last_request_description().unwrap(), "GET /authors/2");
        assert!(sink.last_response_description().unwrap().starts_with("HTTP 404"));

        let report = sink.render_report();
        assert!(report.contains("GET /authors/2"));
        assert!(report.contains("HTTP 404"));
    }

    #[test]
    fn test_transport_error_described() {
        let sink = DiagnosticSink::new();
        sink.record(exchange("/authors", None));
        assert_eq!(
            sink.last_response_description().unwrap(),
            "Transport error: connection refused"
        );
    }

    #[test]
    fn test_history_is_bounded() {
        let sink = DiagnosticSink::with_capacity(2);
        sink.record(exchange("/a", Some(200)));
        sink.record(exchange("/b", Some(200)));
        sink.record(exchange("/c", Some(200)));

        let paths: Vec<String> = sink.history().into_iter().map(|e| e.request.path).collect();
        assert_eq!(paths, vec!["/b".to_string(), "/c".to_string()]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_clones_share_history_but_instances_do_not() {
        let sink = DiagnosticSink::new();
        let shared = sink.clone();
        let other = DiagnosticSink::new();

        shared.record(exchange("/a", Some(200)));
        assert_eq!(sink.len(), 1);
        assert!(other.is_empty());
    }
}
