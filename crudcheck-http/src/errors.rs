//! HTTP error types

use crate::types::HttpMethodError;

/// Error type for HTTP operations
///
/// Every variant is fatal to the current call. Nothing in this crate retries.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] HttpMethodError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unresolved placeholder in path: {0}")]
    UnresolvedPlaceholder(String),

    #[error("No mock response for {0}")]
    NoMockResponse(String),
}

impl HttpError {
    /// True for connection and timeout failures raised by the network layer
    pub fn is_network(&self) -> bool {
        matches!(self, HttpError::NetworkError(_))
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            HttpError::NetworkError(e) => e.is_timeout(),
            _ => false,
        }
    }
}
