//! Harness error types

use crudcheck_api_types::PageInvariantError;
use crudcheck_config::ConfigError;
use crudcheck_http::HttpError;
use crudcheck_schema::SchemaError;
use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Coarse classification of a [`HarnessError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Request,
    Transport,
    UnexpectedStatus,
    SchemaLookup,
    SchemaValidation,
    Decode,
    MissingData,
    UnexpectedMessage,
    InvalidPage,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid harness configuration: {0}")]
    Config(#[from] ConfigError),

    /// The request could not be assembled: unresolved path placeholder, bad
    /// header, unserializable body, bad URL or an unscripted mock call
    #[error("Invalid request: {0}")]
    Request(HttpError),

    /// The request never produced a response (connection refused, timeout)
    #[error("Transport error: {0}")]
    Transport(HttpError),

    #[error("Expected HTTP {expected} but got {actual}. Response body: {body}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    /// A schema could not be found or compiled; a harness setup problem
    #[error(transparent)]
    SchemaLookup(SchemaError),

    /// The response does not conform to its schema; a backend contract violation
    #[error(transparent)]
    SchemaValidation(SchemaError),

    #[error("Failed to decode response as {shape}: {source}. Response body: {body}")]
    Decode {
        shape: &'static str,
        source: serde_json::Error,
        body: String,
    },

    #[error("{entity} response carried no data. Response body: {body}")]
    MissingData { entity: String, body: String },

    #[error("Expected response message containing '{expected}', got {actual:?}")]
    UnexpectedMessage {
        expected: String,
        actual: Option<String>,
    },

    #[error("Page violates pagination invariants: {source}. Response body: {body}")]
    InvalidPage {
        source: PageInvariantError,
        body: String,
    },
}

impl From<HttpError> for HarnessError {
    fn from(err: HttpError) -> Self {
        if err.is_network() {
            HarnessError::Transport(err)
        } else {
            HarnessError::Request(err)
        }
    }
}

impl From<SchemaError> for HarnessError {
    fn from(err: SchemaError) -> Self {
        if err.is_lookup() {
            HarnessError::SchemaLookup(err)
        } else {
            HarnessError::SchemaValidation(err)
        }
    }
}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Config(_) => ErrorKind::Config,
            HarnessError::Request(_) => ErrorKind::Request,
            HarnessError::Transport(_) => ErrorKind::Transport,
            HarnessError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            HarnessError::SchemaLookup(_) => ErrorKind::SchemaLookup,
            HarnessError::SchemaValidation(_) => ErrorKind::SchemaValidation,
            HarnessError::Decode { .. } => ErrorKind::Decode,
            HarnessError::MissingData { .. } => ErrorKind::MissingData,
            HarnessError::UnexpectedMessage { .. } => ErrorKind::UnexpectedMessage,
            HarnessError::InvalidPage { .. } => ErrorKind::InvalidPage,
        }
    }

    /// Whether the backend answered but broke its contract, as opposed to
    /// the harness failing to talk to it or being misconfigured
    pub fn is_assertion(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::Config
                | ErrorKind::Request
                | ErrorKind::Transport
                | ErrorKind::SchemaLookup
        )
    }

    /// Status code of an [`HarnessError::UnexpectedStatus`]
    pub fn actual_status(&self) -> Option<u16> {
        match self {
            HarnessError::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudcheck_schema::ValidationLevel;

    #[test]
    fn test_schema_errors_split_by_kind() {
        let lookup: HarnessError = SchemaError::Lookup {
            path: "/schemas/missing.json".to_string(),
            reason: "not found".to_string(),
        }
        .into();
        assert_eq!(lookup.kind(), ErrorKind::SchemaLookup);
        assert!(!lookup.is_assertion());

        let validation: HarnessError = SchemaError::Validation {
            path: "/schemas/author-schema.json".to_string(),
            level: ValidationLevel::Content,
            index: Some(1),
            errors: vec!["/name: 42 is not of type \"string\"".to_string()],
        }
        .into();
        assert_eq!(validation.kind(), ErrorKind::SchemaValidation);
        assert!(validation.is_assertion());
        assert!(validation.to_string().contains("at index 1"));
    }

    #[test]
    fn test_request_construction_errors_are_not_transport() {
        let err: HarnessError =
            HttpError::UnresolvedPlaceholder("/api/{tenant}/authors/1".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("{tenant}"));

        let err: HarnessError = HttpError::InvalidHeaderName("bad header".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Request);

        let err: HarnessError = HttpError::NoMockResponse("GET:/api/authors".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Request);
    }

    #[test]
    fn test_unexpected_status_carries_body() {
        let err = HarnessError::UnexpectedStatus {
            expected: 201,
            actual: 400,
            body: "{\"success\":false,\"message\":\"name is required\"}".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
        assert_eq!(err.actual_status(), Some(400));
        let message = err.to_string();
        assert!(message.contains("Expected HTTP 201 but got 400"));
        assert!(message.contains("name is required"));
    }
}
