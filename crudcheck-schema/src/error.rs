//! Schema error types

use std::fmt;
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Nesting level a validation failure happened at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    /// The response envelope itself
    Wrapper,
    /// The envelope's `data` payload
    Data,
    /// One element of `data.content` on a paginated response
    Content,
    /// One element of a bare `data` array
    Element,
    /// A document validated on its own, outside any cascade
    Document,
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationLevel::Wrapper => "response wrapper",
            ValidationLevel::Data => "response data",
            ValidationLevel::Content => "page content element",
            ValidationLevel::Element => "data array element",
            ValidationLevel::Document => "document",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema could not be resolved, read, parsed or compiled
    #[error("Schema lookup failed for '{path}': {reason}")]
    Lookup { path: String, reason: String },

    /// A document does not conform to a resolved schema
    #[error("{level}{} does not match schema '{path}': {}", index_suffix(.index), .errors.join("; "))]
    Validation {
        path: String,
        level: ValidationLevel,
        /// Index of the first failing element for array levels
        index: Option<usize>,
        errors: Vec<String>,
    },

    /// The value to validate could not be turned into JSON
    #[error("Failed to serialize value for validation: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn lookup(path: &str, reason: impl Into<String>) -> Self {
        SchemaError::Lookup {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, SchemaError::Lookup { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SchemaError::Validation { .. })
    }

    /// Failing element index, for element-level validation failures
    pub fn failing_index(&self) -> Option<usize> {
        match self {
            SchemaError::Validation { index, .. } => *index,
            _ => None,
        }
    }

    pub fn schema_path(&self) -> Option<&str> {
        match self {
            SchemaError::Lookup { path, .. } | SchemaError::Validation { path, .. } => Some(path),
            SchemaError::Serialization(_) => None,
        }
    }
}

fn index_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at index {}", i),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_includes_index_and_path() {
        let err = SchemaError::Validation {
            path: "/schemas/author-schema.json".to_string(),
            level: ValidationLevel::Content,
            index: Some(1),
            errors: vec!["/name: 42 is not of type \"string\"".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "page content element at index 1 does not match schema '/schemas/author-schema.json': /name: 42 is not of type \"string\""
        );
        assert_eq!(err.failing_index(), Some(1));
        assert!(err.is_validation());
        assert!(!err.is_lookup());
    }

    #[test]
    fn test_lookup_is_distinct() {
        let err = SchemaError::lookup("/schemas/missing.json", "file not found");
        assert!(err.is_lookup());
        assert_eq!(err.schema_path(), Some("/schemas/missing.json"));
        assert_eq!(err.failing_index(), None);
    }
}
