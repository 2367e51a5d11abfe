//! Multi-level validation of enveloped responses
//!
//! A response is checked against the wrapper schema, then its `data` payload
//! against the data schema, then (for pages) every element of
//! `data.content` against the content schema. Element checks stop at the
//! first failing element and report its index.

use crate::error::{SchemaResult, ValidationLevel};
use crate::validator::SchemaValidator;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Where a successful cascade stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// No data schema was requested; only the wrapper was checked
    WrapperOnly,
    /// `data` was absent or null
    NoData,
    /// `data` was an object; `content_elements` is set when a content
    /// schema was applied to a `content` array
    Object { content_elements: Option<usize> },
    /// `data` was a bare array whose elements were checked one by one
    Array { elements: usize },
    /// `data` was a scalar and was not checked
    SkippedScalar,
}

impl SchemaValidator {
    /// Validate `response` and its nested payload in one pass
    ///
    /// `data_schema` and `content_schema` are optional; omitting the content
    /// schema leaves page elements unchecked.
    pub fn validate_response_and_data(
        &self,
        response: &JsonValue,
        wrapper_schema: &str,
        data_schema: Option<&str>,
        content_schema: Option<&str>,
    ) -> SchemaResult<CascadeOutcome> {
        self.validate_at(response, wrapper_schema, ValidationLevel::Wrapper, None)?;

        let Some(data_schema) = data_schema else {
            return Ok(CascadeOutcome::WrapperOnly);
        };

        let data = match response.get("data") {
            None | Some(JsonValue::Null) => {
                debug!("Response has no data, stopping after wrapper schema");
                return Ok(CascadeOutcome::NoData);
            }
            Some(data) => data,
        };

        match data {
            JsonValue::Object(object) => {
                self.validate_at(data, data_schema, ValidationLevel::Data, None)?;

                let content_elements = match (content_schema, object.get("content")) {
                    (Some(content_schema), Some(JsonValue::Array(items))) => {
                        self.validate_elements(items, content_schema, ValidationLevel::Content)?;
                        Some(items.len())
                    }
                    _ => None,
                };

                Ok(CascadeOutcome::Object { content_elements })
            }
            JsonValue::Array(items) => {
                self.validate_elements(items, data_schema, ValidationLevel::Element)?;
                Ok(CascadeOutcome::Array {
                    elements: items.len(),
                })
            }
            other => {
                warn!(
                    "Skipping data validation against '{}': data is a scalar ({})",
                    data_schema, other
                );
                Ok(CascadeOutcome::SkippedScalar)
            }
        }
    }

    /// Serialize `response` to JSON, then run [`Self::validate_response_and_data`]
    pub fn validate_serializable<S: Serialize>(
        &self,
        response: &S,
        wrapper_schema: &str,
        data_schema: Option<&str>,
        content_schema: Option<&str>,
    ) -> SchemaResult<CascadeOutcome> {
        let value = serde_json::to_value(response)?;
        self.validate_response_and_data(&value, wrapper_schema, data_schema, content_schema)
    }

    fn validate_elements(
        &self,
        items: &[JsonValue],
        schema: &str,
        level: ValidationLevel,
    ) -> SchemaResult<()> {
        for (index, item) in items.iter().enumerate() {
            self.validate_at(item, schema, level, Some(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::loader::InMemorySchemaLoader;
    use serde_json::json;
    use std::sync::Arc;

    const WRAPPER: &str = "/schemas/envelope-schema.json";
    const PAGE: &str = "/schemas/page-schema.json";
    const AUTHOR: &str = "/schemas/author-schema.json";

    fn validator() -> SchemaValidator {
        let loader = InMemorySchemaLoader::new()
            .with_schema(
                WRAPPER,
                json!({
                    "type": "object",
                    "properties": {
                        "success": {"type": "boolean"},
                        "message": {"type": ["string", "null"]}
                    },
                    "required": ["success"]
                }),
            )
            .with_schema(
                PAGE,
                json!({
                    "type": "object",
                    "properties": {
                        "content": {"type": "array"},
                        "number": {"type": "integer", "minimum": 0},
                        "size": {"type": "integer", "minimum": 1}
                    },
                    "required": ["content", "number", "size"]
                }),
            )
            .with_schema(
                AUTHOR,
                json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string"}
                    },
                    "required": ["id", "name"]
                }),
            );
        SchemaValidator::new(Arc::new(loader))
    }

    fn page(content: JsonValue) -> JsonValue {
        json!({
            "success": true,
            "message": null,
            "data": {"content": content, "number": 0, "size": 5}
        })
    }

    #[test]
    fn test_wrapper_failure_is_reported_first() {
        let response = json!({"message": "no success flag", "data": {"id": "bad"}});
        let err = validator()
            .validate_response_and_data(&response, WRAPPER, Some(AUTHOR), None)
            .unwrap_err();

        match err {
            SchemaError::Validation { path, level, .. } => {
                assert_eq!(path, WRAPPER);
                assert_eq!(level, ValidationLevel::Wrapper);
            }
            other => panic!("Expected wrapper validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data_is_terminal() {
        let validator = validator();
        let delete_response = json!({"success": true, "message": "Author deleted successfully"});
        assert_eq!(
            validator
                .validate_response_and_data(&delete_response, WRAPPER, Some(AUTHOR), None)
                .unwrap(),
            CascadeOutcome::NoData
        );

        let null_data = json!({"success": true, "data": null});
        assert_eq!(
            validator
                .validate_response_and_data(&null_data, WRAPPER, Some(AUTHOR), None)
                .unwrap(),
            CascadeOutcome::NoData
        );

        assert_eq!(
            validator
                .validate_response_and_data(&null_data, WRAPPER, None, None)
                .unwrap(),
            CascadeOutcome::WrapperOnly
        );
    }

    #[test]
    fn test_object_data_validated() {
        let validator = validator();
        let ok = json!({"success": true, "data": {"id": 1, "name": "Ada"}});
        assert_eq!(
            validator
                .validate_response_and_data(&ok, WRAPPER, Some(AUTHOR), None)
                .unwrap(),
            CascadeOutcome::Object {
                content_elements: None
            }
        );

        let bad = json!({"success": true, "data": {"id": 1}});
        let err = validator
            .validate_response_and_data(&bad, WRAPPER, Some(AUTHOR), None)
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Validation {
                level: ValidationLevel::Data,
                index: None,
                ..
            }
        ));
    }

    #[test]
    fn test_page_content_elements_validated() {
        let response = page(json!([
            {"id": 1, "name": "Ada"},
            {"id": 2, "name": "Grace"},
            {"id": 3, "name": "Barbara"}
        ]));

        assert_eq!(
            validator()
                .validate_response_and_data(&response, WRAPPER, Some(PAGE), Some(AUTHOR))
                .unwrap(),
            CascadeOutcome::Object {
                content_elements: Some(3)
            }
        );
    }

    #[test]
    fn test_page_content_reports_first_failing_index() {
        let response = page(json!([
            {"id": 1, "name": "Ada"},
            {"id": 2, "name": 42},
            {"id": "three"}
        ]));

        let err = validator()
            .validate_response_and_data(&response, WRAPPER, Some(PAGE), Some(AUTHOR))
            .unwrap_err();

        assert_eq!(err.failing_index(), Some(1));
        match err {
            SchemaError::Validation {
                path,
                level,
                errors,
                ..
            } => {
                assert_eq!(path, AUTHOR);
                assert_eq!(level, ValidationLevel::Content);
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("/name"));
            }
            other => panic!("Expected content validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_page_content_unchecked_without_content_schema() {
        let response = page(json!([{"anything": true}, 17]));
        assert_eq!(
            validator()
                .validate_response_and_data(&response, WRAPPER, Some(PAGE), None)
                .unwrap(),
            CascadeOutcome::Object {
                content_elements: None
            }
        );
    }

    #[test]
    fn test_bare_array_elements_validated_against_data_schema() {
        let validator = validator();
        let ok = json!({"success": true, "data": [{"id": 1, "name": "Ada"}]});
        assert_eq!(
            validator
                .validate_response_and_data(&ok, WRAPPER, Some(AUTHOR), None)
                .unwrap(),
            CascadeOutcome::Array { elements: 1 }
        );

        let bad = json!({"success": true, "data": [{"id": 1, "name": "Ada"}, {"id": 2}]});
        let err = validator
            .validate_response_and_data(&bad, WRAPPER, Some(AUTHOR), None)
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Validation {
                level: ValidationLevel::Element,
                index: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn test_scalar_data_skipped() {
        let response = json!({"success": true, "data": 12});
        assert_eq!(
            validator()
                .validate_response_and_data(&response, WRAPPER, Some(AUTHOR), None)
                .unwrap(),
            CascadeOutcome::SkippedScalar
        );
    }

    #[test]
    fn test_missing_schema_is_lookup_not_validation() {
        let response = json!({"success": true, "data": {"id": 1, "name": "Ada"}});
        let err = validator()
            .validate_response_and_data(&response, WRAPPER, Some("/schemas/missing.json"), None)
            .unwrap_err();
        assert!(err.is_lookup());
        assert_eq!(err.schema_path(), Some("/schemas/missing.json"));
    }

    #[test]
    fn test_validate_serializable() {
        #[derive(Serialize)]
        struct Envelope {
            success: bool,
            data: Vec<u32>,
        }

        let outcome = validator()
            .validate_serializable(
                &Envelope {
                    success: true,
                    data: vec![],
                },
                WRAPPER,
                None,
                None,
            )
            .unwrap();
        assert_eq!(outcome, CascadeOutcome::WrapperOnly);
    }
}
