//! Explicit decode strategies for response bodies
//!
//! The JSON of an item response and a page response look alike at the top
//! level, so the expected shape is always passed in by the caller instead of
//! being guessed from the body.

use crudcheck_api_types::{Envelope, Page, Void};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;
use std::marker::PhantomData;

/// How to turn a response body into a typed value
pub trait ResponseShape {
    type Output;

    /// Name used in decode error messages
    fn name(&self) -> &'static str;

    fn decode_value(&self, value: JsonValue) -> Result<Self::Output, serde_json::Error>;

    fn decode(&self, body: &str) -> Result<Self::Output, serde_json::Error> {
        let value: JsonValue = serde_json::from_str(body)?;
        self.decode_value(value)
    }
}

/// `Envelope<T>` around a single entity
pub struct ItemShape<T>(PhantomData<fn() -> T>);

/// `Envelope<Page<T>>` around one page of entities
pub struct PageShape<T>(PhantomData<fn() -> T>);

/// `Envelope<Void>` for responses whose payload is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidShape;

/// Lenient `Envelope<JsonValue>` for negative-path responses
///
/// Never fails: a body that is not an envelope becomes
/// `Envelope::failure(<raw body>)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorShape;

impl<T> ItemShape<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> PageShape<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

macro_rules! marker_impls {
    ($shape:ident) => {
        impl<T> Default for $shape<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $shape<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $shape<T> {}

        impl<T> fmt::Debug for $shape<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($shape))
            }
        }
    };
}

marker_impls!(ItemShape);
marker_impls!(PageShape);

impl<T: DeserializeOwned> ResponseShape for ItemShape<T> {
    type Output = Envelope<T>;

    fn name(&self) -> &'static str {
        "Envelope<T>"
    }

    fn decode_value(&self, value: JsonValue) -> Result<Self::Output, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl<T: DeserializeOwned> ResponseShape for PageShape<T> {
    type Output = Envelope<Page<T>>;

    fn name(&self) -> &'static str {
        "Envelope<Page<T>>"
    }

    fn decode_value(&self, value: JsonValue) -> Result<Self::Output, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl ResponseShape for VoidShape {
    type Output = Envelope<Void>;

    fn name(&self) -> &'static str {
        "Envelope<Void>"
    }

    fn decode_value(&self, value: JsonValue) -> Result<Self::Output, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl ResponseShape for ErrorShape {
    type Output = Envelope<JsonValue>;

    fn name(&self) -> &'static str {
        "Envelope<Value>"
    }

    fn decode_value(&self, value: JsonValue) -> Result<Self::Output, serde_json::Error> {
        match serde_json::from_value(value.clone()) {
            Ok(envelope) => Ok(envelope),
            Err(_) => Ok(Envelope::failure(value.to_string())),
        }
    }

    fn decode(&self, body: &str) -> Result<Self::Output, serde_json::Error> {
        match serde_json::from_str::<JsonValue>(body) {
            Ok(value) => self.decode_value(value),
            Err(_) => Ok(Envelope::failure(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Author {
        id: i64,
        name: String,
    }

    #[test]
    fn test_item_and_page_shapes() {
        let item = ItemShape::<Author>::new()
            .decode(r#"{"success":true,"message":null,"data":{"id":1,"name":"Ada"}}"#)
            .unwrap();
        assert_eq!(
            item.data,
            Some(Author {
                id: 1,
                name: "Ada".to_string()
            })
        );

        let page = PageShape::<Author>::new()
            .decode_value(json!({
                "success": true,
                "data": {
                    "content": [{"id": 1, "name": "Ada"}],
                    "number": 0, "size": 5, "totalElements": 1, "totalPages": 1,
                    "first": true, "last": true
                }
            }))
            .unwrap();
        assert_eq!(page.into_data().unwrap().total_elements, 1);
    }

    #[test]
    fn test_item_shape_rejects_page_body() {
        let err = ItemShape::<Author>::new()
            .decode(r#"{"success":true,"data":{"content":[],"number":0}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_void_shape_ignores_payload() {
        let envelope = VoidShape
            .decode(r#"{"success":true,"message":"Author deleted successfully","data":{"id":3}}"#)
            .unwrap();
        assert!(envelope.success);
        assert!(envelope.message_contains("deleted successfully"));
    }

    #[test]
    fn test_error_shape_is_lenient() {
        let envelope = ErrorShape
            .decode(r#"{"success":false,"message":"Author not found"}"#)
            .unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Author not found"));

        let raw = ErrorShape.decode("<html>502 Bad Gateway</html>").unwrap();
        assert!(!raw.success);
        assert_eq!(raw.message.as_deref(), Some("<html>502 Bad Gateway</html>"));
        assert!(raw.data.is_none());

        let not_envelope = ErrorShape.decode(r#"["unexpected"]"#).unwrap();
        assert!(!not_envelope.success);
        assert_eq!(not_envelope.message.as_deref(), Some(r#"["unexpected"]"#));
    }
}
