//! Per-entity configuration for the generic endpoint

use crudcheck_api_types::EntityId;
use serde::de::DeserializeOwned;

/// Default substring a successful delete message must contain
pub const DEFAULT_DELETE_CONFIRMATION: &str = "deleted successfully";

/// Shared envelope schema every response is checked against first
pub const ENVELOPE_SCHEMA: &str = "/schemas/envelope-schema.json";

/// Shared schema for the `data` object of paginated responses
pub const PAGE_SCHEMA: &str = "/schemas/page-schema.json";

/// A resource the backend creates and returns
pub trait Entity: DeserializeOwned {
    /// Primary key assigned by the backend, if present in the response
    fn id(&self) -> Option<EntityId>;
}

/// Schema paths and naming for one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Human-readable name used in logs and errors
    pub name: String,
    /// Collection path, e.g. `/api/authors`
    pub collection_path: String,
    pub wrapper_schema: String,
    /// Schema for the `data` of single-entity responses
    pub item_schema: String,
    /// Schema for the `data` of paginated responses
    pub page_schema: String,
    /// Schema for each element of `data.content`; unchecked when `None`
    pub content_schema: Option<String>,
    pub delete_confirmation: String,
}

impl EntityDescriptor {
    /// Descriptor using the shared envelope and page schemas
    pub fn new(
        name: impl Into<String>,
        collection_path: impl Into<String>,
        item_schema: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            collection_path: collection_path.into(),
            wrapper_schema: ENVELOPE_SCHEMA.to_string(),
            item_schema: item_schema.into(),
            page_schema: PAGE_SCHEMA.to_string(),
            content_schema: None,
            delete_confirmation: DEFAULT_DELETE_CONFIRMATION.to_string(),
        }
    }

    pub fn with_wrapper_schema(mut self, schema: impl Into<String>) -> Self {
        self.wrapper_schema = schema.into();
        self
    }

    pub fn with_page_schema(mut self, schema: impl Into<String>) -> Self {
        self.page_schema = schema.into();
        self
    }

    /// Validate every element of `data.content` against `schema`
    pub fn with_content_schema(mut self, schema: impl Into<String>) -> Self {
        self.content_schema = Some(schema.into());
        self
    }

    pub fn with_delete_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.delete_confirmation = confirmation.into();
        self
    }

    /// Item path template for this entity's collection
    pub fn item_path(&self) -> String {
        item_template(&self.collection_path)
    }
}

/// Turn a collection path into an `{id}` item template
///
/// A path that already carries the placeholder is returned unchanged.
pub fn item_template(endpoint: &str) -> String {
    if endpoint.contains("{id}") {
        endpoint.to_string()
    } else {
        format!("{}/{{id}}", endpoint.trim_end_matches('/'))
    }
}
