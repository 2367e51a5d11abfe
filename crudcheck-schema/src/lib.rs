//! JSON Schema validation for API responses
//!
//! Schemas are addressed by logical paths such as `/schemas/author-schema.json`
//! and resolved through an injected [`SchemaLoader`]. The [`SchemaValidator`]
//! compiles and caches them, and can validate a response envelope, its `data`
//! payload and every element of a paginated `content` array in one call.
//!
//! A schema that cannot be found or compiled is a [`SchemaError::Lookup`]:
//! the harness is misconfigured. A document that does not match a schema is a
//! [`SchemaError::Validation`]: the backend returned the wrong shape.

pub mod cascade;
pub mod error;
pub mod loader;
pub mod validator;

pub use cascade::CascadeOutcome;
pub use error::{SchemaError, SchemaResult, ValidationLevel};
pub use loader::{FsSchemaLoader, InMemorySchemaLoader, SchemaLoader};
pub use validator::SchemaValidator;
