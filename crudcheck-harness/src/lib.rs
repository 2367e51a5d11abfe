//! Black-box CRUD testing harness
//!
//! This crate provides:
//! - [`CrudEndpoint`], one generic endpoint serving every entity type
//! - explicit decode shapes for item, page, void and error responses
//! - [`EntityTracker`] for best-effort cleanup of created entities
//! - [`TestContext`], the per-test bundle of transport, validator and tracker

pub mod context;
pub mod endpoint;
pub mod entities;
pub mod entity;
pub mod error;
pub mod shape;
pub mod tracker;

// Re-export main types for convenience
pub use context::{TestContext, RUN_ID_HEADER};
pub use endpoint::{delete_tracked, CrudEndpoint};
pub use entities::{author_descriptor, book_descriptor, Author, AuthorRequest, Book, BookRequest};
pub use entity::{item_template, Entity, EntityDescriptor, DEFAULT_DELETE_CONFIRMATION};
pub use error::{ErrorKind, HarnessError, HarnessResult};
pub use shape::{ErrorShape, ItemShape, PageShape, ResponseShape, VoidShape};
pub use tracker::{CleanupReport, EntityTracker, TrackedEntity, TrackerState};

pub use crudcheck_api_types::{EntityId, Envelope, Page, PageQuery, Void};
pub use crudcheck_config::HarnessConfig;
