//! Response data model for crudcheck
//!
//! Every backend response is nested in an [`Envelope`]; list endpoints put a
//! [`Page`] inside that envelope. These types are what the harness decodes raw
//! response bodies into before handing typed data back to test code.

pub mod envelope;
pub mod ids;
pub mod pagination;

// Re-export main types for convenience
pub use envelope::{Envelope, Void};
pub use ids::EntityId;
pub use pagination::{Page, PageInvariantError, PageQuery};
