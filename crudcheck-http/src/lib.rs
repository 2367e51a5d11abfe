//! Request building and transport for crudcheck
//!
//! This crate provides:
//! - a fluent [`RequestBuilder`] producing immutable [`RequestSpec`]s
//! - the [`Transport`] contract the harness executes requests through
//! - a reqwest-backed transport and a scripted offline transport
//! - a per-instance [`DiagnosticSink`] holding the last request/response pair

pub mod builder;
pub mod diagnostics;
pub mod errors;
pub mod mock;
pub mod spec;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use builder::RequestBuilder;
pub use crudcheck_config::HttpConfig;
pub use diagnostics::{DiagnosticSink, RecordedExchange};
pub use errors::HttpError;
pub use mock::MockTransport;
pub use spec::{RawResponse, RequestSpec};
pub use transport::{ReqwestTransport, Transport};
pub use types::{HttpMethod, HttpMethodError};
