//! Domain-driven configuration for crudcheck
//!
//! Configuration is built once, validated, and handed to the transport and
//! schema validator at construction time. Nothing in the harness reads
//! configuration from global state.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    cleanup::CleanupConfig, http::HttpConfig, logging::LoggingConfig, schemas::SchemaConfig,
    HarnessConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
