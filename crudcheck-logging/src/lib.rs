//! Logging initialization for crudcheck
//!
//! The harness logs through `tracing` everywhere; this crate only installs a
//! subscriber. Every initializer tolerates a subscriber that is already set,
//! since test binaries call it from many tests.

pub mod init;

pub use crudcheck_config::domains::logging::{LogFormat, LogLevel, LoggingConfig};
pub use init::{init_logging_from_config, init_simple_tracing, init_test_logging};
