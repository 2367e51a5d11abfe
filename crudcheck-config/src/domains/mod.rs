//! Domain-specific configuration modules

pub mod cleanup;
pub mod http;
pub mod logging;
pub mod schemas;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Complete harness configuration combining all domains
///
/// Built once per test run (or per test) and passed by reference into the
/// components that need it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// HTTP transport configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Schema store configuration
    #[serde(default)]
    pub schemas: schemas::SchemaConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Teardown and diagnostics configuration
    #[serde(default)]
    pub cleanup: cleanup::CleanupConfig,
}

impl HarnessConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.http.validate()?;
        self.schemas.validate()?;
        self.logging.validate()?;
        self.cleanup.validate()?;
        Ok(())
    }

    /// Configuration pointed at `base_url` with every other domain defaulted
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.http.base_url = base_url.into();
        config
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = HarnessConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
