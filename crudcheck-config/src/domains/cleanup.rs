//! Teardown and diagnostics configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Delete tracked entities on teardown
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    /// Substring a successful delete response message must contain
    #[serde(default = "default_delete_confirmation")]
    pub delete_confirmation: String,

    /// Number of request/response exchanges kept for failure reports
    #[serde(default = "default_diagnostic_history")]
    pub diagnostic_history: usize,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delete_confirmation: default_delete_confirmation(),
            diagnostic_history: default_diagnostic_history(),
        }
    }
}

impl Validatable for CleanupConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(
            &self.delete_confirmation,
            "delete_confirmation",
            self.domain_name(),
        )?;
        validate_positive(
            self.diagnostic_history,
            "diagnostic_history",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "cleanup"
    }
}

fn default_delete_confirmation() -> String {
    "deleted successfully".to_string()
}

fn default_diagnostic_history() -> usize {
    20
}
