//! Schema store configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where schema documents are loaded from
///
/// Schemas are addressed by logical paths like `/schemas/author-schema.json`;
/// the leading `/schemas/` segment is resolved against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Directory holding the schema documents
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Keep compiled schemas for the lifetime of the validator
    #[serde(default = "crate::domains::utils::default_true")]
    pub cache_compiled: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            cache_compiled: true,
        }
    }
}

impl Validatable for SchemaConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(self.validation_error("root cannot be empty"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "schemas"
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("schemas")
}
