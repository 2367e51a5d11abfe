//! Compiling schemas and validating single documents

use crate::error::{SchemaError, SchemaResult, ValidationLevel};
use crate::loader::{FsSchemaLoader, SchemaLoader};
use crudcheck_config::SchemaConfig;
use jsonschema::Validator;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Upper bound on error messages kept per validation failure
const MAX_REPORTED_ERRORS: usize = 10;

/// Validates JSON documents against schemas resolved by a [`SchemaLoader`]
pub struct SchemaValidator {
    loader: Arc<dyn SchemaLoader>,
    cache: Option<Mutex<HashMap<String, Arc<Validator>>>>,
}

impl SchemaValidator {
    /// Validator with compiled-schema caching enabled
    pub fn new(loader: Arc<dyn SchemaLoader>) -> Self {
        Self {
            loader,
            cache: Some(Mutex::new(HashMap::new())),
        }
    }

    /// Validator that loads and compiles the schema on every call
    pub fn without_cache(loader: Arc<dyn SchemaLoader>) -> Self {
        Self {
            loader,
            cache: None,
        }
    }

    /// Filesystem-backed validator built from configuration
    pub fn from_config(config: &SchemaConfig) -> Self {
        let loader: Arc<dyn SchemaLoader> = Arc::new(FsSchemaLoader::new(config.root.clone()));
        if config.cache_compiled {
            Self::new(loader)
        } else {
            Self::without_cache(loader)
        }
    }

    /// Load and compile `path`, consulting the cache first
    pub fn compiled(&self, path: &str) -> SchemaResult<Arc<Validator>> {
        if let Some(ref cache) = self.cache {
            let cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(validator) = cache.get(path) {
                return Ok(validator.clone());
            }
        }

        let schema = self.loader.load(path)?;
        let validator = jsonschema::validator_for(&schema)
            .map(Arc::new)
            .map_err(|e| SchemaError::lookup(path, format!("schema does not compile: {}", e)))?;
        debug!("Compiled schema {}", path);

        if let Some(ref cache) = self.cache {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(path.to_string(), validator.clone());
        }

        Ok(validator)
    }

    /// Validate a standalone document against `path`
    pub fn validate(&self, instance: &JsonValue, path: &str) -> SchemaResult<()> {
        self.validate_at(instance, path, ValidationLevel::Document, None)
    }

    pub(crate) fn validate_at(
        &self,
        instance: &JsonValue,
        path: &str,
        level: ValidationLevel,
        index: Option<usize>,
    ) -> SchemaResult<()> {
        let validator = self.compiled(path)?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .take(MAX_REPORTED_ERRORS)
            .map(|e| {
                let location = e.instance_path.to_string();
                if location.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", location, e)
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Validation {
                path: path.to_string(),
                level,
                index,
                errors,
            })
        }
    }

    /// Number of compiled schemas currently cached
    pub fn cached_schemas(&self) -> usize {
        self.cache
            .as_ref()
            .map(|cache| cache.lock().unwrap_or_else(PoisonError::into_inner).len())
            .unwrap_or(0)
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("loader", &self.loader)
            .field("cache_enabled", &self.cache.is_some())
            .field("cached_schemas", &self.cached_schemas())
            .finish()
    }
}
