//! Resolving schema paths to documents

use crate::error::{SchemaError, SchemaResult};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves a logical schema path to a parsed JSON document
///
/// Any failure (unknown path, unreadable file, invalid JSON) must be reported
/// as [`SchemaError::Lookup`].
pub trait SchemaLoader: Send + Sync + Debug {
    fn load(&self, path: &str) -> SchemaResult<JsonValue>;
}

/// Loads schemas from a directory on disk
///
/// `/schemas/author-schema.json` and `author-schema.json` both resolve to
/// `<root>/author-schema.json`; other leading segments are kept, so
/// `/schemas/v2/book.json` resolves to `<root>/v2/book.json`.
#[derive(Debug, Clone)]
pub struct FsSchemaLoader {
    root: PathBuf,
}

impl FsSchemaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        let relative = relative.strip_prefix("schemas/").unwrap_or(relative);
        self.root.join(relative)
    }
}

impl SchemaLoader for FsSchemaLoader {
    fn load(&self, path: &str) -> SchemaResult<JsonValue> {
        let file = self.resolve(path);
        debug!("Loading schema {} from {}", path, file.display());

        let content = fs::read_to_string(&file).map_err(|e| {
            SchemaError::lookup(path, format!("failed to read '{}': {}", file.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SchemaError::lookup(path, format!("'{}' is not valid JSON: {}", file.display(), e))
        })
    }
}

/// Schemas registered in memory, keyed by their logical path
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaLoader {
    documents: HashMap<String, JsonValue>,
}

impl InMemorySchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, path: impl Into<String>, schema: JsonValue) -> Self {
        self.insert(path, schema);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, schema: JsonValue) {
        self.documents.insert(path.into(), schema);
    }
}

impl SchemaLoader for InMemorySchemaLoader {
    fn load(&self, path: &str) -> SchemaResult<JsonValue> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| SchemaError::lookup(path, "no schema registered under this path"))
    }
}
