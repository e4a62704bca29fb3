//! # Schema Registry
//!
//! A keyed store of schema documents addressed by externally assigned ids.
//! `$ref` tokens that are not structural pointers are looked up here.
//!
//! Registration does not inspect the schema's shape, and the last
//! registration for an id wins. The registry is read-only during
//! validation, so a shared `&SchemaRegistry` may serve concurrent
//! validations as long as nobody registers meanwhile.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::document;
use crate::error::SchemaError;

/// Map from schema id to schema document.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite the schema stored under `id`. Returns the schema
    /// previously registered under that id, if any.
    pub fn register(&mut self, id: impl Into<String>, schema: Value) -> Option<Value> {
        let id = id.into();
        let previous = self.schemas.insert(id.clone(), schema);
        if previous.is_some() {
            tracing::debug!(schema_id = %id, "replaced registered schema");
        }
        previous
    }

    /// Look up a registered schema.
    pub fn lookup(&self, id: &str) -> Option<&Value> {
        self.schemas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered ids, sorted alphabetically.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Register every `*.json`, `*.yaml` and `*.yml` file directly inside
    /// `dir`.
    ///
    /// Each document is registered under its file name and, when it carries
    /// a string `$id`, under that id as well. Returns the number of files
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoad`] if the directory cannot be read
    /// or a file cannot be parsed.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, SchemaError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| SchemaError::SchemaLoad {
            schema_name: dir.display().to_string(),
            reason: format!("cannot read schema directory: {e}"),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && document::DocumentFormat::from_path(&path).is_some() {
                paths.push(path);
            }
        }
        // Deterministic order so `$id` collisions resolve the same way every run.
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        tracing::debug!(dir = %dir.display(), loaded = paths.len(), "loaded schema directory");
        Ok(paths.len())
    }

    /// Register a single schema file under its file name and its `$id`.
    /// Returns the file name it was registered under.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<String, SchemaError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| SchemaError::SchemaLoad {
                schema_name: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;

        let schema = document::load_document(path).map_err(|e| SchemaError::SchemaLoad {
            schema_name: name.clone(),
            reason: e.to_string(),
        })?;

        if let Some(id) = schema.get("$id").and_then(Value::as_str) {
            self.register(id, schema.clone());
        }
        self.register(name.clone(), schema);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_returns_registered_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register("addr", json!({"type": "object"}));
        assert_eq!(registry.lookup("addr"), Some(&json!({"type": "object"})));
        assert!(registry.lookup("person").is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.register("x", json!({"type": "string"})).is_none());
        let previous = registry.register("x", json!({"type": "number"}));
        assert_eq!(previous, Some(json!({"type": "string"})));
        assert_eq!(registry.lookup("x"), Some(&json!({"type": "number"})));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registration_accepts_any_shape() {
        let mut registry = SchemaRegistry::new();
        registry.register("weird", json!([1, 2, 3]));
        assert!(registry.contains("weird"));
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.register("b", json!({}));
        registry.register("a", json!({}));
        registry.register("c", json!({}));
        assert_eq!(registry.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn load_dir_registers_by_file_name_and_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("address.schema.json"),
            r#"{"$id": "https://example.org/address", "type": "object"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("tag.yaml"), "type: string\nminLength: 1\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "not a schema").unwrap();

        let mut registry = SchemaRegistry::new();
        let loaded = registry.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 2);
        assert!(registry.contains("address.schema.json"));
        assert!(registry.contains("https://example.org/address"));
        assert_eq!(registry.lookup("tag.yaml"), Some(&json!({"type": "string", "minLength": 1})));
        assert!(!registry.contains("README.md"));
    }

    #[test]
    fn load_dir_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let mut registry = SchemaRegistry::new();
        let err = registry.load_dir(dir.path()).unwrap_err();
        assert!(
            matches!(err, SchemaError::SchemaLoad { ref schema_name, .. } if schema_name == "broken.json"),
            "Expected SchemaLoad for broken.json, got: {err}"
        );
    }

    #[test]
    fn load_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SchemaRegistry::new();
        let err = registry.load_dir(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoad { .. }));
    }
}
