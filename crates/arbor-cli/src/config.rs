//! # Configuration
//!
//! An optional YAML file naming the schemas to register before any command
//! runs:
//!
//! ```yaml
//! schema_dirs:
//!   - schemas
//! schemas:
//!   addr: shared/address.schema.json
//! ```
//!
//! Relative paths resolve against the directory containing the config
//! file. Directory entries are registered first, then explicit `schemas`
//! entries, then command-line `--schema-dir` and `--register` flags, so
//! later sources overwrite earlier ones for the same id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use arbor_schema::{document, SchemaRegistry, SchemaValidator};

/// Contents of an `arbor.yaml` configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories whose schema files are all registered.
    #[serde(default)]
    pub schema_dirs: Vec<PathBuf>,

    /// Explicit id to schema file mappings.
    #[serde(default)]
    pub schemas: BTreeMap<String, PathBuf>,
}

impl Config {
    /// Read and parse a configuration file, resolving its relative paths
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for dir in &mut config.schema_dirs {
            *dir = crate::resolve_path(dir, base);
        }
        for file in config.schemas.values_mut() {
            *file = crate::resolve_path(file, base);
        }

        tracing::debug!(
            config = %path.display(),
            schema_dirs = config.schema_dirs.len(),
            schemas = config.schemas.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Build a validator from this configuration plus command-line sources.
    pub fn build_validator(
        &self,
        extra_dirs: &[PathBuf],
        registrations: &[Registration],
    ) -> Result<SchemaValidator> {
        let mut registry = SchemaRegistry::new();

        for dir in self.schema_dirs.iter().chain(extra_dirs) {
            let loaded = registry
                .load_dir(dir)
                .with_context(|| format!("failed to load schema directory {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), loaded, "registered schema directory");
        }

        let explicit = self
            .schemas
            .iter()
            .map(|(id, path)| (id.as_str(), path.as_path()))
            .chain(registrations.iter().map(|r| (r.id.as_str(), r.path.as_path())));
        for (id, path) in explicit {
            let schema = document::load_document(path)
                .with_context(|| format!("failed to load schema '{id}'"))?;
            registry.register(id, schema);
        }

        tracing::info!(schema_count = registry.len(), "loaded schema registry");
        Ok(SchemaValidator::with_registry(registry))
    }
}

/// A command-line `ID=PATH` schema registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: String,
    pub path: PathBuf,
}

impl FromStr for Registration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((id, path)) if !id.is_empty() && !path.is_empty() => Ok(Self {
                id: id.to_string(),
                path: PathBuf::from(path),
            }),
            _ => Err(format!("expected ID=PATH, got '{s}'")),
        }
    }
}
