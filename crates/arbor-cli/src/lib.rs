//! # arbor-cli - Command-Line Host for arbor-schema
//!
//! Provides the `arbor` command-line interface. The validation engine
//! performs no I/O; this crate loads schemas and documents from disk,
//! registers them, and turns a `ValidationResult` into printed output and an
//! exit code.
//!
//! ## Subcommands
//!
//! - `arbor validate` - validate JSON/YAML documents against a schema file
//!   or a registered schema id.
//! - `arbor schemas` - list the ids available for `$ref` resolution.
//!
//! ```bash
//! arbor validate --schema person.schema.json --schema-dir schemas/ people/*.yaml
//! arbor validate --schema addr --register addr=address.json home.json
//! arbor --config arbor.yaml schemas
//! ```
//!
//! ## Exit codes
//!
//! `0` every document is valid, `1` at least one document has violations,
//! `2` operational error (unreadable file, unknown schema id).

pub mod config;
pub mod schemas;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned as-is; relative ones are joined onto `base`.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
