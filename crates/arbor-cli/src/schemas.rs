//! # Schemas Subcommand
//!
//! Lists the schema ids available to `$ref` after loading the configuration
//! and command-line sources.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use arbor_schema::SchemaValidator;

use crate::config::{Config, Registration};

/// Arguments for the `arbor schemas` subcommand.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    /// Register every schema file in this directory (repeatable).
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dirs: Vec<PathBuf>,

    /// Register a schema file under an id (repeatable).
    #[arg(long = "register", value_name = "ID=PATH")]
    pub registrations: Vec<Registration>,
}

/// Execute the schemas subcommand. Always returns exit code 0.
pub fn run_schemas(args: &SchemasArgs, config: &Config) -> Result<u8> {
    let validator = config.build_validator(&args.schema_dirs, &args.registrations)?;
    print!("{}", render_ids(&validator));
    Ok(0)
}

fn render_ids(validator: &SchemaValidator) -> String {
    let registry = validator.registry();
    let mut out = String::new();
    for id in registry.ids() {
        out.push_str(id);
        out.push('\n');
    }
    out.push_str(&format!("\nSchemas: {}\n", registry.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_listed_sorted() {
        let mut validator = SchemaValidator::new();
        validator.register("b", json!({}));
        validator.register("a", json!({}));
        assert_eq!(render_ids(&validator), "a\nb\n\nSchemas: 2\n");
    }

    #[test]
    fn run_schemas_with_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.json"), "{}").unwrap();
        let args = SchemasArgs {
            schema_dirs: vec![dir.path().to_path_buf()],
            registrations: Vec::new(),
        };
        assert_eq!(run_schemas(&args, &Config::default()).unwrap(), 0);
    }
}
