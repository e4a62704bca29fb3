//! # Validate Subcommand
//!
//! Validates one or more JSON/YAML documents against a single schema. The
//! schema is either a file (used as the root for `#/...` pointers) or the id
//! of a registered schema.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use arbor_schema::{document, SchemaValidator, ValidationResult};

use crate::config::{Config, Registration};

/// Arguments for the `arbor validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema to validate against: a schema file or a registered schema id.
    #[arg(long, short = 's', value_name = "PATH|ID")]
    pub schema: String,

    /// Register every schema file in this directory (repeatable).
    #[arg(long = "schema-dir", value_name = "DIR")]
    pub schema_dirs: Vec<PathBuf>,

    /// Register a schema file under an id (repeatable).
    #[arg(long = "register", value_name = "ID=PATH")]
    pub registrations: Vec<Registration>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Documents to validate.
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Validation outcome for one document.
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub document: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every document is valid, 1 otherwise.
/// Operational failures are returned as errors.
pub fn run_validate(args: &ValidateArgs, config: &Config) -> Result<u8> {
    let validator = config.build_validator(&args.schema_dirs, &args.registrations)?;
    let schema = load_schema(&validator, &args.schema)?;

    let reports = validate_documents(&validator, &schema, &args.documents)?;
    let failed = reports.iter().filter(|r| !r.result.is_valid()).count();

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&reports)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("failed to serialize report")?
        ),
    }

    tracing::info!(documents = reports.len(), failed, "validation finished");
    Ok(if failed > 0 { 1 } else { 0 })
}

/// Resolve the `--schema` argument: an existing file wins over a registered
/// id of the same spelling.
fn load_schema(validator: &SchemaValidator, schema: &str) -> Result<Value> {
    let path = Path::new(schema);
    if path.is_file() {
        return document::load_document(path)
            .with_context(|| format!("failed to load schema {}", path.display()));
    }
    validator
        .registry()
        .lookup(schema)
        .cloned()
        .with_context(|| format!("'{schema}' is neither a schema file nor a registered schema id"))
}

/// Validate each document in order.
pub fn validate_documents(
    validator: &SchemaValidator,
    schema: &Value,
    documents: &[PathBuf],
) -> Result<Vec<DocumentReport>> {
    documents
        .iter()
        .map(|path| -> Result<DocumentReport> {
            let value = document::load_document(path)
                .with_context(|| format!("failed to load document {}", path.display()))?;
            let result = validator.validate(&value, schema);
            tracing::debug!(document = %path.display(), violations = result.len(), "validated document");
            Ok(DocumentReport {
                document: path.display().to_string(),
                result,
            })
        })
        .collect()
}

/// Human-readable report: one `OK`/`FAIL` line per document followed by
/// its violations, then a summary line.
pub fn render_text(reports: &[DocumentReport]) -> String {
    let mut out = String::new();
    let mut passed = 0usize;
    for report in reports {
        if report.result.is_valid() {
            passed += 1;
            out.push_str(&format!("OK:   {}\n", report.document));
        } else {
            out.push_str(&format!(
                "FAIL: {} ({} violation(s))\n{}\n",
                report.document,
                report.result.len(),
                report.result
            ));
        }
    }
    out.push_str(&format!("\nDocuments: {passed}/{} passed\n", reports.len()));
    out
}
