//! # Document Loading
//!
//! Reads JSON or YAML files into the `serde_json::Value` trees the engine
//! operates on. The format is chosen by file extension.

use std::path::Path;

use serde_json::{Number, Value};
use serde_yaml::Value as YamlValue;

use crate::error::SchemaError;

/// Serialized form of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from the file extension: `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Load a document from `path`. Files without a recognised extension are
/// parsed as JSON.
///
/// # Errors
///
/// Returns [`SchemaError::DocumentLoad`] if the file cannot be read or
/// parsed.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value, SchemaError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    let format = DocumentFormat::from_path(path).unwrap_or(DocumentFormat::Json);
    parse_document(&content, format).map_err(|reason| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    })
}

/// Parse document text in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}")),
        DocumentFormat::Yaml => {
            let yaml = serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
            from_yaml(yaml)
        }
    }
}

// YAML is a superset of the JSON data model. Tags are dropped, scalar map
// keys become strings; other keys and non-finite floats are rejected.
fn from_yaml(yaml: YamlValue) -> Result<Value, String> {
    Ok(match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => Value::Number(json_number(&n)?),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => {
            Value::Array(items.into_iter().map(from_yaml).collect::<Result<_, _>>()?)
        }
        YamlValue::Mapping(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| Ok((json_key(key)?, from_yaml(value)?)))
                .collect::<Result<_, String>>()?,
        ),
        YamlValue::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn json_number(n: &serde_yaml::Number) -> Result<Number, String> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| format!("YAML number {n} has no JSON representation"))
}

fn json_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => Err(format!("YAML map key {other:?} is not a scalar")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("dir/a.yaml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.toml")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn yaml_converts_to_json_tree() {
        let yaml_str = r#"
user:
  name: ada
  age: 36
  ratio: 0.5
  admin: false
  tags:
    - one
    - two
  nothing: ~
"#;
        let value = parse_document(yaml_str, DocumentFormat::Yaml).unwrap();
        assert_eq!(
            value,
            json!({"user": {
                "name": "ada",
                "age": 36,
                "ratio": 0.5,
                "admin": false,
                "tags": ["one", "two"],
                "nothing": null
            }})
        );
    }

    #[test]
    fn yaml_scalar_keys_are_stringified() {
        let value = parse_document("1: a\ntrue: b\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(value, json!({"1": "a", "true": "b"}));
    }

    #[test]
    fn invalid_json_reports_reason() {
        let err = parse_document("{", DocumentFormat::Json).unwrap_err();
        assert!(err.starts_with("invalid JSON"));
    }

    #[test]
    fn load_document_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"city": "Lisbon"}"#).unwrap();
        assert_eq!(load_document(&path).unwrap(), json!({"city": "Lisbon"}));
    }

    #[test]
    fn load_document_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SchemaError::DocumentLoad { .. }));
    }

    #[test]
    fn yaml_tags_are_dropped() {
        let value = parse_document("when: !date 2024-01-01\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(value, json!({"when": "2024-01-01"}));
    }

    #[test]
    fn yaml_without_json_counterpart_is_rejected() {
        assert!(parse_document("? [a, b]\n: c\n", DocumentFormat::Yaml).is_err());
        assert!(parse_document("x: .nan\n", DocumentFormat::Yaml).is_err());
    }
}
