//! # Error Types
//!
//! Two separate families live here:
//!
//! - [`Violation`] / [`ValidationResult`]: findings produced by a
//!   validation call. They are data, accumulated in discovery order and
//!   returned to the caller; the engine never fails with them.
//! - [`SchemaError`]: host-level failures such as unreadable schema files
//!   or an unknown registered schema id.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::path::InstancePath;

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A `$ref` token reappeared on its own resolution path.
    CircularReference,
    /// A `$ref` token resolved neither as a pointer nor through the registry.
    UnresolvedReference,
    /// The value's category does not satisfy the declared `type`.
    TypeMismatch,
    /// `oneOf`, `anyOf` or `not` was not satisfied.
    Combinator,
    /// A string, number, object or array constraint failed.
    Constraint,
    /// `const` or `enum` did not match.
    ValueMismatch,
    /// The schema node itself is malformed (non-map node, bad pattern).
    InvalidSchema,
}

/// A single finding: where it happened and what was wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Location of the offending value in the input tree.
    pub path: InstancePath,
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    pub fn new(path: &InstancePath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.path, self.message)
        }
    }
}

/// Outcome of a top-level validation call.
///
/// `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<Violation>,
}

impl ValidationResult {
    pub(crate) fn from_errors(errors: Vec<Violation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All findings, in discovery order.
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a `Result`, wrapping findings in
    /// [`SchemaError::ValidationFailed`] tagged with `schema_name`.
    pub fn into_result(self, schema_name: impl Into<String>) -> Result<(), SchemaError> {
        if self.valid {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema_name: schema_name.into(),
                result: self,
            })
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Host-level failure around a validation call.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{result}")]
    ValidationFailed {
        /// Name or id of the schema that was validated against.
        schema_name: String,
        /// The non-empty set of findings.
        result: ValidationResult,
    },

    /// No schema is registered under the requested id.
    #[error("schema '{id}' is not registered")]
    SchemaNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A schema file could not be loaded.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad {
        /// Schema file name or directory.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// A document file could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// IO error reading a schema or document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_includes_path() {
        let path = InstancePath::root().key("user").key("tags").index(2);
        let v = Violation::new(&path, ViolationKind::TypeMismatch, "expected string, found integer");
        let display = v.to_string();
        assert!(display.contains(".user.tags[2]"));
        assert!(display.contains("expected string"));
    }

    #[test]
    fn violation_display_root() {
        let v = Violation::new(&InstancePath::root(), ViolationKind::Combinator, "no match");
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn empty_result_is_valid() {
        let result = ValidationResult::from_errors(Vec::new());
        assert!(result.is_valid());
        assert!(result.is_empty());
        assert!(result.into_result("s").is_ok());
    }

    #[test]
    fn failed_result_converts_to_validation_failed() {
        let v = Violation::new(&InstancePath::root().key("city"), ViolationKind::Constraint, "Required property missing");
        let result = ValidationResult::from_errors(vec![v]);
        assert!(!result.is_valid());
        let err = result.into_result("addr").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("'addr'"));
        assert!(text.contains(".city: Required property missing"));
    }

    #[test]
    fn result_serializes_with_string_paths() {
        let v = Violation::new(&InstancePath::root().index(1), ViolationKind::ValueMismatch, "bad");
        let json = serde_json::to_value(ValidationResult::from_errors(vec![v])).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["path"], "[1]");
        assert_eq!(json["errors"][0]["kind"], "value_mismatch");
    }
}
