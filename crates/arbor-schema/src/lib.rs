//! # arbor-schema - Structural Validation Engine
//!
//! Checks an in-memory value tree (`serde_json::Value`) against a
//! JSON-Schema-like document and reports every violation with the path of
//! the offending value (`.user.tags[2]`).
//!
//! ## Components
//!
//! - [`equality`]: structural deep equality used by `const`, `enum` and
//!   `uniqueItems`.
//! - [`types`]: the closed set of value categories and `type` matching.
//! - [`registry`]: externally identified schema documents for `$ref`.
//! - [`resolver`]: `$ref` resolution against the root document or the
//!   registry, plus the per-branch trail used for cycle detection.
//! - [`validate`](mod@validate): the recursive engine and the [`SchemaValidator`] facade.
//!
//! ## Usage
//!
//! ```
//! use arbor_schema::SchemaValidator;
//! use serde_json::json;
//!
//! let mut validator = SchemaValidator::new();
//! validator.register("addr", json!({"type": "object", "required": ["city"]}));
//!
//! let result = validator.validate(&json!({}), &json!({"$ref": "addr"}));
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].path.to_string(), ".city");
//! ```
//!
//! ## Crate Policy
//!
//! - The engine performs no I/O; [`document`] and [`SchemaRegistry::load_dir`]
//!   are the only filesystem entry points.
//! - Validation findings are values ([`Violation`]), never Rust errors.
//!   [`SchemaError`] is reserved for host-level failures.
//! - Schemas are never mutated during validation.

pub mod constraints;
pub mod document;
pub mod equality;
pub mod error;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod validate;

pub use equality::deep_equal;
pub use error::{SchemaError, ValidationResult, Violation, ViolationKind};
pub use path::InstancePath;
pub use registry::SchemaRegistry;
pub use types::{matches_type, ValueType};
pub use validate::{validate, SchemaValidator};
