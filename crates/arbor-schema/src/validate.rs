//! # Validation Engine
//!
//! Recursive descent over a value tree and a schema tree. Each schema node
//! is a keyword-indexed map; keyword families are evaluated in a fixed
//! order, and some families stop evaluation of the node:
//!
//! 1. `$ref`: full substitution by the resolved schema. Circular and
//!    unresolved references are recorded and stop the node.
//! 2. `if` / `then` / `else`
//! 3. `oneOf`
//! 4. `const`: a mismatch stops the node.
//! 5. `enum`
//! 6. `type`: a mismatch stops the node.
//! 7. string constraints
//! 8. number constraints
//! 9. object constraints
//! 10. array constraints
//! 11. `allOf`
//! 12. `anyOf`
//! 13. `not`
//!
//! ## Error accumulation
//!
//! Findings go into one output list threaded through the recursion by
//! `&mut`. Predicate-only evaluations (`if`, `oneOf`, `anyOf`, `not`) use a
//! fresh local list that is dropped once the keyword has its answer, so
//! their failures never reach the caller.
//!
//! ## Root tracking
//!
//! `$ref` pointers resolve against the schema passed to the top-level call,
//! and kept for the whole walk, never against the node
//! that contains the reference.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};

use crate::constraints::{self, compile_pattern};
use crate::document;
use crate::equality::deep_equal;
use crate::error::{SchemaError, ValidationResult, Violation, ViolationKind};
use crate::path::InstancePath;
use crate::registry::SchemaRegistry;
use crate::resolver::{self, RefTrail};
use crate::types::{matches_type, ValueType};

/// Validate `value` against `schema` with no registered schemas. Only
/// structural `$ref` pointers into `schema` can resolve.
pub fn validate(value: &Value, schema: &Value) -> ValidationResult {
    Evaluation::run(value, schema, &SchemaRegistry::new())
}

/// Entry point pairing a [`SchemaRegistry`] with the validation engine.
///
/// ## Thread Safety
///
/// Validation takes `&self`, so one validator can serve concurrent
/// validations. Registration takes `&mut self` and therefore cannot race
/// with them.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    registry: SchemaRegistry,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already populated registry.
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Add or overwrite the schema stored under `id`.
    pub fn register(&mut self, id: impl Into<String>, schema: Value) {
        self.registry.register(id, schema);
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Validate `value` against `schema`, which becomes the root for
    /// structural `$ref` pointers. Registered schemas serve external ids.
    pub fn validate(&self, value: &Value, schema: &Value) -> ValidationResult {
        Evaluation::run(value, schema, &self.registry)
    }

    /// Validate `value` against the schema registered under `id`, using that
    /// schema as the root.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaNotFound`] if `id` is not registered.
    pub fn validate_registered(&self, value: &Value, id: &str) -> Result<ValidationResult, SchemaError> {
        let schema = self
            .registry
            .lookup(id)
            .ok_or_else(|| SchemaError::SchemaNotFound { id: id.to_string() })?;
        Ok(self.validate(value, schema))
    }

    /// Load a JSON or YAML document from `path` and validate it against the
    /// schema registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DocumentLoad`] if the document cannot be read
    /// or parsed, [`SchemaError::SchemaNotFound`] if `id` is unknown, and
    /// [`SchemaError::ValidationFailed`] if the document does not conform.
    pub fn validate_file(&self, path: &Path, id: &str) -> Result<(), SchemaError> {
        let value = document::load_document(path)?;
        self.validate_registered(&value, id)?
            .into_result(format!("{id} ({})", path.display()))
    }
}

/// State shared by every frame of one top-level validation call.
struct Evaluation<'s> {
    /// The schema the top-level call started from.
    root: &'s Value,
    registry: &'s SchemaRegistry,
}

impl<'s> Evaluation<'s> {
    fn run(value: &Value, schema: &'s Value, registry: &'s SchemaRegistry) -> ValidationResult {
        let evaluation = Evaluation {
            root: schema,
            registry,
        };
        let mut errors = Vec::new();
        evaluation.check(value, schema, &InstancePath::root(), &RefTrail::empty(), &mut errors);
        ValidationResult::from_errors(errors)
    }

    /// Evaluate into a throwaway list and report whether it stayed empty.
    fn passes(&self, value: &Value, schema: &'s Value, path: &InstancePath, trail: &RefTrail<'_>) -> bool {
        let mut scratch = Vec::new();
        self.check(value, schema, path, trail, &mut scratch);
        scratch.is_empty()
    }

    fn check(
        &self,
        value: &Value,
        schema: &'s Value,
        path: &InstancePath,
        trail: &RefTrail<'_>,
        out: &mut Vec<Violation>,
    ) {
        let node = match schema {
            Value::Object(node) => node,
            Value::Bool(true) => return,
            Value::Bool(false) => {
                out.push(Violation::new(path, ViolationKind::Constraint, "no value is allowed here"));
                return;
            }
            other => {
                out.push(Violation::new(
                    path,
                    ViolationKind::InvalidSchema,
                    format!("schema must be an object or boolean, found {}", ValueType::of(other)),
                ));
                return;
            }
        };

        if let Some(reference) = node.get("$ref") {
            self.check_ref(value, reference, path, trail, out);
            return;
        }

        self.check_conditional(value, node, path, trail, out);

        if let Some(Value::Array(options)) = node.get("oneOf") {
            let matched = options
                .iter()
                .filter(|option| self.passes(value, *option, path, trail))
                .count();
            if matched != 1 {
                out.push(Violation::new(
                    path,
                    ViolationKind::Combinator,
                    format!("value must match exactly one schema in oneOf, but matched {matched}"),
                ));
            }
        }

        if let Some(expected) = node.get("const") {
            if !deep_equal(value, expected) {
                out.push(Violation::new(
                    path,
                    ViolationKind::ValueMismatch,
                    format!("value does not equal const {expected}"),
                ));
                return;
            }
        }

        if let Some(Value::Array(options)) = node.get("enum") {
            if !options.iter().any(|option| deep_equal(value, option)) {
                out.push(Violation::new(
                    path,
                    ViolationKind::ValueMismatch,
                    format!("value is not one of the allowed values {}", Value::Array(options.clone())),
                ));
            }
        }

        if let Some(declared) = node.get("type") {
            if !matches_type(value, declared) {
                out.push(Violation::new(
                    path,
                    ViolationKind::TypeMismatch,
                    format!("expected type {declared}, found {}", ValueType::of(value)),
                ));
                return;
            }
        }

        match value {
            Value::String(s) => constraints::check_string(s, node, path, out),
            Value::Number(n) => constraints::check_number(n, node, path, out),
            Value::Object(map) => self.check_object(map, node, path, trail, out),
            Value::Array(items) => self.check_array(items, node, path, trail, out),
            Value::Null | Value::Bool(_) => {}
        }

        if let Some(Value::Array(members)) = node.get("allOf") {
            for member in members {
                self.check(value, member, path, trail, out);
            }
        }

        if let Some(Value::Array(options)) = node.get("anyOf") {
            if !options.iter().any(|option| self.passes(value, option, path, trail)) {
                out.push(Violation::new(
                    path,
                    ViolationKind::Combinator,
                    "value does not match any schema in anyOf",
                ));
            }
        }

        if let Some(negated) = node.get("not") {
            if self.passes(value, negated, path, trail) {
                out.push(Violation::new(
                    path,
                    ViolationKind::Combinator,
                    "value must not match the schema in not",
                ));
            }
        }
    }

    fn check_ref(
        &self,
        value: &Value,
        reference: &'s Value,
        path: &InstancePath,
        trail: &RefTrail<'_>,
        out: &mut Vec<Violation>,
    ) {
        let Some(token) = reference.as_str() else {
            out.push(Violation::new(
                path,
                ViolationKind::UnresolvedReference,
                format!("unresolved reference: $ref must be a string, found {reference}"),
            ));
            return;
        };

        if trail.contains(token) {
            out.push(Violation::new(
                path,
                ViolationKind::CircularReference,
                format!("circular reference: {token}"),
            ));
            return;
        }

        let Some(target) = resolver::resolve(token, self.root, self.registry) else {
            tracing::trace!(reference = token, path = %path, "reference did not resolve");
            out.push(Violation::new(
                path,
                ViolationKind::UnresolvedReference,
                format!("unresolved reference: {token}"),
            ));
            return;
        };

        self.check(value, target, path, &trail.with(token), out);
    }

    fn check_conditional(
        &self,
        value: &Value,
        node: &'s Map<String, Value>,
        path: &InstancePath,
        trail: &RefTrail<'_>,
        out: &mut Vec<Violation>,
    ) {
        let Some(condition) = node.get("if") else {
            return;
        };
        let branch = if self.passes(value, condition, path, trail) {
            node.get("then")
        } else {
            node.get("else")
        };
        if let Some(branch) = branch {
            self.check(value, branch, path, trail, out);
        }
    }

    fn check_object(
        &self,
        map: &Map<String, Value>,
        node: &'s Map<String, Value>,
        path: &InstancePath,
        trail: &RefTrail<'_>,
        out: &mut Vec<Violation>,
    ) {
        if let Some(Value::Array(required)) = node.get("required") {
            for key in required.iter().filter_map(Value::as_str) {
                if !map.contains_key(key) {
                    out.push(Violation::new(
                        &path.key(key),
                        ViolationKind::Constraint,
                        "Required property missing",
                    ));
                }
            }
        }

        let count = map.len() as u64;
        if let Some(min) = constraints::count_keyword(node, "minProperties") {
            if count < min {
                out.push(Violation::new(
                    path,
                    ViolationKind::Constraint,
                    format!("object has {count} properties, fewer than minProperties {min}"),
                ));
            }
        }
        if let Some(max) = constraints::count_keyword(node, "maxProperties") {
            if count > max {
                out.push(Violation::new(
                    path,
                    ViolationKind::Constraint,
                    format!("object has {count} properties, more than maxProperties {max}"),
                ));
            }
        }

        let declared = node.get("properties").and_then(Value::as_object);
        if let Some(declared) = declared {
            for (key, subschema) in declared {
                if let Some(child) = map.get(key) {
                    self.check(child, subschema, &path.key(key), trail, out);
                }
            }
        }

        // Keys matched by at least one pattern are not "additional".
        let mut pattern_matched: HashSet<&str> = HashSet::new();
        if let Some(patterns) = node.get("patternProperties").and_then(Value::as_object) {
            for (pattern, subschema) in patterns {
                let re = match compile_pattern(pattern) {
                    Ok(re) => re,
                    Err(invalid) => {
                        out.push(invalid.at(path));
                        continue;
                    }
                };
                for (key, child) in map.iter().filter(|(key, _)| re.is_match(key)) {
                    pattern_matched.insert(key.as_str());
                    self.check(child, subschema, &path.key(key), trail, out);
                }
            }
        }

        let Some(additional) = node.get("additionalProperties") else {
            return;
        };
        let extra = map.iter().filter(|(key, _)| {
            !declared.is_some_and(|d| d.contains_key(key.as_str()))
                && !pattern_matched.contains(key.as_str())
        });
        for (key, child) in extra {
            match additional {
                Value::Bool(false) => out.push(Violation::new(
                    &path.key(key),
                    ViolationKind::Constraint,
                    "Additional property not allowed",
                )),
                Value::Bool(true) => {}
                subschema => self.check(child, subschema, &path.key(key), trail, out),
            }
        }
    }

    fn check_array(
        &self,
        items: &[Value],
        node: &'s Map<String, Value>,
        path: &InstancePath,
        trail: &RefTrail<'_>,
        out: &mut Vec<Violation>,
    ) {
        let count = items.len() as u64;
        if let Some(min) = constraints::count_keyword(node, "minItems") {
            if count < min {
                out.push(Violation::new(
                    path,
                    ViolationKind::Constraint,
                    format!("array has {count} items, fewer than minItems {min}"),
                ));
            }
        }
        if let Some(max) = constraints::count_keyword(node, "maxItems") {
            if count > max {
                out.push(Violation::new(
                    path,
                    ViolationKind::Constraint,
                    format!("array has {count} items, more than maxItems {max}"),
                ));
            }
        }

        if node.get("uniqueItems").and_then(Value::as_bool) == Some(true) {
            // Pairwise structural comparison; one finding per repeated item.
            for (j, later) in items.iter().enumerate() {
                if let Some(i) = items[..j].iter().position(|earlier| deep_equal(earlier, later)) {
                    out.push(Violation::new(
                        path,
                        ViolationKind::Constraint,
                        format!("array items at index {i} and {j} are equal, but uniqueItems is set"),
                    ));
                }
            }
        }

        match node.get("items") {
            Some(Value::Array(positional)) => {
                for (index, (item, subschema)) in items.iter().zip(positional).enumerate() {
                    self.check(item, subschema, &path.index(index), trail, out);
                }
            }
            Some(subschema) => {
                for (index, item) in items.iter().enumerate() {
                    self.check(item, subschema, &path.index(index), trail, out);
                }
            }
            None => {}
        }
    }
}
