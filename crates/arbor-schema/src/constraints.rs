//! Leaf keyword checks for strings and numbers.
//!
//! Each violated keyword appends one independent [`Violation`]. Keyword
//! values of the wrong shape (a non-numeric `minLength`, a non-string
//! `pattern`) are treated as absent. Integer bounds compare exactly against
//! integer values, so precision holds past 2^53.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::equality::{as_integer, compare_numbers};
use crate::error::{Violation, ViolationKind};
use crate::path::InstancePath;

/// `minLength`, `maxLength` and `pattern`. Length counts Unicode scalar
/// values.
pub fn check_string(s: &str, schema: &Map<String, Value>, path: &InstancePath, out: &mut Vec<Violation>) {
    let length = s.chars().count() as u64;

    if let Some(min) = count_keyword(schema, "minLength") {
        if length < min {
            out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("string length {length} is less than minLength {min}"),
            ));
        }
    }

    if let Some(max) = count_keyword(schema, "maxLength") {
        if length > max {
            out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("string length {length} is greater than maxLength {max}"),
            ));
        }
    }

    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        match compile_pattern(pattern) {
            Ok(re) if !re.is_match(s) => out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("string does not match pattern \"{pattern}\""),
            )),
            Ok(_) => {}
            Err(violation) => out.push(violation.at(path)),
        }
    }
}

/// `minimum`, `maximum`, `exclusiveMinimum`, `exclusiveMaximum` and
/// `multipleOf`.
///
/// Both exclusivity conventions are honoured together: a boolean
/// `exclusiveMinimum: true` makes `minimum` strict, and a numeric
/// `exclusiveMinimum` is its own strict bound. Same for the maximum side.
pub fn check_number(n: &Number, schema: &Map<String, Value>, path: &InstancePath, out: &mut Vec<Violation>) {
    if let Some(min) = number_keyword(schema, "minimum") {
        let exclusive = schema.get("exclusiveMinimum").and_then(Value::as_bool) == Some(true);
        match compare_numbers(n, min) {
            Some(Ordering::Less) => out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is less than minimum {min}"),
            )),
            Some(Ordering::Equal) if exclusive => out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is less than or equal to exclusive minimum {min}"),
            )),
            _ => {}
        }
    }

    if let Some(max) = number_keyword(schema, "maximum") {
        let exclusive = schema.get("exclusiveMaximum").and_then(Value::as_bool) == Some(true);
        match compare_numbers(n, max) {
            Some(Ordering::Greater) => out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is greater than maximum {max}"),
            )),
            Some(Ordering::Equal) if exclusive => out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is greater than or equal to exclusive maximum {max}"),
            )),
            _ => {}
        }
    }

    if let Some(bound) = number_keyword(schema, "exclusiveMinimum") {
        if matches!(compare_numbers(n, bound), Some(Ordering::Less | Ordering::Equal)) {
            out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is less than or equal to exclusive minimum {bound}"),
            ));
        }
    }

    if let Some(bound) = number_keyword(schema, "exclusiveMaximum") {
        if matches!(compare_numbers(n, bound), Some(Ordering::Greater | Ordering::Equal)) {
            out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is greater than or equal to exclusive maximum {bound}"),
            ));
        }
    }

    if let Some(divisor) = number_keyword(schema, "multipleOf") {
        if is_positive(divisor) && !is_multiple_of(n, divisor) {
            out.push(Violation::new(
                path,
                ViolationKind::Constraint,
                format!("{n} is not a multiple of {divisor}"),
            ));
        }
    }
}

/// A non-negative whole-number keyword value such as `minLength` or
/// `maxItems`. Integral floats (`3.0`) count; anything else is absent.
pub fn count_keyword(schema: &Map<String, Value>, keyword: &str) -> Option<u64> {
    let Value::Number(n) = schema.get(keyword)? else {
        return None;
    };
    if let Some(count) = n.as_u64() {
        return Some(count);
    }
    let f = n.as_f64()?;
    // Negative integers and fractions are not counts.
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn number_keyword<'s>(schema: &'s Map<String, Value>, keyword: &str) -> Option<&'s Number> {
    match schema.get(keyword)? {
        Value::Number(n) => Some(n),
        _ => None,
    }
}

fn is_positive(n: &Number) -> bool {
    match as_integer(n) {
        Some(i) => i > 0,
        None => n.as_f64().is_some_and(|f| f > 0.0),
    }
}

fn is_multiple_of(n: &Number, divisor: &Number) -> bool {
    if let (Some(x), Some(d)) = (as_integer(n), as_integer(divisor)) {
        return x % d == 0;
    }
    let (Some(x), Some(d)) = (n.as_f64(), divisor.as_f64()) else {
        return false;
    };
    let quotient = x / d;
    if !quotient.is_finite() {
        return false;
    }
    // Tolerate binary rounding, e.g. 0.3 / 0.1 == 2.9999999999999996.
    (quotient - quotient.round()).abs() < 1e-9
}

/// A pattern that failed to compile, reported against the value being
/// checked.
#[derive(Debug)]
pub struct InvalidPattern {
    pattern: String,
    reason: String,
}

impl InvalidPattern {
    pub fn at(&self, path: &InstancePath) -> Violation {
        Violation::new(
            path,
            ViolationKind::InvalidSchema,
            format!("invalid regular expression \"{}\": {}", self.pattern, self.reason),
        )
    }
}

/// Compile a schema pattern. Patterns are unanchored: they match anywhere
/// in the subject.
pub fn compile_pattern(pattern: &str) -> Result<Regex, InvalidPattern> {
    Regex::new(pattern).map_err(|e| InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
