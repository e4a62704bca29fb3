//! # Type Classifier
//!
//! Maps a value to one of the closed set of schema value categories and
//! checks a schema's declared `type` against it.
//!
//! ## Invariants
//!
//! - `object` accepts maps only. Sequences and `null` are never objects.
//! - `integer` accepts any finite number without a fractional component;
//!   `number` accepts integers too.
//! - An unrecognized type name matches nothing.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A value category named by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    /// All categories, in declaration order.
    pub const ALL: [ValueType; 7] = [
        ValueType::Null,
        ValueType::Boolean,
        ValueType::Integer,
        ValueType::Number,
        ValueType::String,
        ValueType::Array,
        ValueType::Object,
    ];

    /// Parse a type name as it appears in a schema. Returns `None` for
    /// unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// The schema spelling of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }

    /// The most specific category of `value`. Whole numbers classify as
    /// [`ValueType::Integer`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) if is_integer(value) => ValueType::Integer,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Whether `value` belongs to this category.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ValueType::Null => value.is_null(),
            ValueType::Boolean => value.is_boolean(),
            ValueType::Integer => is_integer(value),
            ValueType::Number => value.is_number(),
            ValueType::String => value.is_string(),
            ValueType::Array => value.is_array(),
            // `Value::is_object` is true for maps only; null and arrays
            // are distinct variants.
            ValueType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

/// Check `value` against a declared `type`: either a single type name or a
/// sequence of names combined by logical OR. Any other shape, and any
/// unrecognized name, matches nothing.
pub fn matches_type(value: &Value, declared: &Value) -> bool {
    match declared {
        Value::String(name) => matches_name(value, name),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| matches_name(value, name)),
        _ => false,
    }
}

fn matches_name(value: &Value, name: &str) -> bool {
    ValueType::from_name(name).is_some_and(|t| t.accepts(value))
}
