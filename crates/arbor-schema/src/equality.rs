//! # Deep Equality
//!
//! Structural comparison over value trees. `serde_json::Value`'s own
//! `PartialEq` distinguishes `1` from `1.0` because it compares the number
//! representation; schema semantics compare numbers by value instead.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Structural equality: scalars by value, sequences index-wise, maps by
/// key set and per-key value. A sequence never equals a map, and `null`
/// equals only `null`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| deep_equal(x, y)))
        }
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    compare_numbers(x, y) == Some(Ordering::Equal)
}

/// Numeric ordering by value. Two integers compare exactly so large values
/// don't lose precision through `f64`; anything else compares as `f64`.
pub(crate) fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_integer(x), as_integer(y)) {
        return Some(a.cmp(&b));
    }
    x.as_f64()?.partial_cmp(&y.as_f64()?)
}

/// The exact integer value of `n`, if it was written as one.
pub(crate) fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}
