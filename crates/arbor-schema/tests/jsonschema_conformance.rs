//! Differential test: for schemas whose meaning is the same under standard
//! JSON Schema (Draft 2020-12), validity must agree with the `jsonschema`
//! crate.
//!
//! Cases avoid the places where this engine deliberately differs: `$ref`
//! with sibling keywords, the boolean `exclusiveMinimum` convention, the
//! array form of `items`, and values that recurse through a `$ref` cycle.

use serde_json::{json, Value};

struct Case {
    name: &'static str,
    schema: Value,
    instance: Value,
    valid: bool,
}

fn case(name: &'static str, schema: Value, instance: Value, valid: bool) -> Case {
    Case {
        name,
        schema,
        instance,
        valid,
    }
}

fn cases() -> Vec<Case> {
    let address = json!({
        "definitions": {
            "Address": {
                "type": "object",
                "required": ["city"],
                "properties": {"city": {"type": "string", "minLength": 1}}
            }
        },
        "type": "object",
        "properties": {"home": {"$ref": "#/definitions/Address"}}
    });
    let conditional = json!({
        "if": {"properties": {"kind": {"const": "card"}}},
        "then": {"required": ["number"]},
        "else": {"required": ["iban"]}
    });
    let strict = json!({
        "type": "object",
        "properties": {"name": {"type": "string"}},
        "patternProperties": {"^x-": {"type": "integer"}},
        "additionalProperties": false
    });

    vec![
        case("type string", json!({"type": "string"}), json!("a"), true),
        case("type mismatch", json!({"type": "string"}), json!(1), false),
        case("object rejects null", json!({"type": "object"}), json!(null), false),
        case("object rejects array", json!({"type": "object"}), json!([]), false),
        case("union type", json!({"type": ["string", "number"]}), json!(5), true),
        case("integer rejects fraction", json!({"type": "integer"}), json!(1.5), false),
        case("const match", json!({"const": {"a": [1]}}), json!({"a": [1]}), true),
        case("const mismatch", json!({"const": "x"}), json!("y"), false),
        case("enum match", json!({"enum": [1, "two", null]}), json!(null), true),
        case("enum mismatch", json!({"enum": [1, "two"]}), json!(2), false),
        case("minLength", json!({"minLength": 3}), json!("ab"), false),
        case("maxLength unicode", json!({"maxLength": 3}), json!("日本語"), true),
        case("pattern", json!({"pattern": "^[a-z]+$"}), json!("abc"), true),
        case("pattern mismatch", json!({"pattern": "^[a-z]+$"}), json!("ab1"), false),
        case("minimum inclusive", json!({"minimum": 0}), json!(0), true),
        case("minimum below", json!({"minimum": 0}), json!(-1), false),
        case("exclusiveMinimum equal", json!({"exclusiveMinimum": 0}), json!(0), false),
        case("exclusiveMinimum above", json!({"exclusiveMinimum": 0}), json!(1), true),
        case("exclusiveMaximum", json!({"exclusiveMaximum": 10}), json!(10), false),
        case("multipleOf", json!({"multipleOf": 5}), json!(15), true),
        case("required missing", json!({"required": ["a"]}), json!({}), false),
        case("required on non-object", json!({"required": ["a"]}), json!("x"), true),
        case("pattern property", strict.clone(), json!({"x-a": 1}), true),
        case("pattern property type", strict.clone(), json!({"x-a": "1"}), false),
        case("additional property", strict, json!({"name": "n", "other": 1}), false),
        case("minProperties", json!({"minProperties": 1}), json!({}), false),
        case("minItems", json!({"minItems": 2}), json!([1]), false),
        case("maxItems", json!({"maxItems": 1}), json!([1]), true),
        case("unique structural", json!({"uniqueItems": true}), json!([{"a": 1}, {"a": 1}]), false),
        case("unique distinct", json!({"uniqueItems": true}), json!([{"a": 1}, {"a": 2}]), true),
        case("items schema", json!({"items": {"type": "integer"}}), json!([1, 2, "3"]), false),
        case("allOf", json!({"allOf": [{"minimum": 1}, {"maximum": 3}]}), json!(2), true),
        case("allOf failure", json!({"allOf": [{"minimum": 1}, {"maximum": 3}]}), json!(4), false),
        case("anyOf", json!({"anyOf": [{"type": "string"}, {"minimum": 10}]}), json!(11), true),
        case("anyOf none", json!({"anyOf": [{"type": "string"}, {"minimum": 10}]}), json!(9), false),
        case("oneOf single", json!({"oneOf": [{"type": "string"}, {"type": "number", "minimum": 10}]}), json!("s"), true),
        case("oneOf both", json!({"oneOf": [{"type": "number"}, {"minimum": 10}]}), json!(11), false),
        case("not", json!({"not": {"type": "string"}}), json!("s"), false),
        case("if then", conditional.clone(), json!({"kind": "card", "number": "4111"}), true),
        case("if then missing", conditional.clone(), json!({"kind": "card"}), false),
        case("if else", conditional, json!({"kind": "bank", "iban": "DE00"}), true),
        case("ref resolves", address.clone(), json!({"home": {"city": "Porto"}}), true),
        case("ref nested failure", address.clone(), json!({"home": {"city": ""}}), false),
        case("ref type failure", address, json!({"home": null}), false),
    ]
}

#[test]
fn validity_agrees_with_jsonschema() {
    let mut disagreements = Vec::new();
    for case in cases() {
        let ours = arbor_schema::validate(&case.instance, &case.schema);
        let theirs = jsonschema::is_valid(&case.schema, &case.instance);

        assert_eq!(
            ours.is_valid(),
            case.valid,
            "case '{}': expected valid={}, got:\n{ours}",
            case.name,
            case.valid
        );
        if ours.is_valid() != theirs {
            disagreements.push(case.name);
        }
    }
    assert!(
        disagreements.is_empty(),
        "validity differs from jsonschema for: {disagreements:?}"
    );
}
