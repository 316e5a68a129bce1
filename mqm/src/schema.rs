//! @ai:module:intent Compile the annotation schema into a strict structured-output schema
//! @ai:module:layer domain
//! @ai:module:public_api annotation_schema, compile_strict, strict_schema
//! @ai:module:depends_on taxonomy
//! @ai:module:stateless true

use crate::taxonomy::{ErrorCategory, Severity};
use serde_json::{json, Value};
use std::sync::OnceLock;

/// @ai:intent Declarative JSON-schema for [`crate::MQMAnnotation`]
///
/// Built explicitly rather than derived from the Rust types so the strict
/// transformation in [`compile_strict`] stays auditable and testable on its
/// own. Nested shapes live under `definitions` and are referenced by `$ref`.
/// @ai:effects pure
pub fn annotation_schema() -> Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.name()).collect();
    let categories: Vec<&str> = ErrorCategory::ALL.iter().map(|c| c.name()).collect();

    json!({
        "title": "MQMAnnotation",
        "description": "Complete MQM annotation for a translation segment or document",
        "type": "object",
        "properties": {
            "errors": {
                "title": "Errors",
                "description": "List of identified MQM errors",
                "type": "array",
                "items": {"$ref": "#/definitions/MQMError"},
                "default": []
            }
        },
        "definitions": {
            "Severity": {
                "title": "Severity",
                "description": "Error severity: neutral/minor/major/critical",
                "type": "string",
                "enum": severities
            },
            "ErrorCategory": {
                "title": "ErrorCategory",
                "description": "Top-level error category (Level 0)",
                "type": "string",
                "enum": categories
            },
            "TokenInfo": {
                "title": "TokenInfo",
                "type": "object",
                "properties": {
                    "token_index": {
                        "title": "Token Index",
                        "description": "The position of a single or adjacent words in the text (word offset, 0-indexed)",
                        "type": ["array", "null"],
                        "items": {"type": "integer", "minimum": 0}
                    },
                    "character_span": {
                        "title": "Character Span",
                        "description": "List of start and end positions in text (character offsets, 0-indexed)",
                        "type": "array",
                        "items": {"type": "integer"},
                        "default": []
                    },
                    "token": {
                        "title": "Token",
                        "description": "The token(s) (single or adjacent full words) in question in the text",
                        "type": ["string", "null"]
                    }
                }
            },
            "MQMError": {
                "title": "MQMError",
                "description": "A single MQM error annotation",
                "type": "object",
                "properties": {
                    "category": {"$ref": "#/definitions/ErrorCategory"},
                    "severity": {"$ref": "#/definitions/Severity"},
                    "in_source": {"$ref": "#/definitions/TokenInfo"},
                    "in_target": {"$ref": "#/definitions/TokenInfo"}
                }
            }
        }
    })
}

/// @ai:intent Transform a schema into the strict form the structured-output API accepts
///
/// Every object node gets `additionalProperties: false` and a `required`
/// list equal to the full set of its property names. Recurses through
/// `properties`, `definitions`, `$defs`, array `items` and the
/// `oneOf`/`anyOf`/`allOf` combinator lists.
/// @ai:post applying the transformation twice yields the same document
/// @ai:effects pure
pub fn compile_strict(schema: &Value) -> Value {
    let mut compiled = schema.clone();
    fix_node(&mut compiled);
    compiled
}

/// @ai:intent Compiled strict schema, shared read-only across sessions
/// @ai:effects pure
pub fn strict_schema() -> &'static Value {
    static STRICT: OnceLock<Value> = OnceLock::new();
    STRICT.get_or_init(|| compile_strict(&annotation_schema()))
}

/// @ai:intent Normalize one node and recurse into its children
fn fix_node(node: &mut Value) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    if obj.get("type").and_then(Value::as_str) == Some("object") {
        if !obj.contains_key("additionalProperties") {
            obj.insert("additionalProperties".to_string(), Value::Bool(false));
        }

        // Required must list every declared property. A malformed node is
        // skipped, not fatal: the accepted shapes are a fixed, known set.
        let required = match obj.get("properties") {
            Some(Value::Object(props)) => {
                Some(props.keys().cloned().map(Value::String).collect::<Vec<_>>())
            }
            Some(other) => {
                tracing::warn!(
                    "schema object node has non-mapping `properties` ({}), skipping",
                    other
                );
                None
            }
            None => None,
        };
        if let Some(required) = required {
            obj.insert("required".to_string(), Value::Array(required));
        }
    }

    for key in ["properties", "definitions", "$defs"] {
        if let Some(Value::Object(children)) = obj.get_mut(key) {
            for child in children.values_mut() {
                fix_node(child);
            }
        }
    }

    if let Some(items) = obj.get_mut("items") {
        fix_node(items);
    }

    for combinator in ["oneOf", "anyOf", "allOf"] {
        if let Some(Value::Array(children)) = obj.get_mut(combinator) {
            for child in children.iter_mut() {
                fix_node(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Walk a schema document and assert the strictness rules on every
    /// object-typed node reachable through the compiler's recursion paths.
    fn assert_strict(node: &Value) {
        let Some(obj) = node.as_object() else { return };

        if obj.get("type").and_then(Value::as_str) == Some("object") {
            assert_eq!(
                obj.get("additionalProperties"),
                Some(&Value::Bool(false)),
                "object node missing additionalProperties: false: {node}"
            );

            if let Some(Value::Object(props)) = obj.get("properties") {
                let mut required: Vec<String> = obj
                    .get("required")
                    .and_then(Value::as_array)
                    .expect("object node missing required list")
                    .iter()
                    .map(|v| v.as_str().unwrap().to_string())
                    .collect();
                let mut keys: Vec<String> = props.keys().cloned().collect();
                required.sort();
                keys.sort();
                assert_eq!(required, keys);
            }
        }

        for key in ["properties", "definitions", "$defs"] {
            if let Some(Value::Object(children)) = obj.get(key) {
                for child in children.values() {
                    assert_strict(child);
                }
            }
        }
        if let Some(items) = obj.get("items") {
            assert_strict(items);
        }
        for combinator in ["oneOf", "anyOf", "allOf"] {
            if let Some(Value::Array(children)) = obj.get(combinator) {
                for child in children {
                    assert_strict(child);
                }
            }
        }
    }

    #[test]
    fn test_compiled_schema_is_strict() {
        assert_strict(strict_schema());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let once = compile_strict(&annotation_schema());
        let twice = compile_strict(&once);
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn test_compile_does_not_mutate_input() {
        let schema = annotation_schema();
        let before = serde_json::to_string(&schema).unwrap();
        let _ = compile_strict(&schema);
        assert_eq!(before, serde_json::to_string(&schema).unwrap());
    }

    #[test]
    fn test_required_lists_every_property() {
        let compiled = compile_strict(&annotation_schema());
        let error_def = &compiled["definitions"]["MQMError"];

        let required: Vec<&str> = error_def["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let mut sorted = required.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["category", "in_source", "in_target", "severity"]);
    }

    #[test]
    fn test_recursion_reaches_combinators() {
        let schema = json!({
            "anyOf": [
                {"type": "object", "properties": {"a": {"type": "string"}}},
                {"type": "object", "properties": {"b": {"type": "integer"}}}
            ]
        });
        let compiled = compile_strict(&schema);
        for branch in compiled["anyOf"].as_array().unwrap() {
            assert_eq!(branch["additionalProperties"], Value::Bool(false));
            assert!(branch["required"].is_array());
        }
    }

    #[test]
    fn test_malformed_properties_skipped() {
        let schema = json!({"type": "object", "properties": "not a mapping"});
        let compiled = compile_strict(&schema);
        assert_eq!(compiled["additionalProperties"], Value::Bool(false));
        assert!(compiled.get("required").is_none());
    }

    #[test]
    fn test_enum_values_match_taxonomy() {
        let schema = annotation_schema();
        let severities = schema["definitions"]["Severity"]["enum"].as_array().unwrap();
        assert_eq!(severities.len(), 4);
        assert_eq!(severities[0], "neutral");

        let categories = schema["definitions"]["ErrorCategory"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(categories.len(), 7);
        assert!(categories.contains(&Value::String("locale-conventions".into())));
    }
}
