//! Rule record validation
//!
//! Checks a defaulted rule record against its schema: `required` names,
//! and for each declared property present in the record its `type`, `enum`
//! and `minimum`. `allOf` branches are checked too, at the schema root and
//! inside property declarations. Failures are aggregated per record.
//!
//! Every record, whatever its schema declares, must carry a boolean
//! `enabled` and a string `severity`.

use serde_json::{Map, Value};

use crate::document::json_type_name;
use crate::error::ValidationError;
use crate::names::canonicalize_key;
use crate::schema::{all_of, Schema};

/// Validate one rule record; every failure is reported together
pub fn validate_record(
    rule: &str,
    record: &Map<String, Value>,
    schema: &Schema,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_node(&schema.content, record, &mut errors);
    check_common_fields(record, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            rule: rule.to_string(),
            errors,
        })
    }
}

fn check_node(node: &Value, record: &Map<String, Value>, errors: &mut Vec<String>) {
    if let Some(required) = node.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !record.contains_key(&canonicalize_key(name)) {
                errors.push(format!("missing required {}", name));
            }
        }
    }

    if let Some(properties) = node.get("properties").and_then(Value::as_object) {
        for (name, declaration) in properties {
            if let Some(value) = record.get(&canonicalize_key(name)) {
                check_property(name, declaration, value, errors);
            }
        }
    }

    for branch in all_of(node) {
        check_node(branch, record, errors);
    }
}

/// Fields shared by every rule record
const COMMON_FIELDS: [(&str, &str); 2] = [("enabled", "boolean"), ("severity", "string")];

fn check_common_fields(record: &Map<String, Value>, errors: &mut Vec<String>) {
    for (key, ty) in COMMON_FIELDS {
        if let Some(value) = record.get(key).filter(|v| !type_matches(ty, v)) {
            let message = format!("{} should be {}, got {}", key, ty, json_type_name(value));
            // already reported when the schema declares the field
            if !errors.contains(&message) {
                errors.push(message);
            }
        }
    }
}

fn check_property(name: &str, declaration: &Value, value: &Value, errors: &mut Vec<String>) {
    if let Some(ty) = declaration.get("type") {
        let accepted: Vec<&str> = match ty {
            Value::String(single) => vec![single.as_str()],
            Value::Array(many) => many.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if !accepted.is_empty() && !accepted.iter().any(|ty| type_matches(ty, value)) {
            errors.push(format!(
                "{} should be {}, got {}",
                name,
                accepted.join(" or "),
                json_type_name(value)
            ));
        }
    }

    if let Some(members) = declaration.get("enum").and_then(Value::as_array) {
        if !members.contains(value) {
            let listed: Vec<String> = members.iter().map(display_member).collect();
            errors.push(format!("{} must be one of {}", name, listed.join(", ")));
        }
    }

    if let Some(minimum) = declaration.get("minimum").and_then(Value::as_f64) {
        if let Some(actual) = value.as_f64() {
            if actual < minimum {
                errors.push(format!("{} must be >= {}", name, declaration["minimum"]));
            }
        }
    }

    for branch in all_of(declaration) {
        check_property(name, branch, value, errors);
    }
}

/// Whether a value has the JSON Schema type `ty`; unknown types accept anything
fn type_matches(ty: &str, value: &Value) -> bool {
    match ty {
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "string" => value.is_string(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn display_member(member: &Value) -> String {
    match member {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaKind;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            "layout/indentation_consistency",
            SchemaKind::Rule,
            json!({
                "properties": {
                    "enabled": { "type": "boolean" },
                    "enforced_style": { "type": "string", "enum": ["space", "tab"] },
                    "indent_width": { "type": "integer", "minimum": 1 }
                }
            }),
        )
    }

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_valid_record() {
        let rec = record(json!({ "enabled": true, "enforced_style": "tab", "indent_width": 4 }));
        assert!(validate_record("layout/indentation_consistency", &rec, &schema()).is_ok());
    }

    #[test]
    fn test_enum_violation() {
        let rec = record(json!({ "enforced_style": "invalid_style" }));
        let err = validate_record("layout/indentation_consistency", &rec, &schema()).unwrap_err();
        assert_eq!(err.rule, "layout/indentation_consistency");
        assert_eq!(err.errors, vec!["enforced_style must be one of space, tab"]);
    }

    #[test]
    fn test_errors_aggregated() {
        let rec = record(json!({ "enabled": "yes", "indent_width": 0, "enforced_style": 3 }));
        let err = validate_record("x/y", &rec, &schema()).unwrap_err();
        assert_eq!(err.errors.len(), 4);
        assert!(err.errors.contains(&"enabled should be boolean, got string".to_string()));
        assert!(err.errors.contains(&"indent_width must be >= 1".to_string()));
        assert!(err.errors.contains(&"enforced_style should be string, got integer".to_string()));
    }

    #[test]
    fn test_common_fields_checked_without_declaration() {
        let bare = Schema::new("layout/misc", SchemaKind::Rule, json!({}));
        let rec = record(json!({ "enabled": "yes", "severity": 2 }));
        let err = validate_record("layout/misc", &rec, &bare).unwrap_err();
        assert_eq!(
            err.errors,
            vec!["enabled should be boolean, got string", "severity should be string, got integer"]
        );

        let rec = record(json!({ "enabled": false, "severity": "error" }));
        assert!(validate_record("layout/misc", &rec, &bare).is_ok());
    }

    #[test]
    fn test_declared_common_field_reported_once() {
        let rec = record(json!({ "enabled": "yes" }));
        let err = validate_record("x/y", &rec, &schema()).unwrap_err();
        assert_eq!(err.errors, vec!["enabled should be boolean, got string"]);
    }

    #[test]
    fn test_integer_rejects_float() {
        let rec = record(json!({ "indent_width": 2.5 }));
        let err = validate_record("x/y", &rec, &schema()).unwrap_err();
        assert_eq!(err.errors, vec!["indent_width should be integer, got number"]);
    }

    #[test]
    fn test_required_and_all_of_branches() {
        let schema = Schema::new(
            "lint/debugger",
            SchemaKind::Rule,
            json!({
                "required": ["enabled"],
                "allOf": [
                    { "required": ["debugger_methods"] },
                    { "properties": { "debugger_methods": { "type": "array" } } }
                ]
            }),
        );
        let err = validate_record("lint/debugger", &record(json!({})), &schema).unwrap_err();
        assert_eq!(err.errors, vec!["missing required enabled", "missing required debugger_methods"]);

        let rec = record(json!({ "enabled": true, "debugger_methods": "binding.pry" }));
        let err = validate_record("lint/debugger", &rec, &schema).unwrap_err();
        assert_eq!(err.errors, vec!["debugger_methods should be array, got string"]);
    }

    #[test]
    fn test_property_level_all_of() {
        let schema = Schema::new(
            "layout/line_length",
            SchemaKind::Rule,
            json!({ "properties": { "max": { "allOf": [ { "type": "integer" }, { "minimum": 1 } ] } } }),
        );
        let err = validate_record("layout/line_length", &record(json!({ "max": 0 })), &schema).unwrap_err();
        assert_eq!(err.errors, vec!["max must be >= 1"]);
    }

    #[test]
    fn test_undeclared_properties_ignored() {
        let rec = record(json!({ "raw": [1, 2], "severity": "warning" }));
        assert!(validate_record("x/y", &rec, &schema()).is_ok());
    }
}
