// ABOUTME: Validates tool call arguments against a tool's JSON Schema.
// ABOUTME: Checks object shape, required fields, property types, and enums.

use serde_json::Value;

/// Validate tool arguments against a JSON Schema.
///
/// Performs top-level validation: schema type check, required field presence,
/// property type verification and `enum` membership. Returns `Err(message)`
/// describing the first violation found.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), String> {
    if let Some(expected) = schema.get("type") {
        if !type_matches(args, expected) {
            return Err(format!(
                "expected {} arguments, got {}",
                describe_type(expected),
                json_type_name(args)
            ));
        }
    }

    let Some(obj) = args.as_object() else {
        return check_enum("arguments", args, schema);
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !obj.contains_key(name) {
                return Err(format!("missing required field '{name}'"));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);

    for (key, value) in obj {
        match properties.and_then(|p| p.get(key)) {
            Some(prop_schema) => {
                if let Some(expected) = prop_schema.get("type") {
                    if !type_matches(value, expected) {
                        return Err(format!(
                            "field '{}' expected type '{}', got {}",
                            key,
                            describe_type(expected),
                            json_type_name(value)
                        ));
                    }
                }
                check_enum(&format!("field '{key}'"), value, prop_schema)?;
            }
            None => {
                if schema.get("additionalProperties") == Some(&Value::Bool(false)) {
                    return Err(format!("unexpected field '{key}'"));
                }
            }
        }
    }

    Ok(())
}

fn check_enum(label: &str, value: &Value, schema: &Value) -> Result<(), String> {
    match schema.get("enum").and_then(Value::as_array) {
        Some(allowed) if !allowed.contains(value) => Err(format!(
            "{label} must be one of {}, got {value}",
            Value::Array(allowed.clone())
        )),
        _ => Ok(()),
    }
}

fn type_matches(value: &Value, expected: &Value) -> bool {
    match expected {
        Value::String(name) => value_matches_type(value, name),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| value_matches_type(value, name)),
        _ => true,
    }
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn describe_type(expected: &Value) -> String {
    match expected {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calculator_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {"type": "string", "enum": ["add", "subtract", "multiply", "divide"]},
                "a": {"type": "number"},
                "b": {"type": "number"}
            },
            "required": ["operation", "a", "b"]
        })
    }

    #[test]
    fn test_valid_arguments() {
        let args = json!({"operation": "multiply", "a": 125, "b": 37});
        assert!(validate_arguments(&args, &calculator_schema()).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate_arguments(&json!({"operation": "add", "a": 1}), &calculator_schema())
            .unwrap_err();
        assert_eq!(err, "missing required field 'b'");
    }

    #[test]
    fn test_wrong_property_type() {
        let args = json!({"operation": "add", "a": "one", "b": 2});
        let err = validate_arguments(&args, &calculator_schema()).unwrap_err();
        assert!(err.contains("field 'a' expected type 'number'"));
    }

    #[test]
    fn test_enum_violation() {
        let args = json!({"operation": "modulo", "a": 1, "b": 2});
        let err = validate_arguments(&args, &calculator_schema()).unwrap_err();
        assert!(err.starts_with("field 'operation' must be one of"));
    }

    #[test]
    fn test_non_object_arguments() {
        let err = validate_arguments(&json!([1, 2]), &calculator_schema()).unwrap_err();
        assert_eq!(err, "expected object arguments, got array");
    }

    #[test]
    fn test_additional_properties_false() {
        let schema = json!({
            "type": "object",
            "properties": {"query": {"type": "string"}},
            "additionalProperties": false
        });
        assert!(validate_arguments(&json!({"query": "mars"}), &schema).is_ok());
        assert_eq!(
            validate_arguments(&json!({"query": "mars", "x": 1}), &schema).unwrap_err(),
            "unexpected field 'x'"
        );
    }

    #[test]
    fn test_integer_and_union_types() {
        let schema = json!({
            "type": "object",
            "properties": {
                "count": {"type": "integer"},
                "source": {"type": ["string", "null"]}
            }
        });
        assert!(validate_arguments(&json!({"count": 3, "source": null}), &schema).is_ok());
        assert!(validate_arguments(&json!({"count": 3.5}), &schema).is_err());
    }
}
