use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::ToolError;

/// Turns the raw `arguments` member into an object. `null` members are
/// dropped so they count as absent.
pub fn normalize(arguments: &Value) -> Result<Value, ToolError> {
    match arguments {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(map) => Ok(Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )),
        _ => Err(ToolError::InvalidArguments("expected an object".to_string())),
    }
}

/// Validates normalized arguments against a tool's input schema. A missing
/// required member wins over any other violation.
pub fn validate(schema: &Value, arguments: &Value) -> Result<(), ToolError> {
    // Dates arrive as plain `YYYY-MM-DD` as often as full timestamps.
    let validator = jsonschema::options()
        .should_validate_formats(false)
        .build(schema)
        .map_err(|e| ToolError::InvalidSchema(e.to_string()))?;

    let mut invalid = None;
    for error in validator.iter_errors(arguments) {
        if let ValidationErrorKind::Required { property } = &error.kind {
            let name = property
                .as_str()
                .map_or_else(|| property.to_string(), str::to_string);
            return Err(ToolError::MissingArgument(name));
        }
        if invalid.is_none() {
            invalid = Some(ToolError::InvalidArgument {
                name: argument_name(&error),
                reason: error.to_string(),
            });
        }
    }

    invalid.map_or(Ok(()), Err)
}

/// Top-level member the error points into, e.g. `/sensors/0` -> `sensors`.
fn argument_name(error: &ValidationError<'_>) -> String {
    let path = error.instance_path.to_string();
    match path.trim_start_matches('/').split('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "arguments".to_string(),
    }
}

/// Deserializes validated arguments into a handler's argument struct.
pub fn parse<T: DeserializeOwned>(arguments: &Value) -> Result<T, ToolError> {
    let arguments = normalize(arguments)?;
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Accepts `"42"` as well as `42` for identifier fields.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
