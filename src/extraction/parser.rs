// parser.rs
use crate::extraction::schema::{ExtractionSchema, FieldKind, FieldSpec};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJson,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("expected a JSON object, got {0}")]
    NotAnObject(String),
    #[error("field `{field}`: {value} is not one of the allowed values")]
    InvalidChoice { field: &'static str, value: String },
    #[error("field `{field}`: expected {expected}, got {value}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Parse a model reply against `schema`.
///
/// Output keys follow schema order. Absent keys, `null`, and the strings
/// "null" / "none" / "" all take the field's default.
pub fn parse_structured(
    schema: &ExtractionSchema,
    text: &str,
) -> Result<Map<String, Value>, ParseError> {
    let json_text = extract_json(text).ok_or(ParseError::NoJson)?;
    let raw: Value =
        serde_json::from_str(json_text).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let object = match raw {
        Value::Object(map) => map,
        other => return Err(ParseError::NotAnObject(other.to_string())),
    };

    let mut out = Map::new();
    for field in schema.fields() {
        let value = match lookup(&object, field.name) {
            Some(v) if !is_blank(v) => coerce(field, v)?,
            _ => field.default.to_value(),
        };
        out.insert(field.name.to_string(), value);
    }
    Ok(out)
}

/// Prefer a fenced block; otherwise take the outermost braces.
fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Exact key first, then a case-insensitive match.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none")
        }
        _ => false,
    }
}

fn coerce(field: &FieldSpec, value: &Value) -> Result<Value, ParseError> {
    match field.kind {
        FieldKind::Choice(options) => {
            let raw = value.as_str().map(str::trim).ok_or_else(|| ParseError::InvalidChoice {
                field: field.name,
                value: value.to_string(),
            })?;
            options
                .iter()
                .find(|opt| opt.eq_ignore_ascii_case(raw))
                .map(|opt| Value::String(opt.to_string()))
                .ok_or_else(|| ParseError::InvalidChoice {
                    field: field.name,
                    value: value.to_string(),
                })
        }
        FieldKind::Text => match value {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            other => Err(type_error(field, "string", other)),
        },
        FieldKind::Integer => integer(value)
            .map(Value::from)
            .ok_or_else(|| type_error(field, "integer", value)),
        FieldKind::Range => range(field, value),
        FieldKind::List => list(field, value),
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim().replace(',', "");
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn range(field: &FieldSpec, value: &Value) -> Result<Value, ParseError> {
    let Value::Object(bounds) = value else {
        return Err(type_error(field, "object", value));
    };

    let mut out = Map::new();
    for key in ["Min", "Max"] {
        let bound = match lookup(bounds, key) {
            Some(v) if !is_blank(v) => {
                let n = integer(v).ok_or_else(|| type_error(field, "integer bounds", v))?;
                Value::from(n)
            }
            _ => Value::Null,
        };
        out.insert(key.to_string(), bound);
    }

    if out.values().all(Value::is_null) {
        return Ok(field.default.to_value());
    }
    Ok(Value::Object(out))
}

fn list(field: &FieldSpec, value: &Value) -> Result<Value, ParseError> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::String(s) => return Ok(Value::Array(vec![Value::String(s.trim().to_string())])),
        other => return Err(type_error(field, "array", other)),
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) if !is_blank(item) => out.push(Value::String(s.trim().to_string())),
            Value::String(_) | Value::Null => {}
            other => return Err(type_error(field, "array of strings", other)),
        }
    }
    Ok(Value::Array(out))
}

fn type_error(field: &FieldSpec, expected: &'static str, value: &Value) -> ParseError {
    ParseError::InvalidType {
        field: field.name,
        expected,
        value: value.to_string(),
    }
}
