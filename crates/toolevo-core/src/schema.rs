//! Structural schemas for tool input and output contracts.
//!
//! Schemas are stored as JSON-Schema-like documents and parsed into a
//! [`SchemaNode`] tree. A single recursive matcher checks a JSON value against
//! the tree and reports every violation with its JSON path.
//!
//! Supported keywords: `type` (string or list), `enum`, `nullable`,
//! `properties`, `required`, `additionalProperties` (boolean), `items`,
//! `minItems`, `maxItems`, `minLength`, `maxLength`, `minimum`, `maximum`.
//! Other keywords are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("invalid schema at {path}: {reason}")]
pub struct SchemaError {
    pub path: String,
    pub reason: String,
}

/// One mismatch between a value and a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Any,
    Null,
    Boolean,
    Number {
        integer: bool,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    Enum(Vec<JsonValue>),
    Array {
        items: Option<Box<SchemaNode>>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: IndexMap<String, SchemaNode>,
        required: Vec<String>,
        additional_properties: bool,
    },
    /// Matches when any member matches (`type: [..]`, `nullable: true`).
    Union(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Parse a JSON-Schema-like document.
    pub fn parse(doc: &JsonValue) -> Result<Self, SchemaError> {
        parse_node(doc, "$")
    }

    /// Check `value` against this schema, collecting every violation.
    pub fn validate(&self, value: &JsonValue) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        self.check(value, "$", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SchemaNode::Any => "any".into(),
            SchemaNode::Null => "null".into(),
            SchemaNode::Boolean => "boolean".into(),
            SchemaNode::Number { integer: true, .. } => "integer".into(),
            SchemaNode::Number { .. } => "number".into(),
            SchemaNode::String { .. } => "string".into(),
            SchemaNode::Enum(_) => "enum".into(),
            SchemaNode::Array { .. } => "array".into(),
            SchemaNode::Object { .. } => "object".into(),
            SchemaNode::Union(members) => members
                .iter()
                .map(|m| m.describe())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    fn check(&self, value: &JsonValue, path: &str, out: &mut Vec<SchemaViolation>) {
        match self {
            SchemaNode::Any => {}
            SchemaNode::Null => {
                if !value.is_null() {
                    out.push(mismatch(path, "null", value));
                }
            }
            SchemaNode::Boolean => {
                if !value.is_boolean() {
                    out.push(mismatch(path, "boolean", value));
                }
            }
            SchemaNode::Number { integer, minimum, maximum } => {
                let Some(n) = value.as_f64() else {
                    out.push(mismatch(path, &self.describe(), value));
                    return;
                };
                if *integer && !(value.is_i64() || value.is_u64() || n.fract() == 0.0) {
                    out.push(mismatch(path, "integer", value));
                }
                if let Some(min) = minimum {
                    if n < *min {
                        out.push(violation(path, format!("{} is less than minimum {}", n, min)));
                    }
                }
                if let Some(max) = maximum {
                    if n > *max {
                        out.push(violation(path, format!("{} is greater than maximum {}", n, max)));
                    }
                }
            }
            SchemaNode::String { min_length, max_length } => {
                let Some(s) = value.as_str() else {
                    out.push(mismatch(path, "string", value));
                    return;
                };
                let len = s.chars().count();
                if let Some(min) = min_length {
                    if len < *min {
                        out.push(violation(path, format!("length {} is shorter than {}", len, min)));
                    }
                }
                if let Some(max) = max_length {
                    if len > *max {
                        out.push(violation(path, format!("length {} is longer than {}", len, max)));
                    }
                }
            }
            SchemaNode::Enum(values) => {
                if !values.contains(value) {
                    out.push(violation(
                        path,
                        format!(
                            "{} is not one of {}",
                            value,
                            JsonValue::Array(values.clone())
                        ),
                    ));
                }
            }
            SchemaNode::Array { items, min_items, max_items } => {
                let Some(arr) = value.as_array() else {
                    out.push(mismatch(path, "array", value));
                    return;
                };
                if let Some(min) = min_items {
                    if arr.len() < *min {
                        out.push(violation(path, format!("expected at least {} items", min)));
                    }
                }
                if let Some(max) = max_items {
                    if arr.len() > *max {
                        out.push(violation(path, format!("expected at most {} items", max)));
                    }
                }
                if let Some(item_schema) = items {
                    for (idx, item) in arr.iter().enumerate() {
                        item_schema.check(item, &format!("{}[{}]", path, idx), out);
                    }
                }
            }
            SchemaNode::Object { properties, required, additional_properties } => {
                let Some(obj) = value.as_object() else {
                    out.push(mismatch(path, "object", value));
                    return;
                };
                for key in required {
                    if !obj.contains_key(key) {
                        out.push(violation(
                            &child_path(path, key),
                            "required property is missing".to_string(),
                        ));
                    }
                }
                for (key, val) in obj {
                    match properties.get(key) {
                        Some(prop) => prop.check(val, &child_path(path, key), out),
                        None if !additional_properties => out.push(violation(
                            &child_path(path, key),
                            "additional property is not allowed".to_string(),
                        )),
                        None => {}
                    }
                }
            }
            SchemaNode::Union(members) => {
                let matched = members.iter().any(|m| {
                    let mut scratch = Vec::new();
                    m.check(value, path, &mut scratch);
                    scratch.is_empty()
                });
                if !matched {
                    out.push(mismatch(path, &self.describe(), value));
                }
            }
        }
    }
}

fn parse_node(doc: &JsonValue, path: &str) -> Result<SchemaNode, SchemaError> {
    let obj = match doc {
        JsonValue::Bool(true) => return Ok(SchemaNode::Any),
        JsonValue::Object(obj) => obj,
        _ => return Err(schema_error(path, "schema must be an object or `true`")),
    };

    let node = if let Some(values) = obj.get("enum") {
        match values.as_array() {
            Some(values) if !values.is_empty() => SchemaNode::Enum(values.clone()),
            _ => return Err(schema_error(path, "`enum` must be a non-empty array")),
        }
    } else {
        match obj.get("type") {
            Some(JsonValue::String(name)) => parse_typed(name, obj, path)?,
            Some(JsonValue::Array(names)) => {
                let mut members = Vec::with_capacity(names.len());
                for name in names {
                    let name = name
                        .as_str()
                        .ok_or_else(|| schema_error(path, "`type` entries must be strings"))?;
                    members.push(parse_typed(name, obj, path)?);
                }
                match members.len() {
                    0 => return Err(schema_error(path, "`type` list is empty")),
                    1 => members.remove(0),
                    _ => SchemaNode::Union(members),
                }
            }
            Some(_) => return Err(schema_error(path, "`type` must be a string or list")),
            None if obj.contains_key("properties") || obj.contains_key("required") => {
                parse_typed("object", obj, path)?
            }
            None if obj.contains_key("items") => parse_typed("array", obj, path)?,
            None => SchemaNode::Any,
        }
    };

    if obj.get("nullable").and_then(JsonValue::as_bool).unwrap_or(false) {
        return Ok(SchemaNode::Union(vec![node, SchemaNode::Null]));
    }
    Ok(node)
}

fn parse_typed(
    name: &str,
    obj: &serde_json::Map<String, JsonValue>,
    path: &str,
) -> Result<SchemaNode, SchemaError> {
    Ok(match name {
        "null" => SchemaNode::Null,
        "boolean" => SchemaNode::Boolean,
        "number" | "integer" => SchemaNode::Number {
            integer: name == "integer",
            minimum: number_keyword(obj, "minimum", path)?,
            maximum: number_keyword(obj, "maximum", path)?,
        },
        "string" => SchemaNode::String {
            min_length: count_keyword(obj, "minLength", path)?,
            max_length: count_keyword(obj, "maxLength", path)?,
        },
        "array" => SchemaNode::Array {
            items: match obj.get("items") {
                Some(items) => Some(Box::new(parse_node(items, &format!("{}.items", path))?)),
                None => None,
            },
            min_items: count_keyword(obj, "minItems", path)?,
            max_items: count_keyword(obj, "maxItems", path)?,
        },
        "object" => {
            let mut properties = IndexMap::new();
            if let Some(props) = obj.get("properties") {
                let props = props
                    .as_object()
                    .ok_or_else(|| schema_error(path, "`properties` must be an object"))?;
                for (key, prop) in props {
                    let prop_path = format!("{}.properties.{}", path, key);
                    properties.insert(key.clone(), parse_node(prop, &prop_path)?);
                }
            }
            let required = match obj.get("required") {
                None => Vec::new(),
                Some(JsonValue::Array(keys)) => keys
                    .iter()
                    .map(|k| {
                        k.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| schema_error(path, "`required` entries must be strings"))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => return Err(schema_error(path, "`required` must be an array")),
            };
            let additional_properties = match obj.get("additionalProperties") {
                None => true,
                Some(JsonValue::Bool(b)) => *b,
                Some(_) => {
                    return Err(schema_error(path, "`additionalProperties` must be a boolean"))
                }
            };
            SchemaNode::Object { properties, required, additional_properties }
        }
        other => return Err(schema_error(path, &format!("unknown type '{}'", other))),
    })
}

fn number_keyword(
    obj: &serde_json::Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<Option<f64>, SchemaError> {
    match obj.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| schema_error(path, &format!("`{}` must be a number", key))),
    }
}

fn count_keyword(
    obj: &serde_json::Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<Option<usize>, SchemaError> {
    match obj.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| schema_error(path, &format!("`{}` must be a non-negative integer", key))),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    format!("{}.{}", parent, key)
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &str, found: &JsonValue) -> SchemaViolation {
    violation(path, format!("expected {}, found {}", expected, json_type_name(found)))
}

fn violation(path: &str, message: String) -> SchemaViolation {
    SchemaViolation { path: path.to_string(), message }
}

fn schema_error(path: &str, reason: &str) -> SchemaError {
    SchemaError { path: path.to_string(), reason: reason.to_string() }
}
