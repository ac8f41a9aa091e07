//! Decoding and structural validation of Messages API replies.
//!
//! The expected shape is declared once in [`REPLY_SHAPE`]. Validation only
//! checks presence and container kinds; leaf values are taken leniently.

use serde_json::Value;
use std::fmt;

use super::transport::RawResponse;
use crate::error::{Error, Result};

/// Structural expectation for one JSON node.
#[derive(Debug, Clone, Copy)]
enum Shape {
    /// Any value, including `null`.
    Present,
    /// A JSON array with at least one element.
    NonEmptyList,
    /// A JSON object with the listed fields.
    Record(&'static [(&'static str, Shape)]),
}

const USAGE_SHAPE: &[(&str, Shape)] = &[
    ("input_tokens", Shape::Present),
    ("output_tokens", Shape::Present),
];

const REPLY_SHAPE: Shape = Shape::Record(&[
    ("id", Shape::Present),
    ("type", Shape::Present),
    ("role", Shape::Present),
    ("content", Shape::NonEmptyList),
    ("model", Shape::Present),
    ("stop_reason", Shape::Present),
    ("stop_sequence", Shape::Present),
    ("usage", Shape::Record(USAGE_SHAPE)),
]);

/// Why a reply failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    path: String,
    problem: String,
}

impl ShapeError {
    fn new(path: &str, problem: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() {
                "response body".to_string()
            } else {
                format!("`{path}`")
            },
            problem: problem.into(),
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.problem)
    }
}

impl std::error::Error for ShapeError {}

/// One element of the reply's `content` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

/// A reply that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub id: String,
    pub kind: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
    pub usage: Usage,
}

impl ApiReply {
    /// Text of the first content block, which carries the payload.
    pub fn first_text(&self) -> std::result::Result<&str, ShapeError> {
        self.content
            .first()
            .and_then(|block| block.text.as_deref())
            .ok_or_else(|| ShapeError::new("content[0].text", "is missing or not a string"))
    }
}

/// Checks `raw` against the reply shape and builds a typed [`ApiReply`].
pub fn validate(raw: &Value) -> std::result::Result<ApiReply, ShapeError> {
    check(raw, REPLY_SHAPE, "")?;

    let field = |name: &str| get_field(raw, name);
    let usage = field("usage");

    Ok(ApiReply {
        id: text_of(field("id")),
        kind: text_of(field("type")),
        role: text_of(field("role")),
        content: field("content")
            .as_array()
            .map(|items| items.iter().map(content_block).collect())
            .unwrap_or_default(),
        model: text_of(field("model")),
        stop_reason: optional_text(field("stop_reason")),
        stop_sequence: optional_text(field("stop_sequence")),
        usage: Usage {
            input_tokens: usage.get("input_tokens").and_then(Value::as_u64),
            output_tokens: usage.get("output_tokens").and_then(Value::as_u64),
        },
    })
}

/// Turns an HTTP exchange into the reply's payload text.
///
/// Non-2xx statuses become [`Error::Api`]; bodies that are not JSON or fail
/// [`validate`] become [`Error::InvalidResponseShape`].
pub fn decode_reply_text(response: RawResponse) -> Result<String> {
    if !(200..300).contains(&response.status) {
        return Err(Error::Api {
            status: response.status,
            body: response.body,
        });
    }

    let raw: Value = serde_json::from_str(&response.body)
        .map_err(|e| Error::InvalidResponseShape(format!("body is not JSON: {e}")))?;

    let reply = validate(&raw).map_err(|e| {
        tracing::warn!(error = %e, body = %response.body, "reply failed validation");
        Error::InvalidResponseShape(e.to_string())
    })?;

    tracing::debug!(
        id = %reply.id,
        model = %reply.model,
        input_tokens = ?reply.usage.input_tokens,
        output_tokens = ?reply.usage.output_tokens,
        "reply validated"
    );

    reply
        .first_text()
        .map(str::to_owned)
        .map_err(|e| Error::InvalidResponseShape(e.to_string()))
}

fn check(value: &Value, shape: Shape, path: &str) -> std::result::Result<(), ShapeError> {
    match shape {
        Shape::Present => Ok(()),
        Shape::NonEmptyList => match value.as_array() {
            Some(items) if !items.is_empty() => Ok(()),
            Some(_) => Err(ShapeError::new(path, "is an empty list")),
            None => Err(ShapeError::new(path, "is not a list")),
        },
        Shape::Record(fields) => {
            let Some(map) = value.as_object() else {
                return Err(ShapeError::new(path, "is not an object"));
            };
            for (name, field_shape) in fields {
                let field_path = if path.is_empty() {
                    (*name).to_string()
                } else {
                    format!("{path}.{name}")
                };
                let field = map
                    .get(*name)
                    .ok_or_else(|| ShapeError::new(&field_path, "is missing"))?;
                check(field, *field_shape, &field_path)?;
            }
            Ok(())
        }
    }
}

// check() has already guaranteed presence.
fn get_field<'a>(raw: &'a Value, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    raw.get(name).unwrap_or(&NULL)
}

fn content_block(value: &Value) -> ContentBlock {
    ContentBlock {
        kind: value.get("type").and_then(Value::as_str).map(str::to_owned),
        text: value.get("text").and_then(Value::as_str).map(str::to_owned),
    }
}

fn text_of(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_owned)
}

fn optional_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
