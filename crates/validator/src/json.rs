//! `serde_json` bridge
//!
//! Request bodies arrive as JSON. This module converts between
//! `serde_json::Value` and [`Value`], gives [`Value`] and [`Record`] serde
//! support, and offers [`validate_json`] for checking a payload in one call.
//!
//! ```
//! use quill_validator::json::validate_json;
//! use quill_validator::rule::FieldRule;
//! use quill_validator::schema::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::new().field("title", FieldRule::new().required());
//! assert!(validate_json(&schema, &json!({ "title": "Hello" })).is_ok());
//! assert!(validate_json(&schema, &json!({ "title": "" })).is_err());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::foundation::{Result, SchemaError};
use crate::schema::{Record, Schema};
use crate::value::Value;

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Converts to JSON.
    ///
    /// `undefined`, symbols and non-finite numbers become `null`; integral
    /// numbers become JSON integers; big integers
    /// outside the `i64` range become strings; byte buffers become arrays of
    /// numbers; wrapper objects unwrap.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null | Self::Symbol(_) => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) | Self::BoxedNumber(n) => number_to_json(*n),
            Self::BigInt(n) => i64::try_from(*n).map_or_else(
                |_| serde_json::Value::String(n.to_string()),
                serde_json::Value::from,
            ),
            Self::String(s) | Self::BoxedString(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Bytes(bytes) => {
                serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
            }
        }
    }
}

/// Integral numbers within the safe integer range serialize as JSON integers.
fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Record {
    /// Builds a record from a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, SchemaError> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()),
            other => Err(SchemaError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Parses a record from JSON text. The top level must be an object.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// Converts the record back to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(key, value)| (key.to_string(), value.to_json()))
                .collect(),
        )
    }
}

/// Validates a JSON request body against `schema`.
///
/// Non-object payloads are a [`SchemaError`]; rule violations are a
/// [`ValidationError`](crate::foundation::ValidationError).
pub fn validate_json(schema: &Schema, payload: &serde_json::Value) -> Result<()> {
    let record = Record::from_json(payload.clone())?;
    schema.validate(&record)?;
    Ok(())
}
