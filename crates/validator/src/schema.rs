//! Schemas and records
//!
//! A [`Schema`] maps field names to [`FieldRule`]s. Declaration order is
//! iteration order, and iteration order decides which field is reported when
//! several would fail. A [`Record`] is the flat input being checked; fields
//! it lacks read as [`Value::Undefined`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine;
use crate::foundation::{Validate, ValidationError};
use crate::rule::FieldRule;
use crate::value::Value;

static UNDEFINED: Value = Value::Undefined;

// ============================================================================
// SCHEMA
// ============================================================================

/// Ordered mapping of field name to rule set.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldRule>,
}

impl Schema {
    /// Creates an empty schema. An empty schema accepts every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name`.
    ///
    /// Re-declaring a field replaces its rules but keeps its original
    /// position.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Declares `name` in place, returning the rules it replaced.
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) -> Option<FieldRule> {
        self.fields.insert(name.into(), rule)
    }

    /// Rules declared for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    /// Mutable rules declared for `name`, for attaching predicates after
    /// loading a definition.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldRule> {
        self.fields.get_mut(name)
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Validates `data`, stopping at the first violated rule.
    pub fn validate(&self, data: &Record) -> Result<(), ValidationError> {
        engine::validate_schema(self, data)
    }

    /// Returns `true` when every declared rule holds for `data`.
    #[must_use]
    pub fn is_satisfied_by(&self, data: &Record) -> bool {
        self.validate(data).is_ok()
    }
}

impl Validate for Schema {
    type Input = Record;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        engine::validate_schema(self, input)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldRule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, FieldRule)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        }
    }
}

// ============================================================================
// FIELD
// ============================================================================

/// A single named field, validated on its own.
///
/// ```rust,ignore
/// use quill_validator::prelude::*;
///
/// let title = Field::new("title", FieldRule::new().required());
/// assert!(title.validate(&Value::from("Hello")).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    rule: FieldRule,
}

impl Field {
    /// Binds `rule` to `name`.
    pub fn new(name: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// Field name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound rules.
    #[must_use]
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }
}

impl Validate for Field {
    type Input = Value;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        engine::validate_field(&self.name, &self.rule, input)
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// Flat input record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Value of `name`, reading absent fields as `Undefined`.
    #[must_use]
    pub fn get_or_undefined(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&UNDEFINED)
    }

    /// Whether `name` is present (even if set to `Undefined`).
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, Value>> for Record {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }
}

// ============================================================================
// TESTS
// ============================================================================
