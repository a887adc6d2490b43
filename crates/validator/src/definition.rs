//! Declarative schema definitions
//!
//! The rule language the frontend writes as object literals, loadable from
//! JSON. A [`SchemaDefinition`] is plain data; [`SchemaDefinition::compile`]
//! turns it into a [`Schema`], compiling patterns and rejecting empty
//! `contains` groups on the way.
//!
//! ```
//! use quill_validator::definition::SchemaDefinition;
//!
//! let definition = SchemaDefinition::from_json_str(r#"{
//!     "password": { "type": "string", "required": true, "minLen": 6, "alphaNum": true },
//!     "slug": { "match": { "regex": "^[a-zA-Z0-9_-]*$" } }
//! }"#).unwrap();
//!
//! let schema = definition.compile().unwrap();
//! assert_eq!(schema.len(), 2);
//! ```
//!
//! Functions cannot be written in JSON. Attach `customValidation` predicates
//! and computed `match` values after compiling, through
//! [`Schema::get_mut`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::foundation::SchemaError;
use crate::rule::{ContainsSpec, FieldRule, MatchSpec, Rule};
use crate::schema::Schema;
use crate::value::{TypeTag, Value};

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// SCHEMA DEFINITION
// ============================================================================

/// Field name to field definition, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDefinition {
    fields: IndexMap<String, FieldDefinition>,
}

impl SchemaDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a definition from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a definition from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Adds or replaces `name`, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>, definition: FieldDefinition) -> Self {
        self.fields.insert(name.into(), definition);
        self
    }

    /// Definition of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Declared fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.fields.iter().map(|(name, definition)| (name.as_str(), definition))
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

    /// Builds the executable schema, keeping field order.
    ///
    /// # Errors
    ///
    /// The first field whose definition cannot be compiled.
    pub fn compile(&self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();
        for (name, definition) in &self.fields {
            schema.insert(name.clone(), definition.compile(name)?);
        }
        tracing::debug!(fields = schema.len(), "compiled schema definition");
        Ok(schema)
    }
}

impl Schema {
    /// Parses and compiles a JSON schema definition.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        SchemaDefinition::from_json_str(text)?.compile()
    }
}

// ============================================================================
// FIELD DEFINITION
// ============================================================================

/// The declarative form of a [`FieldRule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FieldDefinition {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeTag>,

    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub is_numeric: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,

    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matches: Option<MatchDefinition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dont_match: Option<MatchDefinition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<ContainsSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<ContainsSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_in: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_in: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "is_false")]
    pub alpha_num: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

impl FieldDefinition {
    /// Compiles the definition of `field`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidPattern`] for a regex that does not compile and
    /// [`SchemaError::EmptyGroup`] for a grouped `contains`/`notContains`
    /// with an empty group.
    pub fn compile(&self, field: &str) -> Result<FieldRule, SchemaError> {
        let mut rule = FieldRule::new().with_required(self.required);

        if let Some(tag) = self.ty {
            rule = rule.ty(tag);
        }
        if self.is_numeric {
            rule = rule.numeric();
        }
        if let Some(bound) = &self.min_value {
            rule = rule.min_value(bound.clone());
        }
        if let Some(bound) = &self.max_value {
            rule = rule.max_value(bound.clone());
        }
        if let Some(min) = self.min_len {
            rule = rule.min_len(min);
        }
        if let Some(max) = self.max_len {
            rule = rule.max_len(max);
        }
        if let Some(spec) = &self.matches {
            rule = rule.matches(spec.compile(field)?);
        }
        if let Some(spec) = &self.dont_match {
            rule = rule.dont_match(spec.compile(field)?);
        }
        if let Some(spec) = &self.contains {
            rule = rule.contains(checked_groups(field, Rule::Contains, spec)?);
        }
        if let Some(spec) = &self.not_contains {
            rule = rule.not_contains(checked_groups(field, Rule::NotContains, spec)?);
        }
        if let Some(values) = &self.is_in {
            rule = rule.is_in(values.iter().cloned());
        }
        if let Some(values) = &self.not_in {
            rule = rule.not_in(values.iter().cloned());
        }
        if self.alpha_num {
            rule = rule.alpha_num();
        }
        if let Some(text) = &self.error_text {
            rule = rule.error_text(text.clone());
        }

        tracing::trace!(field, rules = rule.declared_rules().count(), "compiled field definition");
        Ok(rule)
    }
}

fn checked_groups(field: &str, rule: Rule, spec: &ContainsSpec) -> Result<ContainsSpec, SchemaError> {
    if spec.has_empty_group() {
        return Err(SchemaError::EmptyGroup {
            field: field.to_string(),
            rule,
        });
    }
    Ok(spec.clone())
}

// ============================================================================
// MATCH DEFINITION
// ============================================================================

/// `{ "regex": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternDefinition {
    pub regex: String,
}

/// Declarative `match`/`dontMatch` parameter: a pattern object or any other
/// JSON literal compared by strict equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchDefinition {
    Pattern(PatternDefinition),
    Literal(Value),
}

impl MatchDefinition {
    /// Pattern form.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Pattern(PatternDefinition {
            regex: pattern.into(),
        })
    }

    fn compile(&self, field: &str) -> Result<MatchSpec, SchemaError> {
        match self {
            Self::Pattern(pattern) => {
                MatchSpec::pattern(&pattern.regex).map_err(|source| SchemaError::InvalidPattern {
                    field: field.to_string(),
                    source,
                })
            }
            Self::Literal(value) => Ok(MatchSpec::Literal(value.clone())),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
