//! Error types
//!
//! - [`ValidationError`]: a field failed a rule. Safe to show to end users.
//! - [`SchemaError`]: a schema definition or payload could not be built.
//! - [`Error`]: either of the above, for callers that use `?` across both.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::rule::Rule;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// The first rule violation found by a validation pass.
///
/// Displays as its message, which is either the field's `errorText`
/// override or a generated text naming the field, the rule and the
/// offending value.
///
/// ```rust,ignore
/// use quill_validator::foundation::ValidationError;
/// use quill_validator::rule::Rule;
///
/// let error = ValidationError::new("password", Rule::MinLen, "too short")
///     .with_param("min", 6);
/// assert_eq!(error.param("min"), Some("6"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    field: String,
    rule: Rule,
    message: Cow<'static, str>,
    /// Rule parameters and the offending value, typically 1-3 entries.
    params: SmallVec<[(Cow<'static, str>, String); 3]>,
    overridden: bool,
}

impl ValidationError {
    /// Creates an error for `field` failing `rule`.
    pub fn new(
        field: impl Into<String>,
        rule: Rule,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
            params: SmallVec::new(),
            overridden: false,
        }
    }

    /// Adds a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl ToString,
    ) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Replaces the message with a caller supplied override.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_override(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.message = text.into();
        self.overridden = true;
        self
    }

    /// Name of the failing field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The rule that failed.
    #[must_use]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// The user facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// All parameters in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(Cow<'static, str>, String)] {
        &self.params
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the message came from the field's `errorText`.
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// JSON shape returned to API clients.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::json;

        let params: serde_json::Map<String, serde_json::Value> = self
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
            .collect();

        json!({
            "field": self.field,
            "rule": self.rule,
            "message": self.message,
            "params": params,
        })
    }
}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// Failure to build a [`Schema`](crate::schema::Schema) or a
/// [`Record`](crate::schema::Record) from external input.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A `match`/`dontMatch` pattern did not compile.
    #[error("invalid pattern for field `{field}`: {source}")]
    InvalidPattern {
        /// Field declaring the pattern.
        field: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A type tag outside the supported set.
    #[error("unknown type tag `{0}`")]
    UnknownType(String),

    /// A grouped `contains`/`notContains` declared a group with no members.
    #[error("field `{field}` declares an empty group in `{rule}`")]
    EmptyGroup {
        /// Field declaring the group.
        field: String,
        /// `contains` or `notContains`.
        rule: Rule,
    },

    /// A payload that should be a JSON object was something else.
    #[error("expected a JSON object, got {found}")]
    NotAnObject {
        /// JSON type actually found.
        found: &'static str,
    },

    /// The definition was not valid JSON or did not fit the rule language.
    #[error("malformed schema definition: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// CRATE ERROR
// ============================================================================

/// Either a rule violation or a schema construction failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Schema or payload could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl Error {
    /// Whether the message is meant for end users.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message to show an end user.
    ///
    /// Validation failures are shown verbatim; anything else is an internal
    /// fault and shows `fallback` instead.
    #[must_use]
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Validation(error) => error.message(),
            Self::Schema(_) => fallback,
        }
    }

    /// Returns the validation error, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            Self::Schema(_) => None,
        }
    }
}

/// Result alias over the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// TESTS
// ============================================================================
