//! Per-field rule sets
//!
//! A [`FieldRule`] is the declarative description of what one field must
//! satisfy. Every rule is optional; the engine evaluates the declared ones in
//! [`Rule::PRECEDENCE`] order and stops at the first violation.
//!
//! ```rust,ignore
//! use quill_validator::prelude::*;
//!
//! let password = FieldRule::new()
//!     .ty(TypeTag::String)
//!     .required()
//!     .min_len(6)
//!     .max_len(30)
//!     .alpha_num();
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::{TypeTag, Value, format_number};

/// Caller supplied check for the `customValidation` rule.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Zero-argument producer for [`MatchSpec::Computed`].
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

// ============================================================================
// RULE NAMES
// ============================================================================

/// Name of a single rule, serialized with its declarative spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    /// `type`
    Type,
    /// `required`
    Required,
    /// `isNumeric`
    IsNumeric,
    /// `minValue`
    MinValue,
    /// `maxValue`
    MaxValue,
    /// `minLen`
    MinLen,
    /// `maxLen`
    MaxLen,
    /// `match`
    Match,
    /// `dontMatch`
    DontMatch,
    /// `contains`
    Contains,
    /// `notContains`
    NotContains,
    /// `isIn`
    IsIn,
    /// `notIn`
    NotIn,
    /// `customValidation`
    CustomValidation,
    /// `alphaNum`
    AlphaNum,
}

impl Rule {
    /// Fixed evaluation order within a field.
    pub const PRECEDENCE: [Self; 15] = [
        Self::Type,
        Self::Required,
        Self::IsNumeric,
        Self::MinValue,
        Self::MaxValue,
        Self::MinLen,
        Self::MaxLen,
        Self::Match,
        Self::DontMatch,
        Self::Contains,
        Self::NotContains,
        Self::IsIn,
        Self::NotIn,
        Self::CustomValidation,
        Self::AlphaNum,
    ];

    /// Returns the declarative name of the rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Required => "required",
            Self::IsNumeric => "isNumeric",
            Self::MinValue => "minValue",
            Self::MaxValue => "maxValue",
            Self::MinLen => "minLen",
            Self::MaxLen => "maxLen",
            Self::Match => "match",
            Self::DontMatch => "dontMatch",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::IsIn => "isIn",
            Self::NotIn => "notIn",
            Self::CustomValidation => "customValidation",
            Self::AlphaNum => "alphaNum",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MATCH SPEC
// ============================================================================

/// Parameter of the `match` and `dontMatch` rules.
#[derive(Clone)]
pub enum MatchSpec {
    /// Strict equality with a fixed value.
    Literal(Value),
    /// Strict equality with whatever the producer returns at check time.
    Computed(Producer),
    /// Pattern tested against the value's string form.
    Pattern(Regex),
}

/// A [`MatchSpec`] with its producer already called.
#[derive(Debug)]
pub(crate) enum ResolvedMatch<'a> {
    Value(Cow<'a, Value>),
    Pattern(&'a Regex),
}

impl MatchSpec {
    /// Matches a fixed value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Matches the current return value of `producer`.
    pub fn computed<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(producer))
    }

    /// Compiles `pattern` into a [`MatchSpec::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub(crate) fn resolve(&self) -> ResolvedMatch<'_> {
        match self {
            Self::Literal(value) => ResolvedMatch::Value(Cow::Borrowed(value)),
            Self::Computed(producer) => ResolvedMatch::Value(Cow::Owned(producer())),
            Self::Pattern(regex) => ResolvedMatch::Pattern(regex),
        }
    }
}

impl ResolvedMatch<'_> {
    pub(crate) fn is_matched_by(&self, value: &Value) -> bool {
        match self {
            Self::Value(expected) => value.strict_eq(expected),
            Self::Pattern(regex) => regex.is_match(&value.to_display_string()),
        }
    }
}

impl fmt::Display for ResolvedMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(expected) => write!(f, "\"{expected}\""),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl fmt::Debug for MatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
        }
    }
}

impl From<Regex> for MatchSpec {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<Value> for MatchSpec {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for MatchSpec {
    fn from(value: &str) -> Self {
        Self::Literal(value.into())
    }
}

impl From<String> for MatchSpec {
    fn from(value: String) -> Self {
        Self::Literal(value.into())
    }
}

impl From<bool> for MatchSpec {
    fn from(value: bool) -> Self {
        Self::Literal(value.into())
    }
}

impl From<f64> for MatchSpec {
    fn from(value: f64) -> Self {
        Self::Literal(value.into())
    }
}

impl From<i64> for MatchSpec {
    fn from(value: i64) -> Self {
        Self::Literal(value.into())
    }
}

impl From<i32> for MatchSpec {
    fn from(value: i32) -> Self {
        Self::Literal(value.into())
    }
}

// ============================================================================
// CONTAINS SPEC
// ============================================================================

/// A literal searched for by the `contains` family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Needle {
    /// Text literal.
    Text(String),
    /// Number literal.
    Number(f64),
}

impl Needle {
    /// Text used for substring search.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    /// Value used for array element comparison.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(n) => Value::Number(*n),
        }
    }

    /// Whether `haystack` is a string, string object or array.
    #[must_use]
    pub const fn can_search(haystack: &Value) -> bool {
        matches!(
            haystack,
            Value::String(_) | Value::BoxedString(_) | Value::Array(_)
        )
    }

    /// Whether `haystack` holds this needle.
    ///
    /// Strings (and string objects) are searched for the needle's text as a
    /// substring. Arrays are searched for an element strictly equal to the
    /// needle; elements are not stringified. Nothing else contains anything.
    #[must_use]
    pub fn is_in(&self, haystack: &Value) -> bool {
        match haystack {
            Value::String(text) | Value::BoxedString(text) => text.contains(&*self.as_text()),
            Value::Array(items) => {
                let needle = self.to_value();
                items.iter().any(|item| item.strict_eq(&needle))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Needle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.as_text())
    }
}

impl From<&str> for Needle {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Needle {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Needle {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Needle {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Needle {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Parameter of the `contains` and `notContains` rules.
///
/// The grouped form is a list of alternative groups: for `contains` every
/// group needs at least one member present, for `notContains` no group may
/// have any member present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContainsSpec {
    /// Groups of alternatives, each checked on its own.
    Groups(Vec<Vec<Needle>>),
    /// A single literal.
    Literal(Needle),
}

impl ContainsSpec {
    /// Builds the grouped form.
    pub fn groups<I, G, N>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = N>,
        N: Into<Needle>,
    {
        Self::Groups(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Returns `true` when the grouped form has a group with no members.
    #[must_use]
    pub fn has_empty_group(&self) -> bool {
        match self {
            Self::Groups(groups) => groups.iter().any(Vec::is_empty),
            Self::Literal(_) => false,
        }
    }
}

impl From<Needle> for ContainsSpec {
    fn from(needle: Needle) -> Self {
        Self::Literal(needle)
    }
}

impl From<&str> for ContainsSpec {
    fn from(value: &str) -> Self {
        Self::Literal(value.into())
    }
}

impl From<String> for ContainsSpec {
    fn from(value: String) -> Self {
        Self::Literal(value.into())
    }
}

impl From<f64> for ContainsSpec {
    fn from(value: f64) -> Self {
        Self::Literal(value.into())
    }
}

impl From<i32> for ContainsSpec {
    fn from(value: i32) -> Self {
        Self::Literal(value.into())
    }
}

/// Renders needles or values as `["a", "b"]`.
pub(crate) fn render_list<T: fmt::Display>(items: &[T]) -> String {
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

// ============================================================================
// FIELD RULE
// ============================================================================

/// The rule set declared for one field.
#[derive(Clone, Default)]
pub struct FieldRule {
    pub(crate) ty: Option<TypeTag>,
    pub(crate) required: bool,
    pub(crate) numeric: bool,
    pub(crate) min_value: Option<Value>,
    pub(crate) max_value: Option<Value>,
    pub(crate) min_len: Option<usize>,
    pub(crate) max_len: Option<usize>,
    pub(crate) matches: Option<MatchSpec>,
    pub(crate) dont_match: Option<MatchSpec>,
    pub(crate) contains: Option<ContainsSpec>,
    pub(crate) not_contains: Option<ContainsSpec>,
    pub(crate) is_in: Option<Vec<Value>>,
    pub(crate) not_in: Option<Vec<Value>>,
    pub(crate) custom: Option<Predicate>,
    pub(crate) alpha_num: bool,
    pub(crate) error_text: Option<String>,
}

impl FieldRule {
    /// Creates an empty rule set. An empty rule set accepts anything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `type`: the runtime type must equal `tag`.
    pub fn ty(mut self, tag: TypeTag) -> Self {
        self.ty = Some(tag);
        self
    }

    /// `required`: the value must be truthy or exactly `false`.
    pub fn required(self) -> Self {
        self.with_required(true)
    }

    /// `required` with an explicit flag. `false` disables the rule.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// `isNumeric`: the value must coerce to a number.
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// `minValue`: inclusive lower bound.
    pub fn min_value(mut self, bound: impl Into<Value>) -> Self {
        self.min_value = Some(bound.into());
        self
    }

    /// `maxValue`: inclusive upper bound.
    pub fn max_value(mut self, bound: impl Into<Value>) -> Self {
        self.max_value = Some(bound.into());
        self
    }

    /// `minLen`: inclusive lower bound on `length`.
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// `maxLen`: inclusive upper bound on `length`.
    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// `match`.
    pub fn matches(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.matches = Some(spec.into());
        self
    }

    /// `dontMatch`.
    pub fn dont_match(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.dont_match = Some(spec.into());
        self
    }

    /// `contains`.
    pub fn contains(mut self, spec: impl Into<ContainsSpec>) -> Self {
        self.contains = Some(spec.into());
        self
    }

    /// `notContains`.
    pub fn not_contains(mut self, spec: impl Into<ContainsSpec>) -> Self {
        self.not_contains = Some(spec.into());
        self
    }

    /// `isIn`: the value must strictly equal one of `values`.
    pub fn is_in<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.is_in = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// `notIn`: the value must not strictly equal any of `values`.
    pub fn not_in<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.not_in = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// `customValidation`.
    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(predicate));
        self
    }

    /// `alphaNum`: ASCII letters and digits only.
    pub fn alpha_num(mut self) -> Self {
        self.alpha_num = true;
        self
    }

    /// `errorText`: replaces the message of any failure on this field.
    pub fn error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }

    /// Replaces the custom predicate in place.
    pub fn set_custom<F>(&mut self, predicate: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(predicate));
    }

    /// Replaces the `match` parameter in place.
    pub fn set_matches(&mut self, spec: impl Into<MatchSpec>) {
        self.matches = Some(spec.into());
    }

    /// Declared type tag, if any.
    #[must_use]
    pub fn type_tag(&self) -> Option<TypeTag> {
        self.ty
    }

    /// Whether `required` is enabled.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The message override, if any.
    #[must_use]
    pub fn override_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    /// Whether `rule` is declared (and enabled) on this field.
    #[must_use]
    pub fn declares(&self, rule: Rule) -> bool {
        match rule {
            Rule::Type => self.ty.is_some(),
            Rule::Required => self.required,
            Rule::IsNumeric => self.numeric,
            Rule::MinValue => self.min_value.is_some(),
            Rule::MaxValue => self.max_value.is_some(),
            Rule::MinLen => self.min_len.is_some(),
            Rule::MaxLen => self.max_len.is_some(),
            Rule::Match => self.matches.is_some(),
            Rule::DontMatch => self.dont_match.is_some(),
            Rule::Contains => self.contains.is_some(),
            Rule::NotContains => self.not_contains.is_some(),
            Rule::IsIn => self.is_in.is_some(),
            Rule::NotIn => self.not_in.is_some(),
            Rule::CustomValidation => self.custom.is_some(),
            Rule::AlphaNum => self.alpha_num,
        }
    }

    /// Declared rules in evaluation order.
    pub fn declared_rules(&self) -> impl Iterator<Item = Rule> + '_ {
        Rule::PRECEDENCE
            .into_iter()
            .filter(|rule| self.declares(*rule))
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("rules", &self.declared_rules().collect::<Vec<_>>())
            .field("error_text", &self.error_text)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn precedence_lists_every_rule_once() {
        let names: Vec<&str> = Rule::PRECEDENCE.iter().map(|r| r.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "type",
                "required",
                "isNumeric",
                "minValue",
                "maxValue",
                "minLen",
                "maxLen",
                "match",
                "dontMatch",
                "contains",
                "notContains",
                "isIn",
                "notIn",
                "customValidation",
                "alphaNum",
            ]
        );
    }

    #[test]
    fn rule_serializes_with_declarative_name() {
        let json = serde_json::to_string(&Rule::CustomValidation).unwrap();
        assert_eq!(json, "\"customValidation\"");
    }

    #[test]
    fn declared_rules_follow_precedence() {
        let rule = FieldRule::new()
            .alpha_num()
            .max_len(30)
            .required()
            .ty(TypeTag::String);
        let declared: Vec<Rule> = rule.declared_rules().collect();
        assert_eq!(
            declared,
            vec![Rule::Type, Rule::Required, Rule::MaxLen, Rule::AlphaNum]
        );
    }

    #[test]
    fn disabled_flags_are_not_declared() {
        let rule = FieldRule::new().with_required(false);
        assert!(!rule.declares(Rule::Required));
        assert_eq!(rule.declared_rules().count(), 0);
    }

    #[test]
    fn computed_match_is_resolved_at_check_time() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let spec = MatchSpec::computed(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Value::from("secret")
        });

        let resolved = spec.resolve();
        assert!(resolved.is_matched_by(&Value::from("secret")));
        assert!(!resolved.is_matched_by(&Value::from("other")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pattern_match_uses_string_form() {
        let spec = MatchSpec::pattern(r"^\d+$").unwrap();
        let resolved = spec.resolve();
        assert!(resolved.is_matched_by(&Value::from(123)));
        assert!(!resolved.is_matched_by(&Value::from(1.5)));
        assert_eq!(resolved.to_string(), r"/^\d+$/");
    }

    #[test]
    fn needles_search_strings_and_arrays() {
        let needle = Needle::from("ru");
        assert!(needle.is_in(&Value::from("rust")));
        assert!(!needle.is_in(&Value::from(vec![Value::from("rust")])));
        assert!(Needle::from("rust").is_in(&Value::from(vec![Value::from("rust")])));
        assert!(Needle::from(1).is_in(&Value::from("a1")));
        assert!(!Needle::from(1).is_in(&Value::from(vec![Value::from("1")])));
        assert!(!needle.is_in(&Value::from(42)));
    }

    #[test]
    fn contains_spec_from_literals_and_groups() {
        assert_eq!(
            ContainsSpec::from("x"),
            ContainsSpec::Literal(Needle::Text("x".into()))
        );
        let grouped = ContainsSpec::groups([vec!["a", "b"], vec!["x"]]);
        assert_eq!(
            grouped,
            ContainsSpec::Groups(vec![
                vec![Needle::from("a"), Needle::from("b")],
                vec![Needle::from("x")],
            ])
        );
        assert!(!grouped.has_empty_group());
        assert!(ContainsSpec::groups([Vec::<&str>::new()]).has_empty_group());
    }

    #[test]
    fn list_rendering() {
        assert_eq!(
            render_list(&[Needle::from("a"), Needle::from(2)]),
            r#"["a", "2"]"#
        );
    }
}
