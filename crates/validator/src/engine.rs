//! The rule table
//!
//! Validation walks the schema's fields in declaration order and, per field,
//! the checks in [`Rule::PRECEDENCE`] order. Each check looks at its own
//! parameter only and returns `None` when the rule is not declared. The
//! first failing check ends the pass.

use std::cmp::Ordering;

use crate::foundation::ValidationError;
use crate::rule::{ContainsSpec, FieldRule, MatchSpec, Needle, Rule, render_list};
use crate::schema::{Record, Schema};
use crate::value::{TypeTag, Value};

/// Outcome of a single check that failed.
#[derive(Debug)]
struct Failure {
    rule: Rule,
    detail: String,
    params: Vec<(&'static str, String)>,
}

impl Failure {
    fn new(rule: Rule, detail: impl Into<String>) -> Self {
        Self {
            rule,
            detail: detail.into(),
            params: Vec::new(),
        }
    }

    fn with_param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    fn into_error(self, field: &str, error_text: Option<&str>) -> ValidationError {
        let generated = format!("field `{field}` failed {}: {}", self.rule, self.detail);
        let mut error = ValidationError::new(field, self.rule, generated);
        for (key, value) in self.params {
            error = error.with_param(key, value);
        }
        match error_text {
            Some(text) => error.with_override(text.to_string()),
            None => error,
        }
    }
}

type Outcome = Option<Result<(), Failure>>;

type Check = fn(&FieldRule, &Value) -> Outcome;

/// Checks in evaluation order. Must stay aligned with [`Rule::PRECEDENCE`].
const CHECKS: [(Rule, Check); 15] = [
    (Rule::Type, check_type),
    (Rule::Required, check_required),
    (Rule::IsNumeric, check_numeric),
    (Rule::MinValue, check_min_value),
    (Rule::MaxValue, check_max_value),
    (Rule::MinLen, check_min_len),
    (Rule::MaxLen, check_max_len),
    (Rule::Match, check_match),
    (Rule::DontMatch, check_dont_match),
    (Rule::Contains, check_contains),
    (Rule::NotContains, check_not_contains),
    (Rule::IsIn, check_is_in),
    (Rule::NotIn, check_not_in),
    (Rule::CustomValidation, check_custom),
    (Rule::AlphaNum, check_alpha_num),
];

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Validates `data` against `schema`.
///
/// Fields are visited in schema order; fields of `data` that the schema does
/// not declare are never looked at. Returns the first violation.
///
/// # Examples
///
/// ```rust,ignore
/// use quill_validator::prelude::*;
///
/// let schema = Schema::new().field(
///     "foo",
///     FieldRule::new().ty(TypeTag::String).required().min_len(6).max_len(30),
/// );
/// assert!(validate_schema(&schema, &record! { "foo" => "5060AH" }).is_ok());
/// ```
pub fn validate_schema(schema: &Schema, data: &Record) -> Result<(), ValidationError> {
    for (field, rule) in schema.iter() {
        validate_field(field, rule, data.get_or_undefined(field))?;
    }
    Ok(())
}

/// Validates one value against one field's rules.
pub fn validate_field(field: &str, rule: &FieldRule, value: &Value) -> Result<(), ValidationError> {
    tracing::trace!(field, "validating field");
    for (kind, check) in CHECKS {
        let Some(outcome) = check(rule, value) else {
            continue;
        };
        if let Err(failure) = outcome {
            tracing::debug!(field, rule = kind.as_str(), "validation failed");
            return Err(failure.into_error(field, rule.error_text.as_deref()));
        }
    }
    Ok(())
}

// ============================================================================
// CHECKS
// ============================================================================

fn ensure(ok: bool, failure: impl FnOnce() -> Failure) -> Result<(), Failure> {
    if ok { Ok(()) } else { Err(failure()) }
}

fn quoted(value: &Value) -> String {
    format!("\"{value}\"")
}

fn check_type(rule: &FieldRule, value: &Value) -> Outcome {
    let expected = rule.ty?;
    let ok = match expected {
        TypeTag::Array => value.is_array(),
        tag => value.type_tag() == tag,
    };
    Some(ensure(ok, || {
        Failure::new(
            Rule::Type,
            format!("expected type {expected}, got {}", value.type_name()),
        )
        .with_param("expected", expected)
        .with_param("actual", value.type_name())
    }))
}

fn check_required(rule: &FieldRule, value: &Value) -> Outcome {
    if !rule.required {
        return None;
    }
    // `false` is a real answer, every other falsy value is missing input
    let present = matches!(value, Value::Bool(false)) || value.is_truthy();
    Some(ensure(present, || {
        Failure::new(
            Rule::Required,
            format!("a value is required, got {}", quoted(value)),
        )
    }))
}

fn check_numeric(rule: &FieldRule, value: &Value) -> Outcome {
    if !rule.numeric {
        return None;
    }
    Some(ensure(!value.to_number().is_nan(), || {
        Failure::new(
            Rule::IsNumeric,
            format!("expected a numeric value, got {}", quoted(value)),
        )
    }))
}

fn check_min_value(rule: &FieldRule, value: &Value) -> Outcome {
    let bound = rule.min_value.as_ref()?;
    // incomparable values (NaN on either side) never fall below the bound
    let below = value.loose_cmp(bound) == Some(Ordering::Less);
    Some(ensure(!below, || {
        Failure::new(
            Rule::MinValue,
            format!("expected a value of at least {bound}, got {}", quoted(value)),
        )
        .with_param("min", bound)
    }))
}

fn check_max_value(rule: &FieldRule, value: &Value) -> Outcome {
    let bound = rule.max_value.as_ref()?;
    let above = value.loose_cmp(bound) == Some(Ordering::Greater);
    Some(ensure(!above, || {
        Failure::new(
            Rule::MaxValue,
            format!("expected a value of at most {bound}, got {}", quoted(value)),
        )
        .with_param("max", bound)
    }))
}

fn check_min_len(rule: &FieldRule, value: &Value) -> Outcome {
    let min = rule.min_len?;
    Some(match value.length() {
        None => Err(Failure::new(
            Rule::MinLen,
            format!("expected a length of at least {min}, but the value has no length"),
        )
        .with_param("min", min)),
        Some(len) if len < min => Err(Failure::new(
            Rule::MinLen,
            format!("expected a length of at least {min}, got length {len}"),
        )
        .with_param("min", min)
        .with_param("actual", len)),
        Some(_) => Ok(()),
    })
}

fn check_max_len(rule: &FieldRule, value: &Value) -> Outcome {
    let max = rule.max_len?;
    Some(match value.length() {
        None => Err(Failure::new(
            Rule::MaxLen,
            format!("expected a length of at most {max}, but the value has no length"),
        )
        .with_param("max", max)),
        Some(len) if len > max => Err(Failure::new(
            Rule::MaxLen,
            format!("expected a length of at most {max}, got length {len}"),
        )
        .with_param("max", max)
        .with_param("actual", len)),
        Some(_) => Ok(()),
    })
}

fn match_outcome(rule: Rule, spec: &MatchSpec, value: &Value, expect_match: bool) -> Result<(), Failure> {
    let resolved = spec.resolve();
    let matched = resolved.is_matched_by(value);
    ensure(matched == expect_match, || {
        let verb = if expect_match { "to match" } else { "not to match" };
        Failure::new(
            rule,
            format!("expected {verb} {resolved}, got {}", quoted(value)),
        )
        .with_param("expected", &resolved)
    })
}

fn check_match(rule: &FieldRule, value: &Value) -> Outcome {
    let spec = rule.matches.as_ref()?;
    Some(match_outcome(Rule::Match, spec, value, true))
}

fn check_dont_match(rule: &FieldRule, value: &Value) -> Outcome {
    let spec = rule.dont_match.as_ref()?;
    Some(match_outcome(Rule::DontMatch, spec, value, false))
}

fn contains_outcome(rule: Rule, spec: &ContainsSpec, value: &Value, expect_present: bool) -> Outcome {
    // emptiness is the job of `required`
    if !value.is_truthy() {
        return None;
    }
    let verb = if expect_present { "to contain" } else { "not to contain" };
    // only strings and arrays can be shown to lack a needle
    let searchable = Needle::can_search(value);
    Some(match spec {
        ContainsSpec::Literal(needle) => ensure(searchable && needle.is_in(value) == expect_present, || {
            Failure::new(rule, format!("expected {verb} {needle}, got {}", quoted(value)))
                .with_param("needle", needle.as_text())
        }),
        ContainsSpec::Groups(groups) => {
            let failing = groups.iter().find(|group| {
                let any_present = group.iter().any(|needle| needle.is_in(value));
                !searchable || any_present != expect_present
            });
            match failing {
                None => Ok(()),
                Some(group) => {
                    let qualifier = if expect_present { "one of" } else { "any of" };
                    let members = render_list(group);
                    Err(Failure::new(
                        rule,
                        format!("expected {verb} {qualifier} {members}, got {}", quoted(value)),
                    )
                    .with_param("group", members))
                }
            }
        }
    })
}

fn check_contains(rule: &FieldRule, value: &Value) -> Outcome {
    let spec = rule.contains.as_ref()?;
    contains_outcome(Rule::Contains, spec, value, true)
}

fn check_not_contains(rule: &FieldRule, value: &Value) -> Outcome {
    let spec = rule.not_contains.as_ref()?;
    contains_outcome(Rule::NotContains, spec, value, false)
}

fn membership_outcome(rule: Rule, allowed: &[Value], value: &Value, expect_member: bool) -> Outcome {
    if !value.is_truthy() {
        return None;
    }
    let member = allowed.iter().any(|candidate| value.strict_eq(candidate));
    Some(ensure(member == expect_member, || {
        let qualifier = if expect_member { "one of" } else { "none of" };
        let quoted_values: Vec<String> = allowed.iter().map(quoted).collect();
        Failure::new(
            rule,
            format!(
                "expected {qualifier} [{}], got {}",
                quoted_values.join(", "),
                quoted(value)
            ),
        )
    }))
}

fn check_is_in(rule: &FieldRule, value: &Value) -> Outcome {
    let allowed = rule.is_in.as_deref()?;
    membership_outcome(Rule::IsIn, allowed, value, true)
}

fn check_not_in(rule: &FieldRule, value: &Value) -> Outcome {
    let forbidden = rule.not_in.as_deref()?;
    membership_outcome(Rule::NotIn, forbidden, value, false)
}

fn check_custom(rule: &FieldRule, value: &Value) -> Outcome {
    let predicate = rule.custom.as_ref()?;
    Some(ensure(predicate(value), || {
        Failure::new(
            Rule::CustomValidation,
            format!("custom validation rejected {}", quoted(value)),
        )
    }))
}

fn check_alpha_num(rule: &FieldRule, value: &Value) -> Outcome {
    if !rule.alpha_num {
        return None;
    }
    let ok = match value {
        Value::String(text) | Value::BoxedString(text) => {
            text.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        _ => false,
    };
    Some(ensure(ok, || {
        Failure::new(
            Rule::AlphaNum,
            format!("expected only ASCII letters and digits, got {}", quoted(value)),
        )
    }))
}

// ============================================================================
// TESTS
// ============================================================================
