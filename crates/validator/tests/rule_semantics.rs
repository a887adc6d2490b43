//! Rule-by-rule behaviour of the validation engine.

use pretty_assertions::assert_eq;
use quill_validator::prelude::*;
use rstest::rstest;
use serde_json::json;

fn check(rule: FieldRule, value: impl Into<Value>) -> Result<(), ValidationError> {
    validate_field("field", &rule, &value.into())
}

// ============================================================================
// TYPE
// ============================================================================

#[rstest]
#[case(Value::from("x"), TypeTag::String, true)]
#[case(Value::from(1), TypeTag::Number, true)]
#[case(Value::from(true), TypeTag::Boolean, true)]
#[case(Value::bigint(1), TypeTag::BigInt, true)]
#[case(Value::Undefined, TypeTag::Undefined, true)]
#[case(Value::symbol("id"), TypeTag::Symbol, true)]
#[case(Value::Null, TypeTag::Object, true)]
#[case(Value::from(json!({"a": 1})), TypeTag::Object, true)]
#[case(Value::from("1"), TypeTag::Number, false)]
#[case(Value::from(1), TypeTag::String, false)]
#[case(Value::bigint(1), TypeTag::Number, false)]
#[case(Value::Null, TypeTag::Undefined, false)]
fn type_tags(#[case] value: Value, #[case] tag: TypeTag, #[case] passes: bool) {
    assert_eq!(check(FieldRule::new().ty(tag), value).is_ok(), passes);
}

#[rstest]
#[case(Value::from_iter([Value::from(1), Value::from(2), Value::from(3)]), true)]
#[case(Value::sparse_array(10), true)]
#[case(Value::Array(Vec::new()), true)]
#[case(Value::bytes(vec![1, 2, 3]), false)]
#[case(Value::boxed_string("abc"), false)]
#[case(Value::from(json!({"0": "a", "length": 1})), false)]
#[case(Value::from("abc"), false)]
fn array_tag_means_a_true_array(#[case] value: Value, #[case] passes: bool) {
    assert_eq!(check(FieldRule::new().ty(TypeTag::Array), value).is_ok(), passes);
}

#[test]
fn arrays_are_also_objects() {
    let list = Value::from_iter([Value::from(1)]);
    assert!(check(FieldRule::new().ty(TypeTag::Object), list).is_ok());
}

#[test]
fn wrapper_objects_are_not_primitives() {
    let string = FieldRule::new().ty(TypeTag::String);
    assert_eq!(
        check(string.clone(), Value::boxed_string("abc")).unwrap_err().rule(),
        Rule::Type
    );
    assert!(check(string, "abc").is_ok());

    let number = FieldRule::new().ty(TypeTag::Number);
    assert!(check(number, Value::boxed_number(1.0)).is_err());
    assert!(check(FieldRule::new().ty(TypeTag::Object), Value::boxed_number(1.0)).is_ok());
}

#[test]
fn symbols_are_not_strings() {
    let error = check(FieldRule::new().ty(TypeTag::String), Value::symbol("name")).unwrap_err();
    assert_eq!(error.rule(), Rule::Type);
    assert_eq!(error.param("expected"), Some("string"));
    assert_eq!(error.param("actual"), Some("symbol"));
}

#[test]
fn type_failure_names_both_types() {
    let error = check(FieldRule::new().ty(TypeTag::String), 5).unwrap_err();
    assert_eq!(error.param("expected"), Some("string"));
    assert_eq!(error.param("actual"), Some("number"));
}

// ============================================================================
// REQUIRED
// ============================================================================

#[rstest]
#[case(Value::from(false), true)]
#[case(Value::from_iter(Vec::<Value>::new()), true)]
#[case(Value::from(json!({})), true)]
#[case(Value::from(-1), true)]
#[case(Value::from(0), false)]
#[case(Value::from(f64::NAN), false)]
#[case(Value::bigint(0), false)]
#[case(Value::from(""), false)]
#[case(Value::Null, false)]
#[case(Value::Undefined, false)]
fn required_accepts_false_but_no_other_falsy(#[case] value: Value, #[case] passes: bool) {
    assert_eq!(check(FieldRule::new().required(), value).is_ok(), passes);
}

#[test]
fn absent_fields_fail_required() {
    let schema = Schema::new().field("title", FieldRule::new().required());
    let error = schema.validate(&Record::new()).unwrap_err();
    assert_eq!(error.field(), "title");
    assert_eq!(error.rule(), Rule::Required);
}

// ============================================================================
// BOUNDS
// ============================================================================

#[test]
fn zero_bounds_are_real_bounds() {
    assert!(check(FieldRule::new().min_value(0), 0).is_ok());
    assert!(check(FieldRule::new().min_value(0), -0.5).is_err());
    assert!(check(FieldRule::new().max_len(0), "").is_ok());
    assert_eq!(check(FieldRule::new().max_len(0), "a").unwrap_err().rule(), Rule::MaxLen);
    assert!(check(FieldRule::new().min_len(0), "").is_ok());
}

#[test]
fn length_counts_utf16_units() {
    let rule = FieldRule::new().min_len(3).max_len(3);
    assert!(check(rule.clone(), "äöü").is_ok());
    assert!(check(rule.clone(), "a😀").is_ok());
    assert!(check(rule.clone(), Value::from_iter([Value::Null, Value::Null, Value::Null])).is_ok());
    assert!(check(rule, Value::bytes(vec![0, 0, 0])).is_ok());
}

#[test]
fn astral_characters_count_twice() {
    let error = check(FieldRule::new().max_len(1), "😀").unwrap_err();
    assert_eq!(error.rule(), Rule::MaxLen);
    assert_eq!(error.param("actual"), Some("2"));
}

#[test]
fn values_without_length_fail_length_rules() {
    let error = check(FieldRule::new().min_len(1), 42).unwrap_err();
    assert_eq!(error.rule(), Rule::MinLen);
    assert_eq!(error.param("actual"), None);
}

#[test]
fn first_rule_in_order_is_reported() {
    let error = check(FieldRule::new().min_len(6).max_len(30), "abc").unwrap_err();
    assert_eq!(error.rule(), Rule::MinLen);
    assert_eq!(error.param("min"), Some("6"));
    assert_eq!(error.param("actual"), Some("3"));

    let error = check(FieldRule::new().min_len(6).min_value(10), "5").unwrap_err();
    assert_eq!(error.rule(), Rule::MinValue);

    let error = check(FieldRule::new().alpha_num().ty(TypeTag::String).required(), "").unwrap_err();
    assert_eq!(error.rule(), Rule::Required);
}

#[test]
fn strings_compare_as_strings() {
    let rule = FieldRule::new().min_value("b");
    assert!(check(rule.clone(), "c").is_ok());
    assert!(check(rule, "abc").is_err());
}

// ============================================================================
// MATCH
// ============================================================================

#[test]
fn patterns_test_the_string_form() {
    let rule = FieldRule::new().matches(MatchSpec::pattern(r"^\d{3}$").unwrap());
    assert!(check(rule.clone(), "123").is_ok());
    assert!(check(rule.clone(), 123).is_ok());
    let error = check(rule, "12a").unwrap_err();
    assert_eq!(error.rule(), Rule::Match);
    assert_eq!(error.param("expected"), Some(r"/^\d{3}$/"));
}

#[test]
fn large_numbers_match_in_exponent_form() {
    let rule = FieldRule::new().matches(MatchSpec::pattern(r"e\+21$").unwrap());
    assert!(check(rule.clone(), 1e21).is_ok());
    assert!(check(rule, 1e20).is_err());

    let rule = FieldRule::new().matches(MatchSpec::pattern(r"^1e-7$").unwrap());
    assert!(check(rule, 1e-7).is_ok());
}

#[test]
fn literals_use_strict_equality() {
    let rule = FieldRule::new().matches(5);
    assert!(check(rule.clone(), 5).is_ok());
    assert!(check(rule, "5").is_err());
}

#[test]
fn computed_values_are_read_at_check_time() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    let current = Arc::new(AtomicU32::new(1));
    let source = Arc::clone(&current);
    let rule = FieldRule::new().matches(MatchSpec::computed(move || {
        Value::from(source.load(Ordering::SeqCst))
    }));

    assert!(check(rule.clone(), 1).is_ok());
    current.store(2, Ordering::SeqCst);
    assert!(check(rule.clone(), 1).is_err());
    assert!(check(rule, 2).is_ok());
}

#[test]
fn dont_match_rejects_the_forbidden_value() {
    let rule = FieldRule::new().dont_match("FORBIDDEN");
    assert!(check(rule.clone(), "allowed").is_ok());
    assert_eq!(check(rule, "FORBIDDEN").unwrap_err().rule(), Rule::DontMatch);
}

// ============================================================================
// CONTAINS
// ============================================================================

#[test]
fn grouped_contains_reports_the_failing_group() {
    let rule = FieldRule::new().contains(ContainsSpec::groups([vec!["rust", "go"], vec!["news"]]));

    let tags = Value::from_iter([Value::from("go"), Value::from("news")]);
    assert!(check(rule.clone(), tags).is_ok());
    assert!(check(rule.clone(), "rust news").is_ok());

    let error = validate_field("tags", &rule, &Value::from("rust is great")).unwrap_err();
    assert_eq!(error.rule(), Rule::Contains);
    assert_eq!(error.param("group"), Some(r#"["news"]"#));
    insta::assert_snapshot!(
        error.message(),
        @r#"field `tags` failed contains: expected to contain one of ["news"], got "rust is great""#
    );
}

#[test]
fn grouped_not_contains_rejects_any_member() {
    let rule = FieldRule::new().not_contains(ContainsSpec::groups([vec!["spam", "scam"]]));
    assert!(check(rule.clone(), "a fine post").is_ok());

    let error = check(rule, "obvious scam").unwrap_err();
    assert_eq!(error.rule(), Rule::NotContains);
    assert_eq!(error.param("group"), Some(r#"["spam", "scam"]"#));
}

#[test]
fn not_contains_rejects_values_it_cannot_search() {
    let rule = FieldRule::new().not_contains("x");
    assert_eq!(check(rule.clone(), 42).unwrap_err().rule(), Rule::NotContains);
    assert!(check(rule.clone(), json!({ "a": 1 })).is_err());
    assert!(check(rule.clone(), true).is_err());
    assert!(check(rule.clone(), Value::from_iter([Value::from("y")])).is_ok());
    assert!(check(rule, "yyy").is_ok());

    let grouped = FieldRule::new().not_contains(ContainsSpec::groups([vec!["spam"]]));
    assert!(check(grouped, 7).is_err());
}

#[test]
fn array_haystacks_compare_elements() {
    let rule = FieldRule::new().contains(2);
    assert!(check(rule.clone(), Value::from_iter([Value::from(1), Value::from(2)])).is_ok());
    assert!(check(rule, Value::from_iter([Value::from("2")])).is_err());
}

#[test]
fn falsy_values_skip_contains_and_membership() {
    assert!(check(FieldRule::new().contains("x"), "").is_ok());
    assert!(check(FieldRule::new().is_in(["a"]), Value::Undefined).is_ok());
    assert!(check(FieldRule::new().not_in([0]), 0).is_ok());
}

// ============================================================================
// MEMBERSHIP
// ============================================================================

#[test]
fn membership_uses_strict_equality() {
    let status = FieldRule::new().is_in(["draft", "published"]);
    assert!(check(status.clone(), "draft").is_ok());
    assert_eq!(check(status, "archived").unwrap_err().rule(), Rule::IsIn);

    let reserved = FieldRule::new().not_in(["admin", "root"]);
    assert!(check(reserved.clone(), "ada").is_ok());
    assert_eq!(check(reserved, "root").unwrap_err().rule(), Rule::NotIn);

    assert!(check(FieldRule::new().is_in([1]), "1").is_err());
}

// ============================================================================
// ALPHANUM
// ============================================================================

#[rstest]
#[case(Value::from("abc123"), true)]
#[case(Value::from("ABCxyz"), true)]
#[case(Value::from(""), true)]
#[case(Value::from("héllo"), false)]
#[case(Value::from("a b"), false)]
#[case(Value::from("a-b"), false)]
#[case(Value::from(123), false)]
fn alpha_num_is_ascii_only(#[case] value: Value, #[case] passes: bool) {
    assert_eq!(check(FieldRule::new().alpha_num(), value).is_ok(), passes);
}

// ============================================================================
// ERROR TEXT
// ============================================================================

#[test]
fn error_text_replaces_any_message() {
    let rule = FieldRule::new()
        .required()
        .min_len(6)
        .alpha_num()
        .error_text("Password must be 6+ letters or digits");

    for value in ["", "abc", "abc def"] {
        let error = check(rule.clone(), value).unwrap_err();
        assert_eq!(error.message(), "Password must be 6+ letters or digits");
        assert_eq!(error.to_string(), "Password must be 6+ letters or digits");
        assert!(error.is_overridden());
    }
    assert!(check(rule, "abcdef").is_ok());
}

// ============================================================================
// SCHEMA
// ============================================================================

#[test]
fn declaration_order_decides_the_reported_field() {
    let a = FieldRule::new().required();
    let b = FieldRule::new().min_len(5);
    let record = record! { "b" => "abc" };

    let ab = schema! { "a" => a.clone(), "b" => b.clone() };
    assert_eq!(ab.validate(&record).unwrap_err().field(), "a");

    let ba = schema! { "b" => b, "a" => a };
    assert_eq!(ba.validate(&record).unwrap_err().field(), "b");
}

#[test]
fn undeclared_fields_are_ignored() {
    let schema = schema! { "title" => FieldRule::new().required() };
    let record = record! { "title" => "Hello", "extra" => Value::symbol("anything") };
    assert!(schema.validate(&record).is_ok());
}

#[test]
fn end_to_end_password_like_field() {
    let schema = schema! {
        "foo" => FieldRule::new()
            .ty(TypeTag::String)
            .required()
            .min_len(6)
            .max_len(30)
            .dont_match("FORBIDDEN")
            .alpha_num(),
    };

    assert!(schema.validate(&record! { "foo" => "5060AH" }).is_ok());

    let error = schema.validate(&record! { "foo" => "FORBIDDEN" }).unwrap_err();
    assert_eq!(error.field(), "foo");
    assert_eq!(error.rule(), Rule::DontMatch);
    assert!(error.message().contains("dontMatch"));
    assert!(error.message().contains("FORBIDDEN"));
    insta::assert_snapshot!(
        error.message(),
        @r#"field `foo` failed dontMatch: expected not to match "FORBIDDEN", got "FORBIDDEN""#
    );
}
