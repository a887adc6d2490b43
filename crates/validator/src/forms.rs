//! Stock schemas for the blog's forms
//!
//! The profile, password and post editor forms validate with these before
//! anything is sent to the API. Request handlers reuse them so both sides
//! agree on what a valid submission is.

use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{FieldRule, MatchSpec};
use crate::schema::Schema;
use crate::value::{TypeTag, Value};

/// Characters allowed in a post slug.
pub const SLUG_PATTERN: &str = "^[a-zA-Z0-9_-]*$";

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("slug pattern compiles"));

/// Returns `true` for a non-empty slug that neither starts nor ends with a
/// separator (`-` or `_`).
///
/// Non-string values are never valid slugs.
pub fn is_valid_slug(value: &Value) -> bool {
    const SEPARATORS: [char; 2] = ['-', '_'];

    match value {
        Value::String(slug) | Value::BoxedString(slug) => {
            !slug.is_empty() && !slug.starts_with(SEPARATORS) && !slug.ends_with(SEPARATORS)
        }
        _ => false,
    }
}

/// `firstName` and `lastName`: required, 2 to 100 characters.
pub fn profile_schema() -> Schema {
    let name = FieldRule::new().required().min_len(2).max_len(100);
    Schema::new()
        .field("firstName", name.clone())
        .field("lastName", name)
}

/// Current password, new password and its repetition.
///
/// Passwords are required, 6 to 30 ASCII alphanumerics. `newPasswordRep`
/// must equal `new_password`, the value currently typed into the new
/// password input.
pub fn password_change_schema(new_password: impl Into<String>) -> Schema {
    let password = FieldRule::new()
        .required()
        .min_len(6)
        .max_len(30)
        .alpha_num();

    Schema::new()
        .field("password", password.clone())
        .field("newPassword", password)
        .field(
            "newPasswordRep",
            FieldRule::new()
                .required()
                .matches(MatchSpec::literal(new_password.into())),
        )
}

/// Optional custom `slug` for a post.
pub fn post_edit_schema() -> Schema {
    Schema::new().field(
        "slug",
        FieldRule::new()
            .with_required(false)
            .matches(SLUG_REGEX.clone())
            .custom(is_valid_slug),
    )
}

/// `title` and `content` of a post: required strings.
pub fn post_content_schema() -> Schema {
    let text = FieldRule::new().ty(TypeTag::String).required();
    Schema::new()
        .field("title", text.clone())
        .field("content", text)
}
