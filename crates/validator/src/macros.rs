//! Literal syntax for records and schemas.
//!
//! - [`record!`] builds a [`Record`](crate::schema::Record) from `name => value` pairs
//! - [`schema!`] builds a [`Schema`](crate::schema::Schema) from `name => rule` pairs
//!
//! Both keep the order the pairs are written in.
//!
//! ```rust,ignore
//! use quill_validator::prelude::*;
//!
//! let schema = schema! {
//!     "title" => FieldRule::new().ty(TypeTag::String).required(),
//!     "views" => FieldRule::new().numeric().min_value(0),
//! };
//! let post = record! { "title" => "Hello", "views" => 12 };
//! assert!(schema.validate(&post).is_ok());
//! ```

// ============================================================================
// RECORD MACRO
// ============================================================================

/// Builds a [`Record`](crate::schema::Record).
///
/// Values go through `Into<Value>`, so string, number and boolean literals
/// can be written directly.
///
/// ```rust,ignore
/// let record = record! { "firstName" => "Ada", "age" => 36, "admin" => false };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::schema::Record::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::schema::Record::new()$(.with($name, $value))+
    };
}

// ============================================================================
// SCHEMA MACRO
// ============================================================================

/// Builds a [`Schema`](crate::schema::Schema).
///
/// ```rust,ignore
/// let schema = schema! {
///     "password" => FieldRule::new().required().min_len(6).alpha_num(),
/// };
/// ```
#[macro_export]
macro_rules! schema {
    () => {
        $crate::schema::Schema::new()
    };
    ($($name:expr => $rule:expr),+ $(,)?) => {
        $crate::schema::Schema::new()$(.field($name, $rule))+
    };
}

// ============================================================================
// TESTS
// ============================================================================
