//! # quill-validator
//!
//! Declarative validation of flat records for the Quill blogging platform.
//!
//! A [`Schema`](schema::Schema) maps field names to [`FieldRule`](rule::FieldRule)s.
//! Validation walks the fields in declaration order, checks each field's
//! rules in a fixed order and stops at the first violation, which comes back
//! as a [`ValidationError`](foundation::ValidationError) fit to show to the
//! person filling in the form.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quill_validator::prelude::*;
//!
//! let schema = schema! {
//!     "foo" => FieldRule::new()
//!         .ty(TypeTag::String)
//!         .required()
//!         .min_len(6)
//!         .max_len(30)
//!         .dont_match("FORBIDDEN")
//!         .alpha_num(),
//! };
//!
//! assert!(schema.validate(&record! { "foo" => "5060AH" }).is_ok());
//!
//! let error = schema.validate(&record! { "foo" => "FORBIDDEN" }).unwrap_err();
//! assert_eq!(error.rule(), Rule::DontMatch);
//! ```
//!
//! ## Values
//!
//! Inputs are dynamic [`Value`](value::Value)s with script-like semantics:
//! `typeof`-style type tags, truthiness, numeric coercion and string forms.
//! JSON payloads convert through the [`json`] module.
//!
//! ## Rules
//!
//! `type`, `required`, `isNumeric`, `minValue`, `maxValue`, `minLen`,
//! `maxLen`, `match`, `dontMatch`, `contains`, `notContains`, `isIn`,
//! `notIn`, `customValidation`, `alphaNum`, plus the `errorText` message
//! override. See [`rule`] and [`engine`].
//!
//! ## Definitions
//!
//! Schemas can also be written in JSON and compiled with
//! [`SchemaDefinition`](definition::SchemaDefinition). The [`forms`] module
//! holds the schemas of the blog's own forms.

// ValidationError is the only error the engine returns; boxing it would add
// an allocation to every failed check.
#![allow(clippy::result_large_err)]

pub mod definition;
pub mod engine;
pub mod forms;
pub mod foundation;
pub mod json;
mod macros;
pub mod prelude;
pub mod rule;
pub mod schema;
pub mod value;
