//! Prelude module for convenient imports.
//!
//! `use quill_validator::prelude::*;` brings in the types needed to declare
//! schemas, build records and read validation errors.
//!
//! # Examples
//!
//! ```rust,ignore
//! use quill_validator::prelude::*;
//!
//! let schema = Schema::new().field("title", FieldRule::new().required());
//! let error = validate_schema(&schema, &record! { "title" => "" }).unwrap_err();
//! assert_eq!(error.field(), "title");
//! ```

// ============================================================================
// FOUNDATION: Core traits, errors
// ============================================================================

pub use crate::foundation::{Error, SchemaError, Validate, ValidationError};

// ============================================================================
// MODEL: Values, rules, schemas
// ============================================================================

pub use crate::rule::{ContainsSpec, FieldRule, MatchSpec, Needle, Rule};
pub use crate::schema::{Field, Record, Schema};
pub use crate::value::{Symbol, TypeTag, Value};

// ============================================================================
// ENGINE & DEFINITIONS
// ============================================================================

pub use crate::definition::{FieldDefinition, MatchDefinition, SchemaDefinition};
pub use crate::engine::{validate_field, validate_schema};
pub use crate::json::validate_json;

// ============================================================================
// MACROS
// ============================================================================

pub use crate::{record, schema};
