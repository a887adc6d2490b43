//! Core validation types and traits
//!
//! - **Traits**: [`Validate`]
//! - **Errors**: [`ValidationError`], [`SchemaError`], [`Error`]
//!
//! A validation pass is fail-fast: the first violated rule produces the one
//! [`ValidationError`] the caller sees. Callers decide what to do with it;
//! [`Error::user_message`] implements the usual form policy of showing
//! validation messages verbatim and hiding everything else behind a generic
//! text.

pub mod error;
pub mod traits;

pub use error::{Error, Result, SchemaError, ValidationError};
pub use traits::Validate;
