//! Core validation trait
//!
//! [`Validate`] is the seam every validator in the crate implements: a
//! [`Schema`](crate::schema::Schema) validates whole records, a
//! [`Field`](crate::schema::Field) validates a single value.

use crate::foundation::ValidationError;

/// The core trait that all validators implement.
///
/// # Examples
///
/// ```rust,ignore
/// use quill_validator::prelude::*;
///
/// let schema = Schema::new().field("title", FieldRule::new().required());
/// assert!(schema.validate(&record! { "title" => "Hello" }).is_ok());
/// ```
pub trait Validate {
    /// The type of input being validated.
    type Input: ?Sized;

    /// Validates the input, returning the first violation.
    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError>;

    /// Returns `true` when [`Validate::validate`] succeeds.
    fn is_valid(&self, input: &Self::Input) -> bool {
        self.validate(input).is_ok()
    }
}

impl<V: Validate + ?Sized> Validate for &V {
    type Input = V::Input;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        (**self).validate(input)
    }
}
