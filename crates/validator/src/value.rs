//! Dynamic field values
//!
//! Form submissions and API payloads arrive as loosely typed records. [`Value`]
//! is the closed set of shapes the validator understands, and carries the
//! coercions the rule table depends on: truthiness, numeric conversion, the
//! string form used by pattern rules, and the optional `length`.
//!
//! The variant set keeps wrapper objects (`BoxedString`, `BoxedNumber`) and
//! byte buffers apart from their primitive look-alikes so the `type` rule can
//! tell them apart explicitly.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::foundation::SchemaError;

// ============================================================================
// TYPE TAG
// ============================================================================

/// Runtime type tag checked by the `type` rule.
///
/// [`Value::type_tag`] never reports [`TypeTag::Array`]: arrays are objects at
/// runtime, and the rule asks [`Value::is_array`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Primitive string.
    String,
    /// Primitive number.
    Number,
    /// True array.
    Array,
    /// Any object, including `null`, arrays, buffers and boxed primitives.
    Object,
    /// Primitive boolean.
    Boolean,
    /// Arbitrary precision integer.
    BigInt,
    /// Absent value.
    Undefined,
    /// Unique symbol.
    Symbol,
}

impl TypeTag {
    /// Returns the declarative name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Undefined => "undefined",
            Self::Symbol => "symbol",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            "boolean" => Ok(Self::Boolean),
            "bigint" => Ok(Self::BigInt),
            "undefined" => Ok(Self::Undefined),
            "symbol" => Ok(Self::Symbol),
            other => Err(SchemaError::UnknownType(other.to_string())),
        }
    }
}

// ============================================================================
// SYMBOL
// ============================================================================

/// A unique symbol.
///
/// Clones of a symbol are equal to each other; two symbols created
/// separately never are, even with the same description.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Creates a fresh symbol.
    pub fn new(description: impl AsRef<str>) -> Self {
        Self(Arc::from(description.as_ref()))
    }

    /// Returns the symbol's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A single field value.
///
/// Equality (`==`, [`Value::strict_eq`]) is strict: numbers compare as IEEE
/// floats (`NaN` is never equal to itself, `0 == -0`), symbols by identity,
/// and containers structurally. Values of different variants are never equal,
/// so `BoxedString("a") != String("a")`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value. Fields missing from a record read as `Undefined`.
    #[default]
    Undefined,
    /// Explicit `null`.
    Null,
    /// Boolean primitive.
    Bool(bool),
    /// Number primitive.
    Number(f64),
    /// Big integer primitive.
    BigInt(i128),
    /// String primitive.
    String(String),
    /// Symbol primitive.
    Symbol(Symbol),
    /// Array. Holes are represented as `Undefined` elements.
    Array(Vec<Value>),
    /// Plain object with ordered keys.
    Object(IndexMap<String, Value>),
    /// Byte buffer. Has a length but is not an array.
    Bytes(Vec<u8>),
    /// String wrapper object.
    BoxedString(String),
    /// Number wrapper object.
    BoxedNumber(f64),
}

impl Value {
    /// Creates an array of `len` holes.
    #[must_use]
    pub fn sparse_array(len: usize) -> Self {
        Self::Array(vec![Self::Undefined; len])
    }

    /// Creates a byte buffer value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates a fresh symbol value.
    pub fn symbol(description: impl AsRef<str>) -> Self {
        Self::Symbol(Symbol::new(description))
    }

    /// Creates a big integer value.
    #[must_use]
    pub const fn bigint(value: i128) -> Self {
        Self::BigInt(value)
    }

    /// Wraps a string in a string object.
    pub fn boxed_string(value: impl Into<String>) -> Self {
        Self::BoxedString(value.into())
    }

    /// Wraps a number in a number object.
    #[must_use]
    pub const fn boxed_number(value: f64) -> Self {
        Self::BoxedNumber(value)
    }

    /// Returns the runtime type tag. Arrays report [`TypeTag::Object`].
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        match self {
            Self::Undefined => TypeTag::Undefined,
            Self::Bool(_) => TypeTag::Boolean,
            Self::Number(_) => TypeTag::Number,
            Self::BigInt(_) => TypeTag::BigInt,
            Self::String(_) => TypeTag::String,
            Self::Symbol(_) => TypeTag::Symbol,
            Self::Null
            | Self::Array(_)
            | Self::Object(_)
            | Self::Bytes(_)
            | Self::BoxedString(_)
            | Self::BoxedNumber(_) => TypeTag::Object,
        }
    }

    /// Name used in messages; unlike [`Value::type_tag`] it says `array` for arrays.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            other => other.type_tag().as_str(),
        }
    }

    /// True array-ness test. Byte buffers and boxed strings are not arrays.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` for `Undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Truthiness.
    ///
    /// Falsy values are `undefined`, `null`, `false`, `0`, `-0`, `NaN`, `0n`
    /// and the empty string. Everything else, including empty arrays, empty
    /// objects and wrapper objects, is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::BigInt(n) => *n != 0,
            Self::String(s) => !s.is_empty(),
            Self::Symbol(_)
            | Self::Array(_)
            | Self::Object(_)
            | Self::Bytes(_)
            | Self::BoxedString(_)
            | Self::BoxedNumber(_) => true,
        }
    }

    /// Numeric coercion. Returns `NaN` when the value has no numeric reading.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Object(_) | Self::Symbol(_) => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) | Self::BoxedNumber(n) => *n,
            Self::BigInt(n) => *n as f64,
            Self::String(s) | Self::BoxedString(s) => parse_numeric(s),
            Self::Array(_) | Self::Bytes(_) => parse_numeric(&self.to_display_string()),
        }
    }

    /// The value's string form, as used by pattern rules.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    /// Length of strings (in UTF-16 code units), arrays and byte buffers.
    ///
    /// Returns `None` for values without a length.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) | Self::BoxedString(s) => Some(s.encode_utf16().count()),
            Self::Array(items) => Some(items.len()),
            Self::Bytes(bytes) => Some(bytes.len()),
            _ => None,
        }
    }

    /// Strict equality. See the type-level docs for the exact semantics.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        self == other
    }

    /// Relational comparison used by the value bounds.
    ///
    /// Two strings compare lexicographically; anything else is compared
    /// after numeric coercion. Returns `None` when either side is `NaN`.
    #[must_use]
    pub fn loose_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (
                Self::String(a) | Self::BoxedString(a),
                Self::String(b) | Self::BoxedString(b),
            ) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) | Self::BoxedNumber(n) => f.write_str(&format_number(*n)),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::String(s) | Self::BoxedString(s) => f.write_str(s),
            Self::Symbol(symbol) => write!(f, "Symbol({})", symbol.description()),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // holes and nulls join as empty strings
                    if !matches!(item, Self::Undefined | Self::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Object(_) => f.write_str("[object Object]"),
            Self::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

/// Formats a number the way it reads in a form field.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exponential = format!("{n:e}");
        match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponential,
        }
    } else {
        n.to_string()
    }
}

fn parse_numeric(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix_digits = match trimmed.get(..2) {
        Some("0x" | "0X") => Some((16, &trimmed[2..])),
        Some("0o" | "0O") => Some((8, &trimmed[2..])),
        Some("0b" | "0B") => Some((2, &trimmed[2..])),
        _ => None,
    };
    if let Some((radix, digits)) = radix_digits {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return u128::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
