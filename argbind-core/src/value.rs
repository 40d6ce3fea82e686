//! Value coercion.
//!
//! Parameters are declared with a closed [`TypeTag`] (a [`ValueKind`] plus an
//! [`Arity`]). Raw tokens are converted into a [`TypedValue`] carrying the same
//! tag. Coercion is pure and never panics; failures are reported as a
//! [`CoercionFailure`] and turned into contextual errors by the binder.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Boolean,
    Integer,
    Float,
    String,
    #[serde(alias = "date")]
    DateTime,
}

/// Whether a parameter holds one value or a sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    #[default]
    Scalar,
    Array,
}

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    pub kind: ValueKind,
    pub arity: Arity,
}

impl TypeTag {
    pub const fn new(kind: ValueKind, arity: Arity) -> Self {
        Self { kind, arity }
    }

    pub const fn scalar(kind: ValueKind) -> Self {
        Self::new(kind, Arity::Scalar)
    }

    pub const fn array(kind: ValueKind) -> Self {
        Self::new(kind, Arity::Array)
    }

    pub fn is_array(&self) -> bool {
        self.arity == Arity::Array
    }

    /// Flags are scalar booleans; their presence alone binds them.
    pub fn is_flag(&self) -> bool {
        self.kind == ValueKind::Boolean
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Arity::Scalar => write!(f, "{}", self.kind),
            Arity::Array => write!(f, "{}[]", self.kind),
        }
    }
}

/// A bound or default value. The variant always agrees with the owning
/// parameter's [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    IntArray(Vec<i64>),
    Float(f64),
    FloatArray(Vec<f64>),
    Str(String),
    StrArray(Vec<String>),
    DateTime(NaiveDateTime),
    DateTimeArray(Vec<NaiveDateTime>),
}

impl TypedValue {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            TypedValue::Bool(_) => TypeTag::scalar(ValueKind::Boolean),
            TypedValue::Int(_) => TypeTag::scalar(ValueKind::Integer),
            TypedValue::IntArray(_) => TypeTag::array(ValueKind::Integer),
            TypedValue::Float(_) => TypeTag::scalar(ValueKind::Float),
            TypedValue::FloatArray(_) => TypeTag::array(ValueKind::Float),
            TypedValue::Str(_) => TypeTag::scalar(ValueKind::String),
            TypedValue::StrArray(_) => TypeTag::array(ValueKind::String),
            TypedValue::DateTime(_) => TypeTag::scalar(ValueKind::DateTime),
            TypedValue::DateTimeArray(_) => TypeTag::array(ValueKind::DateTime),
        }
    }
}

/// Status returned when a token cannot be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{token}' cannot be read as {expected}")]
pub struct CoercionFailure {
    pub token: String,
    pub expected: TypeTag,
}

impl CoercionFailure {
    fn new(token: &str, expected: TypeTag) -> Self {
        Self {
            token: token.to_string(),
            expected,
        }
    }
}

/// Coerce a single token. For an array tag the result is a one-element array.
pub fn coerce(token: &str, tag: TypeTag) -> Result<TypedValue, CoercionFailure> {
    if tag.is_array() {
        return coerce_array(&[token], tag.kind);
    }
    let fail = || CoercionFailure::new(token, tag);
    match tag.kind {
        ValueKind::Boolean => Err(fail()),
        ValueKind::Integer => parse_integer(token).map(TypedValue::Int).ok_or_else(fail),
        ValueKind::Float => parse_float(token).map(TypedValue::Float).ok_or_else(fail),
        ValueKind::String => Ok(TypedValue::Str(token.to_string())),
        ValueKind::DateTime => parse_datetime(token)
            .map(TypedValue::DateTime)
            .ok_or_else(fail),
    }
}

/// Coerce every token with the element kind, preserving order. The first
/// token that fails is reported.
pub fn coerce_array<S: AsRef<str>>(
    tokens: &[S],
    kind: ValueKind,
) -> Result<TypedValue, CoercionFailure> {
    let tag = TypeTag::array(kind);
    match kind {
        ValueKind::Boolean => {
            let token = tokens.first().map(|t| t.as_ref()).unwrap_or("");
            Err(CoercionFailure::new(token, tag))
        }
        ValueKind::Integer => collect(tokens, tag, parse_integer).map(TypedValue::IntArray),
        ValueKind::Float => collect(tokens, tag, parse_float).map(TypedValue::FloatArray),
        ValueKind::String => Ok(TypedValue::StrArray(
            tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        )),
        ValueKind::DateTime => {
            collect(tokens, tag, parse_datetime).map(TypedValue::DateTimeArray)
        }
    }
}

fn collect<S, T>(
    tokens: &[S],
    tag: TypeTag,
    parse: fn(&str) -> Option<T>,
) -> Result<Vec<T>, CoercionFailure>
where
    S: AsRef<str>,
{
    tokens
        .iter()
        .map(|t| parse(t.as_ref()).ok_or_else(|| CoercionFailure::new(t.as_ref(), tag)))
        .collect()
}

fn parse_integer(token: &str) -> Option<i64> {
    token.parse().ok()
}

// Rust's float parser is locale-independent and always uses '.'
fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_datetime(token: &str) -> Option<NaiveDateTime> {
    if is_iso_shaped(token) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt);
        }
        return NaiveDate::parse_from_str(token, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    if !is_day_first_shaped(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, "%d.%m.%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// Four-digit year followed by a hyphen
fn is_iso_shaped(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

// `DD.MM.YYYY`; chrono's `%Y` alone would take any number of year digits
fn is_day_first_shaped(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'.'
        && bytes[5] == b'.'
        && [0, 1, 3, 4, 6, 7, 8, 9]
            .iter()
            .all(|&i| bytes[i].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const INT: TypeTag = TypeTag::scalar(ValueKind::Integer);
    const FLOAT: TypeTag = TypeTag::scalar(ValueKind::Float);
    const DATE: TypeTag = TypeTag::scalar(ValueKind::DateTime);

    fn date(token: &str) -> NaiveDateTime {
        match coerce(token, DATE) {
            Ok(TypedValue::DateTime(dt)) => dt,
            other => panic!("expected a date for {token}, got {other:?}"),
        }
    }

    #[test]
    fn integers_are_plain_base_ten() {
        assert_eq!(coerce("12345", INT), Ok(TypedValue::Int(12345)));
        assert_eq!(coerce("-7", INT), Ok(TypedValue::Int(-7)));
        assert!(coerce(" 1", INT).is_err());
        assert!(coerce("1 ", INT).is_err());
        assert!(coerce("0x10", INT).is_err());
        assert!(coerce("1.0", INT).is_err());
    }

    #[test]
    fn floats_use_a_dot_separator() {
        assert_eq!(coerce("3.1415927", FLOAT), Ok(TypedValue::Float(3.1415927)));
        assert_eq!(coerce("1e3", FLOAT), Ok(TypedValue::Float(1000.0)));
        assert!(coerce("3,14", FLOAT).is_err());
        assert!(coerce("inf", FLOAT).is_err());
        assert!(coerce("NaN", FLOAT).is_err());
    }

    #[test]
    fn day_first_dates() {
        let dt = date("12.05.2022");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2022, 5, 12));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn iso_dates_win_when_well_formed() {
        let dt = date("2023-12-24");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 12, 24));

        let dt = date("2023-12-24T08:30:00");
        assert_eq!((dt.hour(), dt.minute()), (8, 30));
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(coerce("31.02.2022", DATE).is_err());
        assert!(coerce("2022-13-01", DATE).is_err());
        assert!(coerce("05/12/2022", DATE).is_err());
        assert!(coerce("12.05.22", DATE).is_err());
        assert!(coerce("12.05.02022", DATE).is_err());
        assert!(coerce("1.5.2022", DATE).is_err());
        assert!(coerce("yesterday", DATE).is_err());
    }

    #[test]
    fn strings_are_taken_verbatim() {
        let tag = TypeTag::scalar(ValueKind::String);
        assert_eq!(
            coerce("C:\\boot.ini", tag),
            Ok(TypedValue::Str("C:\\boot.ini".into()))
        );
        assert_eq!(coerce("", tag), Ok(TypedValue::Str(String::new())));
    }

    #[test]
    fn booleans_are_never_read_from_text() {
        assert!(coerce("true", TypeTag::scalar(ValueKind::Boolean)).is_err());
    }

    #[test]
    fn arrays_keep_order_and_report_the_first_bad_token() {
        assert_eq!(
            coerce_array(&["1", "2", "3"], ValueKind::Integer),
            Ok(TypedValue::IntArray(vec![1, 2, 3]))
        );
        let err = coerce_array(&["1", "x", "y"], ValueKind::Integer).unwrap_err();
        assert_eq!(err.token, "x");
        assert_eq!(err.expected, TypeTag::array(ValueKind::Integer));
    }

    #[test]
    fn scalar_coercion_with_array_tag_wraps() {
        assert_eq!(
            coerce("a.txt", TypeTag::array(ValueKind::String)),
            Ok(TypedValue::StrArray(vec!["a.txt".into()]))
        );
    }

    #[test]
    fn value_tags_match_variants() {
        assert_eq!(TypedValue::Bool(true).type_tag(), TypeTag::scalar(ValueKind::Boolean));
        assert_eq!(
            TypedValue::FloatArray(vec![]).type_tag(),
            TypeTag::array(ValueKind::Float)
        );
        assert_eq!(TypeTag::array(ValueKind::DateTime).to_string(), "datetime[]");
    }
}
