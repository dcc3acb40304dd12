//! Helpers over Polars `AnyValue` cells.

use polars::prelude::AnyValue;

/// Render a cell as text, keeping `Null` distinct from `""`.
///
/// Floats drop a trailing `.0` so `1.0` and `1` produce the same key.
///
/// ```
/// use polars::prelude::AnyValue;
/// use rds_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::Float64(2.0)), Some("2".to_string()));
/// assert_eq!(any_to_text(AnyValue::Boolean(true)), Some("true".to_string()));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => other.to_string(),
    };
    Some(text)
}

/// True for a null cell or an empty string. Whitespace is not empty.
///
/// ```
/// use polars::prelude::AnyValue;
/// use rds_common::is_null_or_empty;
///
/// assert!(is_null_or_empty(&AnyValue::Null));
/// assert!(is_null_or_empty(&AnyValue::String("")));
/// assert!(!is_null_or_empty(&AnyValue::String(" ")));
/// assert!(!is_null_or_empty(&AnyValue::Int64(0)));
/// ```
pub fn is_null_or_empty(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.is_empty(),
        AnyValue::StringOwned(s) => s.is_empty(),
        _ => false,
    }
}

/// Format a float without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = v.to_string();
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// A numeric cell, kept integral when it has no fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

/// Numeric form of a cell, if it has one.
///
/// Integer cells convert directly. Floats and numeric text become
/// [`Numeric::Int`] when they have no fraction and fit in `i64`, otherwise
/// [`Numeric::Float`]. Booleans, non-finite floats and everything else give
/// `None`.
pub fn any_to_numeric(value: AnyValue<'_>) -> Option<Numeric> {
    match value {
        AnyValue::Int8(v) => Some(Numeric::Int(i64::from(v))),
        AnyValue::Int16(v) => Some(Numeric::Int(i64::from(v))),
        AnyValue::Int32(v) => Some(Numeric::Int(i64::from(v))),
        AnyValue::Int64(v) => Some(Numeric::Int(v)),
        AnyValue::UInt8(v) => Some(Numeric::Int(i64::from(v))),
        AnyValue::UInt16(v) => Some(Numeric::Int(i64::from(v))),
        AnyValue::UInt32(v) => Some(Numeric::Int(i64::from(v))),
        AnyValue::UInt64(v) => Some(i64::try_from(v).map_or(Numeric::Float(v as f64), Numeric::Int)),
        AnyValue::Float32(v) => float_numeric(f64::from(v)),
        AnyValue::Float64(v) => float_numeric(v),
        AnyValue::String(s) => parse_numeric(s),
        AnyValue::StringOwned(s) => parse_numeric(&s),
        _ => None,
    }
}

/// Parse numeric text.
///
/// ```
/// use rds_common::{Numeric, parse_numeric};
///
/// assert_eq!(parse_numeric(" 12 "), Some(Numeric::Int(12)));
/// assert_eq!(parse_numeric("12.0"), Some(Numeric::Int(12)));
/// assert_eq!(parse_numeric("12.5"), Some(Numeric::Float(12.5)));
/// assert_eq!(parse_numeric("twelve"), None);
/// ```
pub fn parse_numeric(value: &str) -> Option<Numeric> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(Numeric::Int(v));
    }
    trimmed.parse::<f64>().ok().and_then(float_numeric)
}

fn float_numeric(v: f64) -> Option<Numeric> {
    if !v.is_finite() {
        return None;
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        return Some(Numeric::Int(v as i64));
    }
    Some(Numeric::Float(v))
}
