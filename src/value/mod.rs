mod scalar;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ast::InputValue;

pub use self::scalar::DefaultScalarValue;

/// Leading decimal integer, as accepted by a lenient integer parse.
static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid integer regex"));

/// Leading decimal floating point literal, optionally with an exponent.
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
});

/// How a raw string is turned into a typed value by [`convert_scalar()`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ScalarKind {
    /// Kept as is.
    #[default]
    String,
    /// Parsed as a leading decimal integer; truncates fractions.
    Int,
    /// Parsed as a leading floating point literal.
    Float,
    /// `"true"` and `"false"` only, anything else becomes `null`.
    Boolean,
    /// Any other scalar (`ID`, enums, custom scalars), kept as a string.
    Custom,
}

impl ScalarKind {
    /// Picks the conversion for a named GraphQL type.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "String" => Self::String,
            "Int" => Self::Int,
            "Float" => Self::Float,
            "Boolean" => Self::Boolean,
            _ => Self::Custom,
        }
    }
}

/// Converts a raw user-entered string into a typed [`InputValue`].
///
/// Unparsable numbers are not errors: they yield a `NaN` float, which callers
/// detect with [`InputValue::is_nan()`].
pub fn convert_scalar(raw: &str, kind: ScalarKind) -> InputValue {
    match kind {
        ScalarKind::String | ScalarKind::Custom => InputValue::scalar(raw),
        ScalarKind::Int => InputValue::Scalar(parse_int(raw)),
        ScalarKind::Float => InputValue::Scalar(DefaultScalarValue::Float(parse_float(raw))),
        ScalarKind::Boolean => match raw {
            "true" => InputValue::scalar(true),
            "false" => InputValue::scalar(false),
            _ => InputValue::Null,
        },
    }
}

fn parse_int(raw: &str) -> DefaultScalarValue {
    let Some(digits) = INT_PREFIX.find(raw.trim_start()) else {
        return DefaultScalarValue::Float(f64::NAN);
    };
    match digits.as_str().parse::<i32>() {
        Ok(i) => DefaultScalarValue::Int(i),
        Err(_) => DefaultScalarValue::Float(digits.as_str().parse().unwrap_or(f64::NAN)),
    }
}

fn parse_float(raw: &str) -> f64 {
    let raw = raw.trim_start();
    for (literal, value) in [
        ("Infinity", f64::INFINITY),
        ("+Infinity", f64::INFINITY),
        ("-Infinity", f64::NEG_INFINITY),
    ] {
        if raw.starts_with(literal) {
            return value;
        }
    }
    FLOAT_PREFIX
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ScalarKind, convert_scalar};
    use crate::ast::InputValue;

    #[test]
    fn converts_ints_like_a_lenient_parser() {
        assert_eq!(convert_scalar("10", ScalarKind::Int), InputValue::scalar(10));
        assert_eq!(convert_scalar("-5", ScalarKind::Int), InputValue::scalar(-5));
        assert_eq!(convert_scalar("3.14", ScalarKind::Int), InputValue::scalar(3));
        assert_eq!(convert_scalar("  42abc", ScalarKind::Int), InputValue::scalar(42));
        assert!(convert_scalar("true", ScalarKind::Int).is_nan());
        assert!(convert_scalar("test", ScalarKind::Int).is_nan());
        assert_eq!(
            convert_scalar("99999999999", ScalarKind::Int),
            InputValue::scalar(99_999_999_999.0),
        );
    }

    #[test]
    fn converts_floats() {
        assert_eq!(convert_scalar("3", ScalarKind::Float), InputValue::scalar(3.0));
        assert_eq!(convert_scalar("2.5", ScalarKind::Float), InputValue::scalar(2.5));
        assert_eq!(convert_scalar("-55.83", ScalarKind::Float), InputValue::scalar(-55.83));
        assert_eq!(convert_scalar("1e3x", ScalarKind::Float), InputValue::scalar(1000.0));
        assert_eq!(
            convert_scalar("-Infinity", ScalarKind::Float),
            InputValue::scalar(f64::NEG_INFINITY),
        );
        assert!(convert_scalar("test", ScalarKind::Float).is_nan());
    }

    #[test]
    fn converts_booleans_strictly() {
        assert_eq!(convert_scalar("true", ScalarKind::Boolean), InputValue::scalar(true));
        assert_eq!(convert_scalar("false", ScalarKind::Boolean), InputValue::scalar(false));
        assert_eq!(convert_scalar("0", ScalarKind::Boolean), InputValue::Null);
        assert_eq!(convert_scalar("True", ScalarKind::Boolean), InputValue::Null);
    }

    #[test]
    fn keeps_strings_and_custom_scalars() {
        assert_eq!(convert_scalar("t2y", ScalarKind::String), InputValue::scalar("t2y"));
        assert_eq!(convert_scalar("3.14", ScalarKind::Custom), InputValue::scalar("3.14"));
        assert_eq!(ScalarKind::from_type_name("ID"), ScalarKind::Custom);
        assert_eq!(ScalarKind::from_type_name("Int"), ScalarKind::Int);
    }
}
