//! Built-in [GraphQL scalars][0] every schema knows about.
//!
//! [0]: https://spec.graphql.org/October2021#sec-Scalars.Built-in-Scalars

use crate::{
    ast::InputValue,
    schema::meta::{MetaType, ScalarMeta},
    value::DefaultScalarValue,
};

/// Metadata of the `Int`, `Float`, `String`, `Boolean` and `ID` scalars.
pub(crate) fn builtin_scalars() -> [MetaType; 5] {
    [
        ScalarMeta::new("Int")
            .description(
                "The `Int` scalar type represents non-fractional signed whole numeric values. \
                 Int can represent values between -(2^31) and 2^31 - 1.",
            )
            .parse_fn(parse_int)
            .into_meta(),
        ScalarMeta::new("Float")
            .description(
                "The `Float` scalar type represents signed double-precision fractional values \
                 as specified by IEEE 754.",
            )
            .parse_fn(parse_float)
            .into_meta(),
        ScalarMeta::new("String")
            .description(
                "The `String` scalar type represents textual data, represented as UTF-8 \
                 character sequences.",
            )
            .parse_fn(parse_string)
            .into_meta(),
        ScalarMeta::new("Boolean")
            .description("The `Boolean` scalar type represents `true` or `false`.")
            .parse_fn(parse_boolean)
            .into_meta(),
        ScalarMeta::new("ID")
            .description(
                "The `ID` scalar type represents a unique identifier. It accepts either a \
                 string or an integer.",
            )
            .parse_fn(parse_id)
            .into_meta(),
    ]
}

fn parse_int(v: &InputValue) -> Result<(), String> {
    match v {
        InputValue::Scalar(DefaultScalarValue::Int(_)) => Ok(()),
        InputValue::Scalar(DefaultScalarValue::Float(f)) if f.fract() == 0.0 => {
            if *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX) {
                Ok(())
            } else {
                Err(format!(
                    "Int cannot represent non 32-bit signed integer value: {v}",
                ))
            }
        }
        _ => Err(format!("Int cannot represent non-integer value: {v}")),
    }
}

fn parse_float(v: &InputValue) -> Result<(), String> {
    match v {
        InputValue::Scalar(DefaultScalarValue::Int(_)) => Ok(()),
        InputValue::Scalar(DefaultScalarValue::Float(f)) if f.is_finite() => Ok(()),
        _ => Err(format!("Float cannot represent non numeric value: {v}")),
    }
}

fn parse_string(v: &InputValue) -> Result<(), String> {
    match v {
        InputValue::Scalar(DefaultScalarValue::String(_)) => Ok(()),
        _ => Err(format!("String cannot represent a non string value: {v}")),
    }
}

fn parse_boolean(v: &InputValue) -> Result<(), String> {
    match v {
        InputValue::Scalar(DefaultScalarValue::Boolean(_)) => Ok(()),
        _ => Err(format!("Boolean cannot represent a non boolean value: {v}")),
    }
}

fn parse_id(v: &InputValue) -> Result<(), String> {
    match v {
        InputValue::Scalar(DefaultScalarValue::String(_) | DefaultScalarValue::Int(_)) => Ok(()),
        _ => Err(format!("ID cannot represent value: {v}")),
    }
}
