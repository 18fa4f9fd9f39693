//! Input value coercion against a schema

mod input_value;

pub use self::input_value::{CoerceInputValue, validate_input_value};
