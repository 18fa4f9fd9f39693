use crate::schema::{SchemaError, model::SchemaType};

pub mod graphql_parser;

/// Conversion of an external schema representation into a [`SchemaType`].
pub trait SchemaTranslator<T> {
    /// Translates the `input` document into a [`SchemaType`].
    ///
    /// # Errors
    ///
    /// If the document describes an inconsistent schema.
    fn translate_schema(input: &T) -> Result<SchemaType, SchemaError>;
}
