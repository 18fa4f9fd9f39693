//! Schema model the tree is built from.

pub mod meta;
pub mod model;
pub mod translate;

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};

/// Error of acquiring or assembling a [`SchemaType`](model::SchemaType).
#[derive(Debug, Display, Error)]
pub enum SchemaError {
    /// The schema definition language source failed to parse.
    #[display("Failed to parse schema: {_0}")]
    Parse(#[error(not(source))] String),

    /// The schema source couldn't be read.
    #[display("Failed to read schema file \"{path}\": {source}")]
    Io {
        /// Path of the schema file.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The same type name was defined twice.
    #[display("Type \"{_0}\" is defined more than once")]
    DuplicateType(#[error(not(source))] ArcStr),

    /// A field, argument or member refers to a type which isn't defined.
    #[display("Unknown type \"{type_name}\" referenced by \"{referenced_by}\"")]
    UnknownType {
        /// Name of the missing type.
        type_name: ArcStr,
        /// Dotted name of the referencing item, e.g. `User.friends`.
        referenced_by: String,
    },

    /// A root operation type is declared but not defined.
    #[display("Root operation type \"{_0}\" is not defined")]
    UnknownRootType(#[error(not(source))] ArcStr),
}
