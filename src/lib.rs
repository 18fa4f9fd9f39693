#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod ast;
pub mod handler;
pub mod schema;
pub mod tree;
mod types;
pub mod validation;
pub mod value;

#[cfg(test)]
mod tests;

pub use crate::{
    ast::{InputValue, Type},
    handler::{ArgumentValueInfo, ConvertArgumentValueOptions, SchemaNodeHandler},
    schema::{
        SchemaError, meta,
        model::{SchemaType, TypeType},
    },
    tree::{
        SchemaTree, SchemaTreeOptions,
        node::{ArgumentInfo, SchemaNode, SchemaNodeInfo, TypeInfo},
        traverse::{
            HiddenPath, RepeatedTypes, Traversal, TraverseOptions, UnsupportedTraversal, traverse,
            traverse_mut,
        },
    },
    validation::{CoerceInputValue, validate_input_value},
    value::{DefaultScalarValue, ScalarKind, convert_scalar},
};
