//! Nodes of a [`SchemaTree`](super::SchemaTree) and the type information
//! they carry.

use std::fmt;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{
    Serialize,
    ser::{SerializeMap as _, Serializer},
};
use tracing::warn;

use crate::{
    ast::{InputValue, Type},
    schema::{
        meta::{Argument, Field, MetaType},
        model::{SchemaType, TypeType},
    },
};

/// Prefix GraphQL reserves for its introspection fields.
///
/// Fields named with it are schema internals and never become tree nodes.
pub const RESERVED_FIELD_PREFIX: &str = "__";

/// Key under which a serialized [`SchemaNode`] stores its [`SchemaNodeInfo`].
pub const INFO_KEY: &str = "__info";

/// Upper bound of wrapper layers [`TypeInfo::new()`] looks through.
const MAX_UNWRAP_STEPS: usize = 8;

/// Checks whether the field `name` is reserved for introspection.
pub fn is_internal_field(name: &str) -> bool {
    name.starts_with(RESERVED_FIELD_PREFIX)
}

/// Canonical description of a (possibly wrapped) type reference.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo<'a> {
    /// Innermost named type.
    #[serde(rename = "typeName", serialize_with = "serialize_meta_name")]
    pub base_type: &'a MetaType,

    /// Whether any layer of the reference is a list.
    pub is_list: bool,

    /// Whether any layer of the reference is non-null.
    pub is_non_null: bool,

    /// Whether the [`base_type`](TypeInfo::base_type) has already been seen
    /// by a repeated type marking pass.
    pub is_appeared: bool,
}

impl<'a> TypeInfo<'a> {
    /// Unwraps the list and non-null layers of a type reference, accumulating
    /// them into flags.
    pub fn new(ty: &TypeType<'a>) -> Self {
        let (mut is_list, mut is_non_null) = (false, false);
        let mut current = ty;
        for _ in 0..MAX_UNWRAP_STEPS {
            match current {
                TypeType::Concrete(_) => break,
                TypeType::List(inner) => {
                    is_list = true;
                    current = inner;
                }
                TypeType::NonNull(inner) => {
                    is_non_null = true;
                    current = inner;
                }
            }
        }
        Self {
            base_type: current.innermost_concrete(),
            is_list,
            is_non_null,
            is_appeared: false,
        }
    }

    /// Describes an unwrapped named type.
    pub fn named(base_type: &'a MetaType) -> Self {
        Self::new(&TypeType::Concrete(base_type))
    }

    /// Name of the [`base_type`](TypeInfo::base_type).
    pub fn type_name(&self) -> &'a str {
        self.base_type.name()
    }

    /// Object types are the only ones expanded into child nodes.
    pub fn is_object(&self) -> bool {
        self.base_type.is_object()
    }

    /// Input objects are the only types arguments can be descended into.
    pub fn is_input_object(&self) -> bool {
        self.base_type.is_input_object()
    }

    /// Compares the identity of the base types.
    pub fn is_same_type(&self, other: &MetaType) -> bool {
        self.base_type.name() == other.name()
    }
}

impl fmt::Display for TypeInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_type.name())
    }
}

/// An argument of a field, or a field of an input object reached through one.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentInfo<'a> {
    /// Name of the argument.
    pub name: ArcStr,

    /// Optional description.
    pub description: Option<ArcStr>,

    /// Type reference exactly as declared, wrappers included.
    #[serde(rename = "type", serialize_with = "serialize_display")]
    pub arg_type: Type,

    /// Unwrapped [`arg_type`](ArgumentInfo::arg_type).
    pub type_info: TypeInfo<'a>,

    /// Declared default value, if any.
    pub default_value: Option<InputValue>,
}

impl<'a> ArgumentInfo<'a> {
    /// Resolves the `argument` against the `schema`.
    ///
    /// Returns `None` if its type isn't registered in the `schema`.
    pub fn new(argument: &Argument, schema: &'a SchemaType) -> Option<Self> {
        let ty = schema.make_type(&argument.arg_type)?;
        Some(Self {
            name: argument.name.clone(),
            description: argument.description.clone(),
            arg_type: argument.arg_type.clone(),
            type_info: TypeInfo::new(&ty),
            default_value: argument.default_value.clone(),
        })
    }

    /// Declared fields of the input object this argument accepts, if it
    /// accepts one.
    pub fn input_fields(&self) -> Option<&'a [Argument]> {
        self.type_info.base_type.input_fields()
    }
}

/// Information about the position and type of a [`SchemaNode`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNodeInfo<'a> {
    /// Field name, or the lower-cased type name for a root.
    pub name: String,

    /// Last segment of [`parent_path`](SchemaNodeInfo::parent_path).
    pub parent_name: String,

    /// Path of the parent node, empty for a root.
    pub parent_path: String,

    /// Dot-separated path of this node.
    pub path: String,

    /// Arguments of the field.
    pub args: Vec<ArgumentInfo<'a>>,

    /// Type of the field.
    #[serde(rename = "type")]
    pub type_info: TypeInfo<'a>,

    /// Names of the child fields, in declaration order.
    pub children: Vec<String>,

    /// Distance from the root of the tree the node was built in.
    pub depth: usize,

    /// Whether this is an object node left unexpanded because the tree's
    /// maximum depth was reached.
    pub is_max_depth: bool,
}

/// A node of a [`SchemaTree`](super::SchemaTree): its own information plus the
/// nodes of its child fields.
///
/// Cloning a node copies the whole subtree, so the clone never shares
/// [`TypeInfo::is_appeared`] flags with the original.
#[derive(Clone, Debug)]
pub struct SchemaNode<'a> {
    /// Information about this node.
    pub info: SchemaNodeInfo<'a>,
    pub(crate) fields: IndexMap<String, SchemaNode<'a>>,
}

impl<'a> SchemaNode<'a> {
    /// Creates the node of the `field` under the node at `parent_path`.
    ///
    /// The node has no children yet. Returns `None` if the type of the
    /// `field` or of one of its arguments isn't registered in the `schema`.
    pub fn new(
        name: &str,
        parent_path: &str,
        field: &Field,
        depth: usize,
        schema: &'a SchemaType,
    ) -> Option<Self> {
        let Some(field_type) = schema.make_type(&field.field_type) else {
            warn!(
                field = %field.name,
                field_type = %field.field_type,
                "field type is not defined in the schema",
            );
            return None;
        };
        let args = field
            .arguments()
            .iter()
            .map(|arg| ArgumentInfo::new(arg, schema))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            info: SchemaNodeInfo {
                name: name.into(),
                parent_name: parent_path.rsplit('.').next().unwrap_or_default().into(),
                parent_path: parent_path.into(),
                path: format!("{parent_path}.{name}"),
                args,
                type_info: TypeInfo::new(&field_type),
                children: vec![],
                depth,
                is_max_depth: false,
            },
            fields: IndexMap::new(),
        })
    }

    /// Creates a root node for the named type `base_type`.
    pub fn root(name: &str, base_type: &'a MetaType) -> Self {
        Self {
            info: SchemaNodeInfo {
                name: name.into(),
                parent_name: String::new(),
                parent_path: String::new(),
                path: name.into(),
                args: vec![],
                type_info: TypeInfo::named(base_type),
                children: vec![],
                depth: 0,
                is_max_depth: false,
            },
            fields: IndexMap::new(),
        }
    }

    /// Appends the node of a child field.
    pub(crate) fn push_field(&mut self, node: Self) {
        self.info.children.push(node.info.name.clone());
        self.fields.insert(node.info.name.clone(), node);
    }

    /// Returns the node of the child field `name`.
    pub fn field(&self, name: &str) -> Option<&Self> {
        self.fields.get(name)
    }

    /// Returns the node of the child field `name` for modification.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.fields.get_mut(name)
    }

    /// Nodes of the child fields, in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &Self> {
        self.fields.values()
    }

    /// Descends through the child fields named by the dot-separated `path`.
    ///
    /// The `path` is relative to this node, so it doesn't start with this
    /// node's own name.
    pub fn descendant(&self, path: &str) -> Option<&Self> {
        path.split('.').try_fold(self, |node, name| node.field(name))
    }

    /// Same as [`SchemaNode::descendant()`], but for modification.
    pub fn descendant_mut(&mut self, path: &str) -> Option<&mut Self> {
        path.split('.').try_fold(self, |node, name| node.field_mut(name))
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.fields.values().map(Self::node_count).sum::<usize>()
    }

    /// Whether this node has no child fields.
    pub fn is_leaf(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for SchemaNode<'_> {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(INFO_KEY, &self.info)?;
        for (name, node) in &self.fields {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

fn serialize_meta_name<S: Serializer>(meta: &&MetaType, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(meta.name())
}

fn serialize_display<T: fmt::Display, S: Serializer>(v: &T, ser: S) -> Result<S::Ok, S::Error> {
    ser.collect_str(v)
}
