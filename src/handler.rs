//! Node-relative queries over a [`SchemaNode`].

use fnv::FnvHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{InputValue, Type},
    schema::{
        meta::{Argument, MetaType},
        model::SchemaType,
    },
    tree::{
        node::{ArgumentInfo, SchemaNode, TypeInfo},
        rebase,
        traverse::{TraverseOptions, traverse},
    },
    validation::validate_input_value,
    value::{ScalarKind, convert_scalar},
};

/// Configuration of [`SchemaNodeHandler::convert_argument_value()`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertArgumentValueOptions {
    /// Conversion applied to non-list `ID` arguments.
    pub id_type: ScalarKind,
}

/// A converted argument value along with the type it was converted for.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentValueInfo<'a> {
    /// Converted value.
    pub value: InputValue,

    /// Type of the argument or input field.
    #[serde(rename = "type")]
    pub type_info: TypeInfo<'a>,

    /// Type of the input object holding the field, `None` for a top-level
    /// argument.
    pub parent_type: Option<TypeInfo<'a>>,
}

/// Queries relative to a single [`SchemaNode`]: its descendants, fields and
/// arguments.
///
/// Paths given to a handler start with a segment standing for the handled
/// node itself, whatever its name, e.g. `data.user` addresses the `user`
/// field of the handled node.
#[derive(Clone, Copy, Debug)]
pub struct SchemaNodeHandler<'n, 'a> {
    node: &'n SchemaNode<'a>,
    schema: &'a SchemaType,
}

impl<'n, 'a> SchemaNodeHandler<'n, 'a> {
    /// Creates a handler of the `node`, which must belong to a tree built from
    /// the `schema`.
    pub fn new(node: &'n SchemaNode<'a>, schema: &'a SchemaType) -> Self {
        Self { node, schema }
    }

    /// Handled node.
    pub fn node(&self) -> &'n SchemaNode<'a> {
        self.node
    }

    /// Returns the node at the dot-separated `path`, whose first segment
    /// stands for the handled node.
    pub fn get_node(&self, path: &str) -> Option<&'n SchemaNode<'a>> {
        let (root, rest) = match path.split_once('.') {
            Some((root, rest)) => (root, Some(rest)),
            None => (path, None),
        };
        if root.is_empty() {
            return None;
        }
        match rest {
            Some(rest) => self.node.descendant(rest),
            None => Some(self.node),
        }
    }

    /// Checks whether an ancestor of a node has the type `ty`, starting at the
    /// node's `parent_path` and walking upwards.
    ///
    /// Paths are resolved with [`SchemaNodeHandler::get_node()`], so this only
    /// works for nodes extracted with
    /// [`SchemaTree::get_node_as_root()`](crate::SchemaTree::get_node_as_root).
    /// On other nodes the walk ends once a path resolves to one already
    /// visited, e.g. the handled node's own `parent_path`.
    pub fn has_same_type_in_hierarchy(&self, ty: &MetaType, parent_path: &str) -> bool {
        let mut visited = FnvHashSet::default();
        let mut path = parent_path;
        while let Some(parent) = self.get_node(path) {
            if !visited.insert(std::ptr::from_ref(parent)) {
                break;
            }
            if parent.info.type_info.is_same_type(ty) {
                return true;
            }
            path = &parent.info.parent_path;
        }
        false
    }

    /// Names of the arguments of the handled field.
    pub fn get_argument_names(&self) -> Vec<&'n str> {
        self.node.info.args.iter().map(|a| a.name.as_str()).collect()
    }

    /// Arguments of the handled field.
    pub fn get_arguments(&self) -> &'n [ArgumentInfo<'a>] {
        &self.node.info.args
    }

    /// Returns the argument `name`, or `None` unless exactly one argument has
    /// this name.
    pub fn get_argument(&self, name: &str) -> Option<&'n ArgumentInfo<'a>> {
        let mut found = self.node.info.args.iter().filter(|a| a.name.as_str() == name);
        match (found.next(), found.next()) {
            (Some(arg), None) => Some(arg),
            _ => None,
        }
    }

    /// Fields of the input object accepted by the argument `name`.
    pub fn get_argument_input_fields(&self, name: &str) -> Option<&'a [Argument]> {
        self.get_argument(name)?.input_fields()
    }

    /// Resolves an argument, or a field nested in input object arguments when
    /// the `path` is dotted, e.g. `filter.user.name`.
    pub fn resolve_input_path(&self, path: &str) -> Option<ArgumentInfo<'a>> {
        self.resolve_with_parent(path).map(|(arg, _)| arg)
    }

    fn resolve_with_parent(&self, path: &str) -> Option<(ArgumentInfo<'a>, Option<TypeInfo<'a>>)> {
        let mut segments = path.split('.');
        let mut current = self.get_argument(segments.next()?)?.clone();
        let mut parent = None;

        for name in segments {
            let field = current.input_fields()?.iter().find(|f| f.name.as_str() == name)?;
            let next = ArgumentInfo::new(field, self.schema)?;
            parent = Some(current.type_info);
            current = next;
        }
        Some((current, parent))
    }

    /// Maps the dotted path of every leaf input field reachable from the
    /// arguments of the handled field to its description.
    ///
    /// Input objects are descended into, except when they're already being
    /// descended into along the same path, in which case they're a leaf.
    pub fn flatten_input_fields(&self) -> IndexMap<String, ArgumentInfo<'a>> {
        let mut result = IndexMap::new();
        let mut ancestors = vec![];
        for arg in &self.node.info.args {
            self.flatten_into(arg.name.to_string(), arg, &mut ancestors, &mut result);
        }
        result
    }

    fn flatten_into(
        &self,
        path: String,
        arg: &ArgumentInfo<'a>,
        ancestors: &mut Vec<&'a str>,
        result: &mut IndexMap<String, ArgumentInfo<'a>>,
    ) {
        let type_name = arg.type_info.type_name();
        let fields = arg
            .input_fields()
            .filter(|_| !ancestors.contains(&type_name));
        let Some(fields) = fields else {
            result.insert(path, arg.clone());
            return;
        };

        ancestors.push(type_name);
        for field in fields {
            if let Some(sub) = ArgumentInfo::new(field, self.schema) {
                self.flatten_into(format!("{path}.{}", field.name), &sub, ancestors, result);
            }
        }
        ancestors.pop();
    }

    /// Validates the `value` against the type `ty`.
    ///
    /// Returns `None` if it's valid, or the error message otherwise.
    pub fn validate_input_value(&self, value: &InputValue, ty: &Type) -> Option<String> {
        validate_input_value(self.schema, value, ty)
    }

    /// Validates the `value` of the argument or nested input field at `path`.
    ///
    /// Returns `None` if it's valid, or the error message otherwise.
    pub fn validate_argument(&self, path: &str, value: &InputValue) -> Option<String> {
        match self.resolve_input_path(path) {
            Some(arg) => self.validate_input_value(value, &arg.arg_type),
            None => Some(format!(r#"Unknown argument "{path}"."#)),
        }
    }

    /// Converts a raw string entered for the argument or nested input field at
    /// `path` into a typed value.
    ///
    /// List types accept comma-separated items. Returns `None` if the `path`
    /// can't be resolved.
    pub fn convert_argument_value(
        &self,
        path: &str,
        raw: &str,
        options: &ConvertArgumentValueOptions,
    ) -> Option<ArgumentValueInfo<'a>> {
        let (arg, parent_type) = self.resolve_with_parent(path)?;
        let type_info = arg.type_info;
        let type_name = type_info.type_name();

        let value = if type_info.is_list {
            let kind = ScalarKind::from_type_name(type_name);
            InputValue::list(raw.split(',').map(|v| convert_scalar(v.trim(), kind)).collect())
        } else if type_name == "ID" {
            convert_scalar(raw, options.id_type)
        } else {
            convert_scalar(raw, ScalarKind::from_type_name(type_name))
        };

        Some(ArgumentValueInfo {
            value,
            type_info,
            parent_type,
        })
    }

    /// Names of the child fields of the handled node.
    pub fn get_field_names(&self) -> &'n [String] {
        &self.node.info.children
    }

    /// Child nodes of the handled node, in declaration order.
    pub fn get_fields(&self) -> Vec<&'n SchemaNode<'a>> {
        self.node.fields().collect()
    }

    /// Checks whether the `node` is hidden by the `options`.
    pub fn is_hidden_node(&self, node: &SchemaNode<'_>, options: &TraverseOptions) -> bool {
        options.is_hidden(&node.info.path)
    }

    /// Visits the handled node and its descendants in the order configured by
    /// the `options`, skipping hidden nodes.
    ///
    /// With [`TraverseOptions::exclude_root`] the handled node isn't visited,
    /// and the visited nodes are copies whose paths are relative to it and
    /// whose depths are one less, so its children look like roots. The
    /// handled node itself is never modified.
    pub fn traverse_node<F>(&self, options: &TraverseOptions, mut visit: F)
    where
        F: FnMut(&SchemaNode<'a>),
    {
        let mut filtered = |node: &SchemaNode<'a>| {
            if !self.is_hidden_node(node, options) {
                visit(node);
            }
        };

        if options.exclude_root {
            let mut root = self.node.clone();
            for child in root.fields.values_mut() {
                rebase(child, &self.node.info.path, 1);
            }
            traverse(&root, options.traversing, &mut |_, node| filtered(node));
        } else {
            filtered(self.node);
            traverse(self.node, options.traversing, &mut |_, node| filtered(node));
        }
    }
}
