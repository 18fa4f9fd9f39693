//! Path-addressable tree built out of a [`SchemaType`].

pub mod node;
pub mod traverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{handler::SchemaNodeHandler, schema::model::SchemaType};

use self::node::{SchemaNode, is_internal_field};

/// Configuration of a [`SchemaTree`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaTreeOptions {
    /// Name of the type the tree is rooted at.
    pub type_name: String,

    /// Depth past which object fields are no longer expanded.
    pub max_depth: usize,
}

impl Default for SchemaTreeOptions {
    fn default() -> Self {
        Self {
            type_name: "Query".into(),
            max_depth: 5,
        }
    }
}

/// Tree of the fields reachable from a root type, down to a maximum depth.
///
/// The root node is keyed by the lower-cased name of the root type, so a
/// tree rooted at `Query` addresses its nodes as `query.user.name`.
///
/// Lookups hand out either live references into the tree
/// ([`SchemaTree::get_node()`], [`SchemaTree::get_node_mut()`]) or
/// independent copies ([`SchemaTree::get_node_copied()`],
/// [`SchemaTree::get_node_as_root()`]). Marking repeated types through a live
/// mutable reference is visible to every later lookup.
#[derive(Clone, Debug)]
pub struct SchemaTree<'a> {
    schema: &'a SchemaType,
    options: SchemaTreeOptions,
    roots: IndexMap<String, SchemaNode<'a>>,
}

impl<'a> SchemaTree<'a> {
    /// Builds the tree of the `schema` type named by the `options`.
    ///
    /// The tree is empty if there is no such type.
    pub fn new(schema: &'a SchemaType, options: SchemaTreeOptions) -> Self {
        let mut roots = IndexMap::new();

        match schema.concrete_type_by_name(&options.type_name) {
            Some(root_type) => {
                let name = options.type_name.to_lowercase();
                let mut root = SchemaNode::root(&name, root_type);
                if root.info.type_info.is_object() {
                    if options.max_depth > 0 {
                        build_tree(&mut root, schema, options.max_depth);
                    } else {
                        root.info.is_max_depth = true;
                    }
                }
                debug!(
                    root = %name,
                    max_depth = options.max_depth,
                    nodes = root.node_count(),
                    "built schema tree",
                );
                roots.insert(name, root);
            }
            None => {
                warn!(type_name = %options.type_name, "root type is not defined in the schema");
            }
        }

        Self {
            schema,
            options,
            roots,
        }
    }

    /// Builds the tree with the default [`SchemaTreeOptions`].
    pub fn with_defaults(schema: &'a SchemaType) -> Self {
        Self::new(schema, SchemaTreeOptions::default())
    }

    /// Schema this tree was built from.
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// Options this tree was built with.
    pub fn options(&self) -> &SchemaTreeOptions {
        &self.options
    }

    /// Whether the root type was missing from the schema.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Root node of the tree.
    pub fn root(&self) -> Option<&SchemaNode<'a>> {
        self.roots.values().next()
    }

    /// Top-level entries of the tree, keyed by lower-cased type name.
    pub fn roots(&self) -> &IndexMap<String, SchemaNode<'a>> {
        &self.roots
    }

    /// Field names of the root type, in declaration order.
    pub fn field_names(&self) -> &[String] {
        self.root()
            .map(|root| root.info.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns a live reference to the node at the dot-separated `path`.
    ///
    /// The first segment names the root, e.g. `query.user.followers`.
    pub fn get_node(&self, path: &str) -> Option<&SchemaNode<'a>> {
        let (root, rest) = split_root(path);
        let root = self.roots.get(root)?;
        match rest {
            Some(rest) => root.descendant(rest),
            None => Some(root),
        }
    }

    /// Same as [`SchemaTree::get_node()`], but for modification.
    pub fn get_node_mut(&mut self, path: &str) -> Option<&mut SchemaNode<'a>> {
        let (root, rest) = split_root(path);
        let root = self.roots.get_mut(root)?;
        match rest {
            Some(rest) => root.descendant_mut(rest),
            None => Some(root),
        }
    }

    /// Returns a deep copy of the node at the dot-separated `path`.
    ///
    /// Modifying the copy never affects this tree.
    pub fn get_node_copied(&self, path: &str) -> Option<SchemaNode<'a>> {
        self.get_node(path).cloned()
    }

    /// Returns a deep copy of the node at the dot-separated `path`, rewritten
    /// to be a root itself.
    ///
    /// The copy has no parent and its path is just its name. The paths of its
    /// descendants become relative to it, e.g. extracting `query.user` turns
    /// `query.user.followers` into `user.followers`. Depths are left as they
    /// were in this tree.
    pub fn get_node_as_root(&self, path: &str) -> Option<SchemaNode<'a>> {
        let mut node = self.get_node_copied(path)?;
        let prefix = std::mem::take(&mut node.info.parent_path);
        node.info.parent_name.clear();
        node.info.path.clone_from(&node.info.name);

        for child in node.fields.values_mut() {
            rebase(child, &prefix, 0);
        }
        Some(node)
    }

    /// Looks up the parent of the `node` in this tree.
    ///
    /// The `prefix` is prepended to the node's parent path, which allows
    /// resolving nodes extracted by [`SchemaTree::get_node_as_root()`] by
    /// passing the part of the path they lost.
    pub fn get_parent(&self, node: &SchemaNode<'_>, prefix: &str) -> Option<&SchemaNode<'a>> {
        let path = format!("{prefix}{}", node.info.parent_path);
        let path = path.trim_end_matches('.');
        if path.is_empty() {
            return None;
        }
        self.get_node(path)
    }

    /// Creates a [`SchemaNodeHandler`] for the node at the dot-separated
    /// `path`.
    pub fn handler(&self, path: &str) -> Option<SchemaNodeHandler<'_, 'a>> {
        self.get_node(path)
            .map(|node| SchemaNodeHandler::new(node, self.schema))
    }
}

impl Serialize for SchemaTree<'_> {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        self.roots.serialize(ser)
    }
}

/// Expands the fields of the object `node`, recursing into object fields
/// while below `max_depth`.
fn build_tree<'a>(node: &mut SchemaNode<'a>, schema: &'a SchemaType, max_depth: usize) {
    let Some(fields) = node.info.type_info.base_type.fields() else {
        return;
    };
    let depth = node.info.depth + 1;

    for field in fields {
        if is_internal_field(&field.name) {
            continue;
        }
        let Some(mut child) = SchemaNode::new(&field.name, &node.info.path, field, depth, schema)
        else {
            continue;
        };
        if child.info.type_info.is_object() {
            if depth < max_depth {
                build_tree(&mut child, schema, max_depth);
            } else {
                child.info.is_max_depth = true;
            }
        }
        node.push_field(child);
    }
}

/// Strips the `prefix` path off the paths of the `node` subtree, and lowers
/// its depths by `depth_offset`.
pub(crate) fn rebase(node: &mut SchemaNode<'_>, prefix: &str, depth_offset: usize) {
    node.info.path = strip_path_prefix(&node.info.path, prefix).into();
    node.info.parent_path = strip_path_prefix(&node.info.parent_path, prefix).into();
    node.info.depth = node.info.depth.saturating_sub(depth_offset);
    for child in node.fields.values_mut() {
        rebase(child, prefix, depth_offset);
    }
}

fn strip_path_prefix<'p>(path: &'p str, prefix: &str) -> &'p str {
    if prefix.is_empty() {
        return path;
    }
    if path == prefix {
        return "";
    }
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(path)
}

fn split_root(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((root, rest)) => (root, Some(rest)),
        None => (path, None),
    }
}
