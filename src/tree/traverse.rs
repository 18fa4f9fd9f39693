//! Walking a [`SchemaNode`] subtree.

use std::{fmt, str::FromStr};

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashSet;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::node::{SchemaNode, SchemaNodeInfo};

/// Order in which [`traverse()`] visits the descendants of a node.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Traversal {
    /// Each child is visited, then its own subtree, before its next sibling.
    #[default]
    DepthFirst,

    /// All the children are visited before any of their subtrees.
    BreadthFirst,
}

impl Traversal {
    /// Name of the order, as accepted by [`Traversal::from_str()`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthFirst => "depthFirst",
            Self::BreadthFirst => "breadthFirst",
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error of parsing an unknown [`Traversal`] order.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("Unsupported traversing: {_0}")]
pub struct UnsupportedTraversal(#[error(not(source))] pub String);

impl FromStr for Traversal {
    type Err = UnsupportedTraversal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "depthFirst" => Ok(Self::DepthFirst),
            "breadthFirst" => Ok(Self::BreadthFirst),
            _ => Err(UnsupportedTraversal(s.into())),
        }
    }
}

/// Rule hiding nodes from [`SchemaNodeHandler::traverse_node()`].
///
/// [`SchemaNodeHandler::traverse_node()`]: crate::SchemaNodeHandler::traverse_node
#[derive(Clone, Debug)]
pub enum HiddenPath {
    /// Hides the node with exactly this path.
    Exact(String),

    /// Hides every node whose path contains a match.
    Pattern(Regex),
}

impl HiddenPath {
    /// Builds a [`HiddenPath::Pattern`] out of a regular expression.
    ///
    /// # Errors
    ///
    /// If the regular expression is invalid.
    pub fn pattern(re: &str) -> Result<Self, regex::Error> {
        Regex::new(re).map(Self::Pattern)
    }

    /// Checks whether the `path` is hidden by this rule.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => p == path,
            Self::Pattern(re) => re.is_match(path),
        }
    }
}

impl From<&str> for HiddenPath {
    fn from(path: &str) -> Self {
        Self::Exact(path.into())
    }
}

impl From<String> for HiddenPath {
    fn from(path: String) -> Self {
        Self::Exact(path)
    }
}

impl From<Regex> for HiddenPath {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

/// Configuration of [`SchemaNodeHandler::traverse_node()`].
///
/// [`SchemaNodeHandler::traverse_node()`]: crate::SchemaNodeHandler::traverse_node
#[derive(Clone, Debug, Default)]
pub struct TraverseOptions {
    /// Visiting order.
    pub traversing: Traversal,

    /// Nodes matching any of these rules aren't visited. Their descendants
    /// still are, unless a rule matches them too.
    pub hidden_paths: Vec<HiddenPath>,

    /// Skips the starting node and presents its children as roots.
    pub exclude_root: bool,
}

impl TraverseOptions {
    /// Default options with the given visiting order.
    pub fn new(traversing: Traversal) -> Self {
        Self {
            traversing,
            ..Self::default()
        }
    }

    /// Adds a rule hiding nodes.
    #[must_use]
    pub fn hide(mut self, path: impl Into<HiddenPath>) -> Self {
        self.hidden_paths.push(path.into());
        self
    }

    /// Sets whether the starting node is skipped.
    #[must_use]
    pub fn exclude_root(mut self, exclude: bool) -> Self {
        self.exclude_root = exclude;
        self
    }

    /// Checks whether the `path` is hidden by any rule.
    pub fn is_hidden(&self, path: &str) -> bool {
        self.hidden_paths.iter().any(|rule| rule.matches(path))
    }
}

/// Visits every descendant of the `node`, passing the information of its
/// parent along. The `node` itself isn't visited.
pub fn traverse<'n, 'a, F>(node: &'n SchemaNode<'a>, order: Traversal, visit: &mut F)
where
    F: FnMut(&'n SchemaNodeInfo<'a>, &'n SchemaNode<'a>),
{
    match order {
        Traversal::DepthFirst => {
            for child in node.fields.values() {
                visit(&node.info, child);
                traverse(child, order, visit);
            }
        }
        Traversal::BreadthFirst => {
            for child in node.fields.values() {
                visit(&node.info, child);
            }
            for child in node.fields.values() {
                traverse(child, order, visit);
            }
        }
    }
}

/// Same as [`traverse()`], but allows modifying the visited nodes.
pub fn traverse_mut<'a, F>(node: &mut SchemaNode<'a>, order: Traversal, visit: &mut F)
where
    F: FnMut(&SchemaNodeInfo<'a>, &mut SchemaNode<'a>),
{
    match order {
        Traversal::DepthFirst => {
            for child in node.fields.values_mut() {
                visit(&node.info, child);
                traverse_mut(child, order, visit);
            }
        }
        Traversal::BreadthFirst => {
            for child in node.fields.values_mut() {
                visit(&node.info, child);
            }
            for child in node.fields.values_mut() {
                traverse_mut(child, order, visit);
            }
        }
    }
}

/// Object types met more than once while traversing a subtree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RepeatedTypes {
    /// Path of the first occurrence of every object type, by type name.
    pub first_seen: IndexMap<ArcStr, String>,

    /// Paths of every later occurrence, in visiting order.
    pub repeated: Vec<String>,
}

impl RepeatedTypes {
    /// Whether the node at `path` repeats an earlier object type.
    pub fn is_repeated(&self, path: &str) -> bool {
        self.repeated.iter().any(|p| p == path)
    }
}

impl SchemaNode<'_> {
    /// Flags every descendant whose object type was already visited earlier
    /// in the given `order`.
    ///
    /// The flag is [`TypeInfo::is_appeared`]. This node's own type doesn't
    /// count as visited. Flags are only ever set, never cleared, so marking a
    /// subtree again keeps the earlier marks. Use
    /// [`SchemaNode::find_repeated_types()`] to leave the nodes untouched.
    ///
    /// [`TypeInfo::is_appeared`]: super::node::TypeInfo::is_appeared
    pub fn mark_repeated_types(&mut self, order: Traversal) {
        let mut seen = FnvHashSet::<ArcStr>::default();
        traverse_mut(self, order, &mut |_, node| {
            let type_info = &mut node.info.type_info;
            if type_info.is_object() && !seen.insert(type_info.base_type.name().clone()) {
                type_info.is_appeared = true;
            }
        });
    }

    /// Collects the object types visited more than once in the given `order`,
    /// without modifying any node.
    pub fn find_repeated_types(&self, order: Traversal) -> RepeatedTypes {
        let mut result = RepeatedTypes::default();
        traverse(self, order, &mut |_, node| {
            let type_info = &node.info.type_info;
            if !type_info.is_object() {
                return;
            }
            let name = type_info.base_type.name();
            if result.first_seen.contains_key(name) {
                result.repeated.push(node.info.path.clone());
            } else {
                result
                    .first_seen
                    .insert(name.clone(), node.info.path.clone());
            }
        });
        result
    }
}
