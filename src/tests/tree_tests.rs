use pretty_assertions::assert_eq;

use crate::{
    ast::Type,
    schema::{
        meta::{Field, ObjectMeta},
        model::SchemaType,
    },
    tree::{
        SchemaTree, SchemaTreeOptions,
        traverse::{Traversal, traverse},
    },
};

use super::fixtures::github_schema;

fn options(max_depth: usize) -> SchemaTreeOptions {
    SchemaTreeOptions {
        max_depth,
        ..SchemaTreeOptions::default()
    }
}

#[test]
fn lists_root_fields_in_declaration_order() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    assert_eq!(
        tree.field_names(),
        ["user", "viewer", "organization", "codeOfConduct"],
    );
    assert_eq!(tree.roots().keys().collect::<Vec<_>>(), ["query"]);
    assert!(!tree.is_empty());
}

#[test]
fn accesses_nodes_in_the_hierarchy() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let user = tree.get_node("query.user").expect("existing node");
    assert!(user.field("name").is_some());
    assert!(user.field("createdAt").is_some());
    assert!(user.descendant("followers.nodes.name").is_some());
    assert!(user.field("unexistent").is_none());

    assert!(tree.get_node("query.user.unexistent").is_none());
    assert!(tree.get_node("mutation.user").is_none());
    assert!(tree.get_node("").is_none());
}

#[test]
fn fills_node_details() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let info = &tree
        .get_node("query.user.followers.nodes")
        .expect("existing node")
        .info;

    assert_eq!(info.name, "nodes");
    assert_eq!(info.parent_name, "followers");
    assert_eq!(info.parent_path, "query.user.followers");
    assert_eq!(info.path, "query.user.followers.nodes");
    assert!(info.args.is_empty());
    assert_eq!(info.depth, 3);
    assert!(!info.is_max_depth);
    assert_eq!(
        info.children,
        [
            "avatarUrl",
            "contributionsCollection",
            "createdAt",
            "followers",
            "issues",
            "login",
            "name",
            "organization",
            "repositories",
            "status",
        ],
    );
    assert_eq!(info.type_info.type_name(), "User");
    assert!(info.type_info.is_list);
    assert!(!info.type_info.is_non_null);
    assert!(!info.type_info.is_appeared);
}

#[test]
fn resolves_field_arguments() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let args = &tree
        .get_node("query.user.followers")
        .expect("existing node")
        .info
        .args;

    assert_eq!(
        args.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        ["first", "after"],
    );
    assert_eq!(args[0].arg_type.to_string(), "Int");
    assert_eq!(args[0].type_info.type_name(), "Int");
    assert!(args[0].default_value.is_none());

    let filter_by = &tree
        .get_node("query.user.issues")
        .expect("existing node")
        .info
        .args[1];
    let fields = filter_by.input_fields().expect("input object argument");
    assert_eq!(
        fields
            .iter()
            .find(|f| f.name.as_str() == "viewerSubscribed")
            .and_then(|f| f.default_value.clone()),
        Some(false.into()),
    );
}

#[test]
fn every_child_extends_its_parent() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));
    let root = tree.root().expect("existing root");

    assert_eq!(root.info.path, "query");
    assert_eq!(root.info.depth, 0);

    let mut visited = 0;
    traverse(root, Traversal::DepthFirst, &mut |parent, node| {
        visited += 1;
        assert_eq!(node.info.path, format!("{}.{}", parent.path, node.info.name));
        assert_eq!(node.info.parent_path, parent.path);
        assert_eq!(node.info.parent_name, parent.name);
        assert_eq!(node.info.depth, parent.depth + 1);
        assert!(parent.children.contains(&node.info.name));
    });
    assert_eq!(visited + 1, root.node_count());
}

#[test]
fn flags_only_unexpanded_objects_at_max_depth() {
    let schema = github_schema();
    for max_depth in [1, 2, 4] {
        let tree = SchemaTree::new(&schema, options(max_depth));
        let root = tree.root().expect("existing root");

        traverse(root, Traversal::BreadthFirst, &mut |_, node| {
            let info = &node.info;
            assert!(info.depth <= max_depth, "{}", info.path);
            assert_eq!(
                info.is_max_depth,
                info.type_info.is_object() && info.depth == max_depth,
                "{}",
                info.path,
            );
            if info.is_max_depth || !info.type_info.is_object() {
                assert!(node.is_leaf(), "{}", info.path);
                assert!(info.children.is_empty(), "{}", info.path);
            } else {
                assert!(!node.is_leaf(), "{}", info.path);
            }
        });
    }
}

#[test]
fn stops_expanding_at_max_depth() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let nodes = tree
        .get_node("query.user.followers.nodes")
        .expect("existing node");
    for field in nodes.fields() {
        assert_eq!(field.info.depth, 4);
        assert_eq!(field.info.is_max_depth, field.info.type_info.is_object());
    }
    assert!(
        tree.get_node("query.user.followers.nodes.status")
            .expect("existing node")
            .is_leaf(),
    );
    assert!(
        tree.get_node("query.user.followers.nodes.status.organization")
            .is_none(),
    );
}

#[test]
fn zero_max_depth_leaves_only_the_root() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(0));

    let root = tree.root().expect("existing root");
    assert!(root.info.is_max_depth);
    assert!(root.is_leaf());
    assert!(tree.field_names().is_empty());
}

#[test]
fn missing_root_type_builds_an_empty_tree() {
    let schema = github_schema();
    let tree = SchemaTree::new(
        &schema,
        SchemaTreeOptions {
            type_name: "Mutation".into(),
            ..SchemaTreeOptions::default()
        },
    );

    assert!(tree.is_empty());
    assert!(tree.root().is_none());
    assert!(tree.field_names().is_empty());
    assert!(tree.get_node("mutation").is_none());
    assert!(tree.handler("mutation").is_none());
}

#[test]
fn roots_tree_at_any_object_type() {
    let schema = github_schema();
    let tree = SchemaTree::new(
        &schema,
        SchemaTreeOptions {
            type_name: "UserStatus".into(),
            max_depth: 1,
        },
    );

    assert_eq!(tree.field_names(), ["emoji", "message", "organization"]);
    let organization = tree
        .get_node("userstatus.organization")
        .expect("existing node");
    assert!(organization.info.is_max_depth);
}

#[test]
fn skips_introspection_fields() {
    let schema = SchemaType::new(
        [ObjectMeta::new(
            "Query",
            &[
                Field::new("__typename", Type::NonNullNamed("String".into())),
                Field::new("version", Type::Named("String".into())),
            ],
        )
        .into_meta()],
        None,
        None,
        None,
    )
    .expect("valid schema");

    let tree = SchemaTree::with_defaults(&schema);

    assert_eq!(tree.field_names(), ["version"]);
    assert!(tree.get_node("query.__typename").is_none());
}

#[test]
fn gets_a_node_as_root() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let followers = tree.get_node("query.user.followers").expect("existing node");
    assert_eq!(followers.info.path, "query.user.followers");
    assert_eq!(followers.info.depth, 2);

    let rerooted = tree
        .get_node_as_root("query.user.followers")
        .expect("existing node");
    assert_eq!(rerooted.info.name, "followers");
    assert_eq!(rerooted.info.parent_name, "");
    assert_eq!(rerooted.info.parent_path, "");
    assert_eq!(rerooted.info.path, "followers");
    assert_eq!(rerooted.info.depth, 2);

    let nodes = rerooted.field("nodes").expect("existing node");
    assert_eq!(nodes.info.name, "nodes");
    assert_eq!(nodes.info.parent_name, "followers");
    assert_eq!(nodes.info.parent_path, "followers");
    assert_eq!(nodes.info.path, "followers.nodes");
    assert_eq!(nodes.info.depth, 3);

    let status = nodes.field("status").expect("existing node");
    assert_eq!(status.info.parent_name, "nodes");
    assert_eq!(status.info.parent_path, "followers.nodes");
    assert_eq!(status.info.path, "followers.nodes.status");
    assert_eq!(status.info.depth, 4);

    let original = tree
        .get_node("query.user.followers.nodes.status")
        .expect("existing node");
    assert_eq!(original.info.path, "query.user.followers.nodes.status");
    assert_eq!(original.info.depth, 4);
}

#[test]
fn gets_parent_of_a_node() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let nodes = tree
        .get_node("query.user.followers.nodes")
        .expect("existing node");
    let parent = tree.get_parent(nodes, "").expect("existing parent");
    assert_eq!(parent.info.name, "followers");
    assert_eq!(parent.info.path, "query.user.followers");

    assert!(tree.get_parent(tree.root().expect("existing root"), "").is_none());
}

#[test]
fn gets_parent_of_a_rerooted_node_with_prefix() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let nodes = tree
        .get_node_as_root("query.user.followers.nodes")
        .expect("existing node");
    assert!(tree.get_parent(&nodes, "").is_none());

    let parent = tree
        .get_parent(&nodes, "query.user.followers.")
        .expect("existing parent");
    assert_eq!(parent.info.name, "followers");
    assert_eq!(parent.info.path, "query.user.followers");
}

#[test]
fn rerooting_preserves_parent_lookups() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));

    let original = tree
        .get_node("query.user.followers.nodes.status")
        .expect("existing node");
    let rerooted = tree.get_node_as_root("query.user").expect("existing node");
    let status = rerooted
        .descendant("followers.nodes.status")
        .expect("existing node");

    let expected = tree.get_parent(original, "").expect("existing parent");
    let actual = tree.get_parent(status, "query.").expect("existing parent");

    assert_eq!(actual.info.name, expected.info.name);
    assert_eq!(actual.info.path, expected.info.path);
}

#[test]
fn live_and_copied_nodes() {
    let schema = github_schema();
    let mut tree = SchemaTree::new(&schema, options(4));

    let mut copy = tree.get_node_copied("query.user").expect("existing node");
    copy.mark_repeated_types(Traversal::DepthFirst);
    assert!(copy.descendant("status").expect("existing node").info.type_info.is_appeared);
    assert!(
        !tree
            .get_node("query.user.status")
            .expect("existing node")
            .info
            .type_info
            .is_appeared,
    );

    tree.get_node_mut("query.user")
        .expect("existing node")
        .mark_repeated_types(Traversal::DepthFirst);
    assert!(
        tree.get_node("query.user.status")
            .expect("existing node")
            .info
            .type_info
            .is_appeared,
    );

    let other = SchemaTree::new(&schema, options(4));
    assert!(
        !other
            .get_node("query.user.status")
            .expect("existing node")
            .info
            .type_info
            .is_appeared,
    );
}

#[test]
fn serializes_nodes_with_info_key() {
    let schema = github_schema();
    let tree = SchemaTree::new(&schema, options(4));
    let followers = tree.get_node("query.user.followers").expect("existing node");

    let json = serde_json::to_string(followers).expect("serializable");
    assert!(json.starts_with(r#"{"__info":{"name":"followers","parentName":"user""#));

    let value = serde_json::to_value(followers).expect("serializable");
    assert_eq!(value["__info"]["path"], "query.user.followers");
    assert_eq!(value["__info"]["depth"], 2);
    assert_eq!(value["__info"]["type"]["typeName"], "FollowerConnection");
    assert_eq!(value["__info"]["type"]["isNonNull"], true);
    assert_eq!(value["__info"]["args"][0]["name"], "first");
    assert_eq!(value["__info"]["args"][0]["type"], "Int");
    assert_eq!(value["__info"]["children"][1], "totalCount");
    assert_eq!(value["nodes"]["__info"]["type"]["isList"], true);
    assert_eq!(value["nodes"]["status"]["__info"]["isMaxDepth"], true);

    let value = serde_json::to_value(&tree).expect("serializable");
    assert_eq!(value["query"]["user"]["__info"]["path"], "query.user");
}

#[test]
fn deserializes_options_with_defaults() {
    let options: SchemaTreeOptions =
        serde_json::from_str(r#"{"maxDepth": 2}"#).expect("valid options");

    assert_eq!(options.type_name, "Query");
    assert_eq!(options.max_depth, 2);
}
