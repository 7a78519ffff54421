//! Structural tests: virtual nodes, attachment, detachment and round trips.

use configtree::{ConfigOptions, ConfigTree, Key, Value, node::ScalarKind, path};

use crate::helpers::*;

// ===== VIRTUAL NODES =====

#[test]
fn test_repeated_traversal_stays_virtual() {
    let tree = ConfigTree::new();
    for _ in 0..3 {
        assert!(tree.node(path!["a", "b"]).is_virtual());
        assert!(tree.node("a").is_virtual());
    }
    assert!(tree.root().children_map().is_empty());
}

#[test]
fn test_first_write_attaches_only_the_ancestor_chain() {
    let mut tree = ConfigTree::new();
    tree.node_mut(path!["a", "b"]).set_value("value").unwrap();

    assert!(!tree.node("a").is_virtual());
    assert!(!tree.node(path!["a", "b"]).is_virtual());
    assert!(tree.node(path!["a", "c"]).is_virtual());
    assert!(tree.node("sibling").is_virtual());
    assert_eq!(tree.root().child_keys(), vec![Key::from("a")]);
    assert_eq!(tree.node("a").child_keys(), vec![Key::from("b")]);
}

#[test]
fn test_virtual_handle_outlives_nothing_it_did_not_write() {
    let mut tree = ConfigTree::new();
    {
        let mut handle = tree.node_mut(path!["x", "y", "z"]);
        assert!(handle.is_virtual());
        assert!(handle.get_value().is_null());
    }
    assert_eq!(tree.node_count(), 1);
}

// ===== DETACHMENT =====

#[test]
fn test_null_detaches_child() {
    let mut tree = ConfigTree::new();
    tree.node_mut("x").set_value(1).unwrap();
    assert!(tree.root().children_map().contains_key(&Key::from("x")));

    tree.node_mut("x").set_value(Value::Null).unwrap();
    assert!(!tree.root().children_map().contains_key(&Key::from("x")));
    assert!(tree.node("x").is_virtual());
}

#[test]
fn test_detached_handle_can_reattach() {
    let mut tree = ConfigTree::new();
    let mut node = tree.node_mut("x");
    node.set_value(1).unwrap();
    node.clear();
    assert!(node.is_virtual());
    node.set_value(2).unwrap();
    assert!(!node.is_virtual());
    assert_eq!(tree.node("x").get_i64(), Some(2));
}

#[test]
fn test_list_children_stay_dense() {
    let mut tree = tree_from_json(r#"{"items": ["a", "b", "c", "d"]}"#);
    tree.node_mut(path!["items", 1]).clear();
    tree.node_mut(path!["items", 1]).clear();

    let items = tree.node("items");
    let keys: Vec<Key> = items.child_keys();
    assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);
    assert_eq!(to_json(&tree), r#"{"items":["a","d"]}"#);
}

// ===== RESHAPING =====

#[test]
fn test_setting_scalar_destroys_children() {
    let mut tree = server_config();
    tree.node_mut("limits").set_value("unlimited").unwrap();
    assert!(tree.node("limits").is_scalar());
    assert!(tree.node(path!["limits", "connections"]).is_virtual());
}

#[test]
fn test_container_kinds_are_exclusive() {
    let mut tree = ConfigTree::new();
    tree.node_mut(path!["value", 0]).set_value("listed").unwrap();
    assert!(tree.node("value").is_list());

    tree.node_mut(path!["value", "named"]).set_value("mapped").unwrap();
    assert!(tree.node("value").is_map());
    assert!(!tree.node("value").is_list());
    assert!(tree.node("value").children_list().is_empty());
    assert_eq!(tree.node("value").children_map().len(), 1);
}

#[test]
fn test_append_builds_list() {
    let mut tree = ConfigTree::new();
    let mut servers = tree.node_mut("servers");
    for name in ["alpha", "beta", "gamma"] {
        servers
            .append_list_node()
            .get_node("name")
            .set_value(name)
            .unwrap();
    }
    assert_eq!(
        to_json(&tree),
        r#"{"servers":[{"name":"alpha"},{"name":"beta"},{"name":"gamma"}]}"#
    );
}

#[test]
fn test_empty_containers_are_kept() {
    let mut tree = ConfigTree::new();
    tree.node_mut("list").set_value(Value::empty_list()).unwrap();
    tree.node_mut("map").set_value(Value::empty_map()).unwrap();
    assert!(tree.node("list").is_list());
    assert!(tree.node("map").is_map());
    assert!(!tree.node("list").has_children());
    assert_eq!(to_json(&tree), r#"{"list":[],"map":{}}"#);
}

// ===== ROUND TRIPS =====

#[test]
fn test_value_round_trip_reproduces_tree() {
    let tree = server_config();
    let mut copy = ConfigTree::new();
    copy.root_mut().set_value(tree.root().get_value()).unwrap();
    assert_eq!(copy, tree);
}

#[test]
fn test_copy_equals_but_is_independent() {
    let mut tree = server_config();
    let mut copy = tree.root().copy();
    assert_eq!(copy.to_value(), tree.to_value());

    copy.node_mut("port").set_value(9090).unwrap();
    copy.node_mut(path!["tags", 0]).clear();
    assert_eq!(tree.node("port").get_i64(), Some(8080));
    assert_eq!(tree.node("tags").children_list().len(), 2);

    tree.node_mut("name").set_value("changed").unwrap();
    assert_eq!(copy.node("name").get_string().as_deref(), Some("primary"));
}

// ===== ACCEPTED TYPES =====

#[test]
fn test_whitelist_rejects_nested_values() {
    let options = ConfigOptions::default().with_accepted_types([ScalarKind::Text]);
    let mut tree = ConfigTree::with_options(options);
    let err = tree
        .node_mut("config")
        .set_value(Value::map([("count", 3)]))
        .unwrap_err();
    assert!(err.is_unsupported_value());
    assert!(tree.root().is_null());

    tree.node_mut("config").set_value(Value::map([("count", "3")])).unwrap();
    assert_eq!(tree.node(path!["config", "count"]).get_i64(), Some(3));
}
