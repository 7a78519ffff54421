//! Wildcard fan-out and stock action tests.

use std::sync::{Arc, Mutex};

use configtree::{
    NodeMut, NodePath, path,
    transform::{self, ConfigTransformation, MoveStrategy, PathSegment},
};

use crate::helpers::*;

#[test]
fn test_rename_under_wildcard() {
    let mut tree = tree_from_json(
        r#"{"servers": {"main": {"addr": "10.0.0.1", "port": 80}, "backup": {"addr": "10.0.0.2"}}}"#,
    );
    transform::builder()
        .add_action(["servers", "*", "addr"], transform::rename("host"))
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert_eq!(
        to_json(&tree),
        r#"{"servers":{"main":{"port":80,"host":"10.0.0.1"},"backup":{"host":"10.0.0.2"}}}"#
    );
}

#[test]
fn test_wildcard_over_list_items() {
    let mut tree = tree_from_json(r#"{"users": [{"name": "a", "pw": "x"}, {"name": "b"}]}"#);
    transform::builder()
        .add_action(["users", "*", "pw"], transform::remove())
        .add_action(["users", "*", "active"], transform::set_value(true))
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert_eq!(to_json(&tree), r#"{"users":[{"name":"a"},{"name":"b"}]}"#);
}

#[test]
fn test_action_sees_relative_paths() {
    let mut tree = server_config();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let transformation = transform::builder()
        .add_action(["*"], move |path: &NodePath, _: &mut NodeMut<'_>| {
            recorded.lock().unwrap().push(path.to_string());
            Ok(None)
        })
        .build();
    transformation.apply(&mut tree.node_mut("limits")).unwrap();
    assert_eq!(*seen.lock().unwrap(), ["connections", "burst"]);
}

#[test]
fn test_move_to_can_merge() {
    let mut tree = tree_from_json(
        r#"{"legacy": {"timeout": 30, "retries": 5}, "network": {"timeout": 10}}"#,
    );
    transform::builder()
        .move_strategy(MoveStrategy::Merge)
        .add_action(["legacy"], transform::move_to("network"))
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert_eq!(to_json(&tree), r#"{"network":{"timeout":10,"retries":5}}"#);
}

#[test]
fn test_move_to_overwrites_by_default() {
    let mut tree = tree_from_json(
        r#"{"legacy": {"timeout": 30}, "network": {"timeout": 10, "keepalive": true}}"#,
    );
    transform::builder()
        .add_action(["legacy"], transform::move_to(path!["network"]))
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert_eq!(to_json(&tree), r#"{"network":{"timeout":30}}"#);
}

#[test]
fn test_rename_replaces_existing_scalar() {
    let mut tree = tree_from_json(r#"{"old_port": 9000, "port": 80}"#);
    transform::builder()
        .add_action(["old_port"], transform::rename("port"))
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert!(tree.node("old_port").is_virtual());
    assert_eq!(tree.node("port").get_i64(), Some(9000));
}

#[test]
fn test_move_into_new_branch() {
    let mut tree = server_config();
    transform::builder()
        .add_action(["port"], transform::move_to(path!["listen", "port"]))
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert!(tree.node("port").is_virtual());
    assert_eq!(tree.node(path!["listen", "port"]).get_i64(), Some(8080));
}

#[test]
fn test_missing_paths_are_skipped() {
    let mut tree = server_config();
    let before = to_json(&tree);
    transform::builder()
        .add_action(["absent", "*"], transform::remove())
        .add_action(["name", "*"], transform::remove())
        .add_action(
            [PathSegment::from("tags"), PathSegment::Index(5)],
            transform::remove(),
        )
        .build()
        .apply_to(&mut tree)
        .unwrap();
    assert_eq!(to_json(&tree), before);
}

#[test]
fn test_chain_runs_in_order() {
    let mut tree = server_config();
    let first = transform::builder()
        .add_action(["port"], transform::rename("listen_port"))
        .build();
    let second = transform::builder()
        .add_action(["listen_port"], transform::set_value(9000))
        .build();
    let chain = transform::chain::<configtree::Error>([
        Box::new(first) as Box<dyn ConfigTransformation>,
        Box::new(second) as Box<dyn ConfigTransformation>,
    ]);
    chain.apply_to(&mut tree).unwrap();
    assert_eq!(tree.node("listen_port").get_i64(), Some(9000));
    assert!(tree.node("port").is_virtual());
}
