//! Versioned migration tests.

use configtree::{
    ConfigTree, NodeMut, path,
    transform::{self, ConfigTransformation, UNVERSIONED},
};

use crate::helpers::*;

/// Version 1 adds a field, version 2 renames it.
fn migration() -> transform::VersionedTransformation {
    transform::versioned()
        .add_version(1, |node: &mut NodeMut<'_>| -> configtree::Result<()> {
            node.get_node("field").set_value("added")?;
            Ok(())
        })
        .add_version(
            2,
            transform::builder()
                .add_action(["field"], transform::rename("renamed"))
                .build(),
        )
        .build()
}

#[test]
fn test_unversioned_document_runs_every_step() {
    let mut tree = tree_from_json(r#"{"name": "demo"}"#);
    let migration = migration();
    assert_eq!(migration.current_version(&tree.root_mut()), UNVERSIONED);

    migration.apply_to(&mut tree).unwrap();
    assert_eq!(
        to_json(&tree),
        r#"{"name":"demo","renamed":"added","version":2}"#
    );
    assert_eq!(migration.latest_version(), Some(2));
}

#[test]
fn test_migration_is_idempotent() {
    let mut tree = tree_from_json(r#"{"name": "demo"}"#);
    let migration = migration();
    migration.apply_to(&mut tree).unwrap();
    let once = to_json(&tree);

    migration.apply_to(&mut tree).unwrap();
    assert_eq!(to_json(&tree), once);
}

#[test]
fn test_partially_migrated_document() {
    let mut tree = tree_from_json(r#"{"version": 1, "field": "kept"}"#);
    migration().apply_to(&mut tree).unwrap();
    assert_eq!(to_json(&tree), r#"{"version":2,"renamed":"kept"}"#);
}

#[test]
fn test_newer_document_is_untouched() {
    let mut tree = tree_from_json(r#"{"version": 7, "field": "future"}"#);
    migration().apply_to(&mut tree).unwrap();
    assert_eq!(to_json(&tree), r#"{"version":7,"field":"future"}"#);
}

#[test]
fn test_nested_version_key() {
    let migration = transform::versioned()
        .version_key(path!["meta", "schema"])
        .unwrap()
        .add_version(3, transform::builder().add_action(["old"], transform::remove()).build())
        .build();

    let mut tree = ConfigTree::new();
    tree.node_mut("old").set_value(1).unwrap();
    migration.apply_to(&mut tree).unwrap();
    assert!(tree.node("old").is_virtual());
    assert_eq!(tree.node(path!["meta", "schema"]).get_i64(), Some(3));
}

#[test]
fn test_failed_step_stops_migration() {
    let migration = transform::versioned()
        .add_version(1, |_: &mut NodeMut<'_>| -> configtree::Result<()> {
            Err(configtree::Error::Io(std::io::Error::other("step failed")))
        })
        .add_version(2, |node: &mut NodeMut<'_>| -> configtree::Result<()> {
            node.get_node("reached").set_value(true)?;
            Ok(())
        })
        .build();
    let mut tree = ConfigTree::new();
    let err = migration.apply_to(&mut tree).unwrap_err();
    assert!(err.is_io_error());
    assert!(tree.node("reached").is_virtual());
    assert!(tree.node("version").is_virtual());
}
