//! JSON codec tests.

use configtree::{
    ConfigTree, Value,
    format::{ConfigFormat, FormatError, JsonFormat},
    node::{Opaque, ScalarKind},
    path,
    transform::{self, ConfigTransformation},
};
use tempfile::TempDir;

use crate::helpers::*;

// ===== FILES =====

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("server.json");
    let json = JsonFormat::pretty();

    let tree = server_config();
    json.save(&tree, &file).unwrap();
    let text = std::fs::read_to_string(&file).unwrap();
    assert!(text.ends_with("}\n"));
    assert!(text.contains("\n  \"port\": 8080"));

    let loaded = json.load(&file).unwrap();
    assert_eq!(loaded.to_value(), tree.to_value());
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tree = JsonFormat::pretty()
        .load(&dir.path().join("absent.json"))
        .unwrap();
    assert!(tree.root().is_null());
    assert!(!tree.root().has_children());
}

#[test]
fn test_unreadable_path_is_io_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = JsonFormat::pretty().load(dir.path()).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn test_load_migrate_save() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("app.json");
    std::fs::write(&file, r#"{"db": {"addr": "localhost"}}"#).unwrap();

    let json = JsonFormat::compact();
    let mut tree = json.load(&file).unwrap();
    transform::versioned()
        .add_version(
            1,
            transform::builder()
                .add_action(["db", "addr"], transform::rename("host"))
                .build(),
        )
        .build()
        .apply_to(&mut tree)
        .unwrap();
    json.save(&tree, &file).unwrap();

    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        r#"{"db":{"host":"localhost"},"version":1}"#
    );
}

// ===== PARSING =====

#[test]
fn test_parse_error_reports_position() {
    let err = JsonFormat::pretty()
        .read("{\n  \"a\": 1,\n  \"b\": ?\n}")
        .unwrap_err();
    assert!(err.is_format_error());
    match err {
        configtree::Error::Format(FormatError::Parse { format, line, .. }) => {
            assert_eq!(format, "json");
            assert_eq!(line, 3);
        }
        other => panic!("Expected parse error, got: {other}"),
    }
}

#[test]
fn test_nulls_are_absent() {
    let tree = tree_from_json(r#"{"a": null, "b": [1, null, 2], "c": {"d": null}}"#);
    assert!(tree.node("a").is_virtual());
    assert_eq!(tree.node("b").get_value(), Value::list([1, 2]));
    assert!(tree.node("c").is_map());
    assert!(!tree.node("c").has_children());
}

#[test]
fn test_read_into_subtree() {
    let mut tree = server_config();
    JsonFormat::compact()
        .read_into(r#"{"level": "debug"}"#, &mut tree.node_mut("logging"))
        .unwrap();
    assert_eq!(
        tree.node(path!["logging", "level"]).get_string().as_deref(),
        Some("debug")
    );
    assert_eq!(
        JsonFormat::compact().write_node(&tree.node("logging")).unwrap(),
        r#"{"level":"debug"}"#
    );
}

#[test]
fn test_number_kinds_are_preserved() {
    let tree = tree_from_json(r#"{"int": 3, "float": 3.5, "big": -9007199254740993}"#);
    assert_eq!(tree.node("int").scalar().map(|s| s.kind()), Some(ScalarKind::Int));
    assert_eq!(tree.node("float").scalar().map(|s| s.kind()), Some(ScalarKind::Float));
    assert_eq!(tree.node("big").get_i64(), Some(-9007199254740993));
}

#[test]
fn test_unsigned_beyond_i64_is_exact() {
    let tree = tree_from_json(r#"{"n": 18446744073709551615}"#);
    assert_eq!(tree.node("n").get_as::<u64>().unwrap(), u64::MAX);
}

// ===== WRITING =====

#[test]
fn test_comments_and_hints_are_not_written() {
    let mut tree = server_config();
    tree.node_mut("port").set_comment("listening port");
    tree.node_mut("tags").set_hint("style", "flow");
    assert_eq!(
        to_json(&tree),
        r#"{"name":"primary","port":8080,"tags":["edge","eu"],"limits":{"connections":512,"burst":1.5}}"#
    );
}

#[test]
fn test_opaque_values_are_written_as_text() {
    #[derive(Debug)]
    struct Secret;

    impl std::fmt::Display for Secret {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("***")
        }
    }

    let mut tree = ConfigTree::new();
    tree.node_mut("token").set_value(Opaque::new(Secret)).unwrap();
    assert_eq!(to_json(&tree), r#"{"token":"***"}"#);

    let mut strict = ConfigTree::with_options(JsonFormat::pretty().default_options());
    let err = strict
        .node_mut("token")
        .set_value(Opaque::new(Secret))
        .unwrap_err();
    assert!(err.is_unsupported_value());
}

#[test]
fn test_non_finite_float_cannot_be_written() {
    let mut tree = ConfigTree::new();
    tree.node_mut(path!["ratio"]).set_value(f64::NAN).unwrap();
    let err = JsonFormat::compact().write(&tree).unwrap_err();
    assert!(err.is_unsupported_value());
    match err {
        configtree::Error::Format(format_err) => {
            assert!(format_err.is_unrepresentable());
            assert_eq!(format_err.format(), "json");
        }
        other => panic!("Expected format error, got: {other}"),
    }
}
