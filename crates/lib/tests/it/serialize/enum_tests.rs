//! Enum mapping tests.

use configtree::{ConfigTree, config_enum};

use crate::helpers::*;

config_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LogLevel { Debug, Info, Warn, Error }
}

config_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Casing { Mode, MODE }
}

#[test]
fn test_enum_reads_exact_and_case_insensitive() {
    assert_eq!(read_as::<LogLevel>("Warn").unwrap(), LogLevel::Warn);
    assert_eq!(read_as::<LogLevel>("info").unwrap(), LogLevel::Info);
    assert_eq!(read_as::<LogLevel>(" DEBUG ").unwrap(), LogLevel::Debug);
}

#[test]
fn test_unknown_constant_lists_expected() {
    let err = assert_coercion_error(read_as::<LogLevel>("verbose"));
    assert!(err.is_invalid_enum());
    let message = err.to_string();
    assert!(message.contains("verbose"));
    assert!(message.contains("Debug, Info, Warn, Error"));
}

#[test]
fn test_exact_match_wins_over_case_folding() {
    assert_eq!(read_as::<Casing>("MODE").unwrap(), Casing::MODE);
    assert_eq!(read_as::<Casing>("Mode").unwrap(), Casing::Mode);
    assert!(read_as::<Casing>("mode").unwrap_err().is_invalid_enum());
}

#[test]
fn test_enum_writes_variant_name() {
    let mut tree = ConfigTree::new();
    tree.node_mut("level").set_as(LogLevel::Error).unwrap();
    assert_eq!(tree.node("level").get_string().as_deref(), Some("Error"));

    tree.node_mut("levels")
        .set_as(vec![LogLevel::Debug, LogLevel::Info])
        .unwrap();
    assert_eq!(to_json(&tree), r#"{"level":"Error","levels":["Debug","Info"]}"#);
    assert_eq!(
        tree.node("levels").get_as::<Vec<LogLevel>>().unwrap(),
        [LogLevel::Debug, LogLevel::Info]
    );
}
