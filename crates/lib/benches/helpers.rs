//! Shared helpers for benchmarks

use configtree::{ConfigTree, Value};

/// Builds a tree with `sections` maps of `keys` scalar entries each.
///
/// Each entry has the form `section_N.key_M -> "value_M"`, and every section
/// also carries a `port` integer so typed reads have something to coerce.
pub fn populated_tree(sections: usize, keys: usize) -> ConfigTree {
    let mut tree = ConfigTree::new();
    let document = Value::map((0..sections).map(|s| {
        let mut entries: Vec<(String, Value)> = (0..keys)
            .map(|k| (format!("key_{k}"), Value::from(format!("value_{k}"))))
            .collect();
        entries.push(("port".to_string(), Value::from(8000 + s as i64)));
        (format!("section_{s}"), Value::map(entries))
    }));
    tree.root_mut()
        .set_value(document)
        .expect("Failed to populate tree");
    tree
}
