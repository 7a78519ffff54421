use configtree::{
    ConfigTree, Value,
    format::{ConfigFormat, JsonFormat},
    serialize::MappingError,
};

// ==========================
// TREE FACTORIES
// ==========================

/// Builds a tree from a JSON literal using the JSON codec's options.
pub fn tree_from_json(json: &str) -> ConfigTree {
    JsonFormat::compact()
        .read(json)
        .expect("Failed to parse test document")
}

/// Renders a tree as compact JSON for whole-document assertions.
pub fn to_json(tree: &ConfigTree) -> String {
    JsonFormat::compact()
        .write(tree)
        .expect("Failed to render test document")
}

/// A small server configuration used across tests.
pub fn server_config() -> ConfigTree {
    let mut tree = ConfigTree::new();
    tree.root_mut()
        .set_value(Value::map([
            ("name", Value::from("primary")),
            ("port", Value::from(8080)),
            ("tags", Value::list(["edge", "eu"])),
            (
                "limits",
                Value::map([("connections", Value::from(512)), ("burst", Value::from(1.5))]),
            ),
        ]))
        .expect("Failed to build server config");
    tree
}

// ==========================
// ASSERTIONS
// ==========================

/// Reads `value` stored at the root as a `T`.
pub fn read_as<T: configtree::serialize::ConfigType>(
    value: impl Into<Value>,
) -> Result<T, MappingError> {
    let mut tree = ConfigTree::new();
    tree.root_mut()
        .set_value(value)
        .expect("Failed to store test value");
    tree.root().get_as::<T>()
}

/// Asserts that `result` failed with a coercion error and returns it.
pub fn assert_coercion_error<T: std::fmt::Debug>(result: Result<T, MappingError>) -> MappingError {
    match result {
        Ok(value) => panic!("Expected coercion failure, got value: {value:?}"),
        Err(err) => {
            assert!(
                err.is_coercion_failure() || err.is_invalid_enum(),
                "Expected coercion failure, got: {err}"
            );
            err
        }
    }
}
