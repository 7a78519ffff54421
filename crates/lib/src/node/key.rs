//! Keys addressing a child within its parent container.

use std::fmt;

/// The key of a child node.
///
/// Map children are addressed by [`Key::Name`], list children by their dense
/// [`Key::Index`]. The root node has no key.
///
/// ```
/// # use configtree::node::Key;
/// assert_eq!(Key::from("port"), Key::Name("port".to_string()));
/// assert_eq!(Key::from(3usize), Key::Index(3));
/// assert_eq!(Key::from(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A list position.
    Index(usize),
    /// A map key.
    Name(String),
}

impl Key {
    /// Returns the list index if this is an index key.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(_) => None,
        }
    }

    /// Returns the map name if this is a named key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    /// Whether this key addresses a list position.
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Name(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Name(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Key::Name(value.clone())
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Index(value)
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Index(value as usize)
    }
}

/// Integer literals default to `i32`, so this lets `node.get_node(0)` read
/// naturally. Negative values have no list position and become names.
impl From<i32> for Key {
    fn from(value: i32) -> Self {
        match usize::try_from(value) {
            Ok(index) => Key::Index(index),
            Err(_) => Key::Name(value.to_string()),
        }
    }
}
