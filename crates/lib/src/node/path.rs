//! Concrete paths from one node to another.
//!
//! A [`NodePath`] is an immutable, ordered sequence of [`Key`]s. Paths are
//! always relative: the path of a node is relative to the root of its tree,
//! and a path handed to [`get_node`](crate::node::Node::get_node) is relative
//! to the node it is called on.
//!
//! # Usage
//!
//! ```rust
//! use configtree::{path, node::{Key, NodePath}};
//!
//! let path = path!["servers", 0, "host"];
//! assert_eq!(path.len(), 3);
//! assert_eq!(path[1], Key::Index(0));
//! assert_eq!(path.to_string(), "servers.0.host");
//!
//! let parent = path.parent().unwrap();
//! assert_eq!(parent, path!["servers", 0]);
//! assert_eq!(parent.child("port"), path!["servers", 0, "port"]);
//! ```

use std::{fmt, ops::Index};

use super::Key;

/// An owned sequence of keys addressing a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    keys: Vec<Key>,
}

impl NodePath {
    /// The empty path, addressing the node it is resolved against.
    pub fn root() -> Self {
        Self { keys: Vec::new() }
    }

    /// Creates a path from its keys.
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// Number of keys in the path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether this is the empty path.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The keys of this path in order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Iterates over the keys.
    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.keys.iter()
    }

    /// The last key, if any.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }

    /// The path without its last key. `None` for the empty path.
    pub fn parent(&self) -> Option<NodePath> {
        let (_, init) = self.keys.split_last()?;
        Some(NodePath::new(init.to_vec()))
    }

    /// Returns a new path with `key` appended.
    pub fn child(&self, key: impl Into<Key>) -> NodePath {
        let mut keys = self.keys.clone();
        keys.push(key.into());
        NodePath { keys }
    }

    /// Returns a new path with every key of `other` appended.
    pub fn join(&self, other: &NodePath) -> NodePath {
        let mut keys = self.keys.clone();
        keys.extend(other.keys.iter().cloned());
        NodePath { keys }
    }

    /// Returns a new path with the key at `index` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn with_key(&self, index: usize, key: impl Into<Key>) -> NodePath {
        let mut keys = self.keys.clone();
        keys[index] = key.into();
        NodePath { keys }
    }

    /// Whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        other.keys.starts_with(&self.keys)
    }

    pub(crate) fn push(&mut self, key: Key) {
        self.keys.push(key);
    }

    pub(crate) fn into_keys(self) -> Vec<Key> {
        self.keys
    }
}

impl Index<usize> for NodePath {
    type Output = Key;

    fn index(&self, index: usize) -> &Key {
        &self.keys[index]
    }
}

impl<'a> IntoIterator for &'a NodePath {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl FromIterator<Key> for NodePath {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        NodePath {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return f.write_str("<root>");
        }
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl From<Vec<Key>> for NodePath {
    fn from(keys: Vec<Key>) -> Self {
        NodePath { keys }
    }
}

impl From<&NodePath> for NodePath {
    fn from(path: &NodePath) -> Self {
        path.clone()
    }
}

impl From<Key> for NodePath {
    fn from(key: Key) -> Self {
        NodePath { keys: vec![key] }
    }
}

impl From<&Key> for NodePath {
    fn from(key: &Key) -> Self {
        NodePath {
            keys: vec![key.clone()],
        }
    }
}

impl From<&str> for NodePath {
    fn from(key: &str) -> Self {
        Key::from(key).into()
    }
}

impl From<String> for NodePath {
    fn from(key: String) -> Self {
        Key::from(key).into()
    }
}

impl From<usize> for NodePath {
    fn from(index: usize) -> Self {
        Key::from(index).into()
    }
}

impl From<i32> for NodePath {
    fn from(index: i32) -> Self {
        Key::from(index).into()
    }
}

impl<const N: usize> From<[&str; N]> for NodePath {
    fn from(keys: [&str; N]) -> Self {
        keys.into_iter().map(Key::from).collect()
    }
}

/// Builds a [`NodePath`] from a mixed list of names and indices.
///
/// ```
/// # use configtree::{path, node::{Key, NodePath}};
/// assert_eq!(path![], NodePath::root());
/// assert_eq!(path!["a", 2], NodePath::new(vec![Key::from("a"), Key::Index(2)]));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::node::NodePath::root()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::node::NodePath::new(vec![$($crate::node::Key::from($key)),+])
    };
}
