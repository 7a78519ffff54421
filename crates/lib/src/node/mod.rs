//! The configuration node tree.
//!
//! A [`ConfigTree`] owns every node in a single arena. Nodes refer to their
//! children and to their parent by [`NodeId`], so the parent link is a plain
//! index and never an owning reference. Callers work with two kinds of
//! handle:
//!
//! - [`Node`] borrows the tree immutably and exposes reads.
//! - [`NodeMut`] borrows the tree exclusively and exposes mutation.
//!
//! # Virtual nodes
//!
//! Traversing to a path that does not exist yields a *virtual* handle. A
//! virtual node has no value and is invisible to its parent's children
//! accessors. The first real value written through a virtual handle attaches
//! it together with every virtual ancestor on the way from the nearest
//! attached node. Writing [`Value::Null`] detaches a node again.
//!
//! ```rust
//! use configtree::{ConfigTree, path};
//!
//! let mut tree = ConfigTree::new();
//! assert!(tree.node(path!["server", "port"]).is_virtual());
//!
//! tree.node_mut(path!["server", "port"]).set_value(8080)?;
//! assert!(tree.node("server").is_map());
//! assert_eq!(tree.node(path!["server", "port"]).get_i64(), Some(8080));
//!
//! tree.node_mut(path!["server", "port"]).set_value(None::<i64>)?;
//! assert!(tree.node(path!["server", "port"]).is_virtual());
//! # Ok::<(), configtree::Error>(())
//! ```

mod errors;
mod handle;
mod key;
pub mod path;
mod tree;
pub mod value;


use std::collections::BTreeMap;

pub use errors::NodeError;
pub use handle::{Node, NodeMut};
pub use key::Key;
pub use path::NodePath;
pub use tree::ConfigTree;
pub use value::{Opaque, OpaqueValue, Scalar, ScalarKind, Value};

/// Stable identifier of an attached node within one [`ConfigTree`].
///
/// Identifiers are generational: once a node is detached its id never
/// resolves again, even if the arena slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Out-of-band metadata carried by a node.
///
/// Format codecs store presentation details here. The tree keeps them
/// verbatim and never interprets them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NodeMeta {
    pub(crate) comment: Option<String>,
    pub(crate) hints: BTreeMap<String, Value>,
}

impl NodeMeta {
    pub(crate) fn is_empty(&self) -> bool {
        self.comment.is_none() && self.hints.is_empty()
    }

    /// Overlays `other` on top of `self`.
    pub(crate) fn absorb(&mut self, other: NodeMeta) {
        if other.comment.is_some() {
            self.comment = other.comment;
        }
        self.hints.extend(other.hints);
    }
}
