//! Structural rewrites of configuration trees.
//!
//! A [`SingleTransformation`] maps [`WildcardPath`]s to actions. Applying it
//! visits every node matching each path and runs the action there; an action
//! may return a new path, in which case the node's subtree is moved there.
//! [`ChainedTransformation`] runs several transformations in order, and
//! [`VersionedTransformation`] runs only the steps newer than the version
//! recorded in the document.
//!
//! Transformations are generic over the error type their actions return. It
//! defaults to [`crate::Error`]; any type convertible from
//! [`NodeError`](crate::node::NodeError) works.
//!
//! ```rust
//! use configtree::{ConfigTree, path, transform::{self, ConfigTransformation}};
//!
//! let mut tree = ConfigTree::new();
//! tree.node_mut(path!["servers", "main", "addr"]).set_value("10.0.0.1")?;
//! tree.node_mut(path!["servers", "backup", "addr"]).set_value("10.0.0.2")?;
//!
//! let migration = transform::builder()
//!     .add_action(["servers", "*", "addr"], transform::rename("host"))
//!     .build();
//! migration.apply(&mut tree.root_mut())?;
//!
//! assert_eq!(
//!     tree.node(path!["servers", "backup", "host"]).get_string().as_deref(),
//!     Some("10.0.0.2")
//! );
//! assert!(tree.node(path!["servers", "main", "addr"]).is_virtual());
//! # Ok::<(), configtree::Error>(())
//! ```

mod actions;
mod chained;
mod path;
mod single;
mod versioned;

pub use actions::{move_to, remove, rename, set_value};
pub use chained::ChainedTransformation;
pub use path::{PathSegment, WILDCARD, WildcardPath};
pub use single::{ActionOrder, SingleTransformation, TransformAction, TransformationBuilder};
pub use versioned::{UNVERSIONED, VersionedBuilder, VersionedTransformation};

use crate::{ConfigTree, Error, node::NodeMut};

/// How a moved subtree is combined with what already exists at its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveStrategy {
    /// Fill in only what the target lacks; existing target values win.
    Merge,
    /// Replace the target entirely, so a renamed key carries its own value.
    #[default]
    Overwrite,
}

/// Rewrites the subtree below a node.
///
/// Closures taking `&mut NodeMut` implement this trait.
pub trait ConfigTransformation<E = Error>: Send + Sync {
    fn apply(&self, node: &mut NodeMut<'_>) -> Result<(), E>;

    /// Applies this transformation to the root of `tree`.
    fn apply_to(&self, tree: &mut ConfigTree) -> Result<(), E> {
        self.apply(&mut tree.root_mut())
    }
}

impl<E, F> ConfigTransformation<E> for F
where
    F: Fn(&mut NodeMut<'_>) -> Result<(), E> + Send + Sync,
{
    fn apply(&self, node: &mut NodeMut<'_>) -> Result<(), E> {
        self(node)
    }
}

/// Starts a [`SingleTransformation`] whose actions fail with [`crate::Error`].
pub fn builder() -> TransformationBuilder {
    TransformationBuilder::new()
}

/// Starts a [`VersionedTransformation`] whose steps fail with [`crate::Error`].
pub fn versioned() -> VersionedBuilder {
    VersionedBuilder::new()
}

/// Runs `transformations` one after another.
pub fn chain<E>(
    transformations: impl IntoIterator<Item = Box<dyn ConfigTransformation<E>>>,
) -> ChainedTransformation<E> {
    transformations.into_iter().collect()
}
