//! Path-addressed transformation actions.

use tracing::debug;

use super::{ConfigTransformation, MoveStrategy, PathSegment, WildcardPath};
use crate::{
    ConfigTree, Error,
    node::{NodeError, NodeId, NodeMut, NodePath},
};

/// Work done at one matched node.
///
/// Receives the concrete path of the node, relative to where the
/// transformation was applied, and a handle on it. Returning a path other
/// than the one given moves the node's subtree there.
pub type TransformAction<E = Error> =
    dyn Fn(&NodePath, &mut NodeMut<'_>) -> Result<Option<NodePath>, E> + Send + Sync;

/// Order in which registered actions run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionOrder {
    /// By [`WildcardPath`] ordering: deeper paths first, concrete segments
    /// before wildcards.
    #[default]
    PathComparator,
    /// In registration order.
    Insertion,
}

/// Builds a [`SingleTransformation`].
pub struct TransformationBuilder<E = Error> {
    actions: Vec<(WildcardPath, Box<TransformAction<E>>)>,
    strategy: MoveStrategy,
    order: ActionOrder,
}

impl<E> TransformationBuilder<E> {
    pub fn new() -> Self {
        TransformationBuilder {
            actions: Vec::new(),
            strategy: MoveStrategy::default(),
            order: ActionOrder::default(),
        }
    }

    /// Registers `action` at `path`, replacing any action already there.
    pub fn add_action<F>(mut self, path: impl Into<WildcardPath>, action: F) -> Self
    where
        F: Fn(&NodePath, &mut NodeMut<'_>) -> Result<Option<NodePath>, E> + Send + Sync + 'static,
    {
        let path = path.into();
        let action: Box<TransformAction<E>> = Box::new(action);
        match self.actions.iter_mut().find(|(existing, _)| *existing == path) {
            Some(entry) => entry.1 = action,
            None => self.actions.push((path, action)),
        }
        self
    }

    pub fn move_strategy(mut self, strategy: MoveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn action_order(mut self, order: ActionOrder) -> Self {
        self.order = order;
        self
    }

    pub fn build(mut self) -> SingleTransformation<E> {
        if self.order == ActionOrder::PathComparator {
            self.actions.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        SingleTransformation {
            actions: self.actions,
            strategy: self.strategy,
        }
    }
}

impl<E> Default for TransformationBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs path-addressed actions over a tree.
///
/// For each registered path, in order:
///
/// - concrete segments are followed directly; if the node does not exist the
///   action is skipped
/// - a wildcard fans out over the children present at that moment, and a
///   node without children ends that branch
/// - the action runs on every node reached, and may move it by returning a
///   different path
///
/// Children removed by an earlier action in the same fan-out are skipped.
pub struct SingleTransformation<E = Error> {
    actions: Vec<(WildcardPath, Box<TransformAction<E>>)>,
    strategy: MoveStrategy,
}

impl<E> SingleTransformation<E> {
    /// Registered paths in the order they run.
    pub fn paths(&self) -> impl Iterator<Item = &WildcardPath> {
        self.actions.iter().map(|(path, _)| path)
    }

    pub fn move_strategy(&self) -> MoveStrategy {
        self.strategy
    }
}

impl<E: From<NodeError>> SingleTransformation<E> {
    fn visit(
        &self,
        tree: &mut ConfigTree,
        start: NodeId,
        node: NodeId,
        segments: &[PathSegment],
        action: &TransformAction<E>,
    ) -> Result<(), E> {
        let mut current = node;
        for (depth, segment) in segments.iter().enumerate() {
            let Some(key) = segment.as_key() else {
                for (_, child) in tree.children(current) {
                    if tree.is_live(child) {
                        self.visit(tree, start, child, &segments[depth + 1..], action)?;
                    }
                }
                return Ok(());
            };
            match tree.child(current, &key) {
                Some(child) => current = child,
                None => return Ok(()),
            }
        }
        self.run(tree, start, current, action)
    }

    fn run(
        &self,
        tree: &mut ConfigTree,
        start: NodeId,
        node: NodeId,
        action: &TransformAction<E>,
    ) -> Result<(), E> {
        let offset = tree.path_of(start).len();
        let path: NodePath = tree.path_of(node).iter().skip(offset).cloned().collect();
        let Some(mut handle) = tree.node_mut_by_id(node) else {
            return Ok(());
        };
        let target = action(&path, &mut handle)?;
        debug!(path = %path, "applied transformation action");

        match target {
            Some(target) if target != path => {
                debug!(from = %path, to = %target, strategy = ?self.strategy, "moving node");
                relocate(tree, start, node, target, self.strategy)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Copies the subtree at `from` to `to` (relative to `start`) and clears the
/// original.
///
/// The original is cleared before the target is written, so a target nested
/// inside the source survives the move.
fn relocate(
    tree: &mut ConfigTree,
    start: NodeId,
    from: NodeId,
    to: NodePath,
    strategy: MoveStrategy,
) -> Result<(), NodeError> {
    let target_path = tree.path_of(start).join(&to);
    let source = tree.extract(from);
    if let Some(mut original) = tree.node_mut_by_id(from) {
        original.clear();
    }
    let mut root = tree.root_mut();
    let mut target = root.get_node(target_path);
    match strategy {
        MoveStrategy::Merge => target.merge_values_from(&source.root())?,
        MoveStrategy::Overwrite => target.set_node(&source.root())?,
    }
    Ok(())
}

impl<E: From<NodeError>> ConfigTransformation<E> for SingleTransformation<E> {
    fn apply(&self, node: &mut NodeMut<'_>) -> Result<(), E> {
        let Some(start) = node.id() else {
            return Ok(());
        };
        let tree = &mut *node.tree;
        for (path, action) in &self.actions {
            if !tree.is_live(start) {
                break;
            }
            self.visit(tree, start, start, path.segments(), action.as_ref())?;
        }
        Ok(())
    }
}
