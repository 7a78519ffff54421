//! Ready-made transformation actions.
//!
//! Each function returns an action for
//! [`TransformationBuilder::add_action`](super::TransformationBuilder::add_action).

use crate::node::{Key, NodeError, NodeMut, NodePath, Value};

/// Detaches the matched node.
pub fn remove<E: 'static>()
-> impl Fn(&NodePath, &mut NodeMut<'_>) -> Result<Option<NodePath>, E> + Send + Sync + 'static {
    |_, node| {
        node.clear();
        Ok(None)
    }
}

/// Moves the matched node to a sibling named `key`.
///
/// The root has no siblings and is left alone.
pub fn rename<E: 'static>(
    key: impl Into<Key>,
) -> impl Fn(&NodePath, &mut NodeMut<'_>) -> Result<Option<NodePath>, E> + Send + Sync + 'static {
    let key = key.into();
    move |path, _| Ok(path.parent().map(|parent| parent.child(key.clone())))
}

/// Moves the matched node to `target`, relative to where the transformation
/// is applied.
pub fn move_to<E: 'static>(
    target: impl Into<NodePath>,
) -> impl Fn(&NodePath, &mut NodeMut<'_>) -> Result<Option<NodePath>, E> + Send + Sync + 'static {
    let target = target.into();
    move |_, _| Ok(Some(target.clone()))
}

/// Overwrites the matched node with `value`.
pub fn set_value<E: From<NodeError> + 'static>(
    value: impl Into<Value>,
) -> impl Fn(&NodePath, &mut NodeMut<'_>) -> Result<Option<NodePath>, E> + Send + Sync + 'static {
    let value = value.into();
    move |_, node| {
        node.set_value(value.clone())?;
        Ok(None)
    }
}
