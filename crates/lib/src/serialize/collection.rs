//! Serializers for lists, sets, maps and raw subtrees.
//!
//! Writes reconcile with what the node already holds: children whose key
//! survives are updated in place, missing ones are removed, new ones added.
//! Writing an empty collection still leaves an (empty) container behind.

use std::{collections::HashSet, sync::Arc};

use super::{
    CoercionError, DynList, DynMap, DynValue, MappingError, TypeSerializer, TypeToken, downcast,
};
use crate::{
    ConfigOptions,
    node::{ConfigTree, Key, Node, NodeMut, NodePath, Value},
};

fn param(
    ty: &TypeToken,
    index: usize,
    node_path: impl FnOnce() -> NodePath,
) -> Result<TypeToken, MappingError> {
    ty.param(index)
        .map(TypeToken::canonical)
        .ok_or_else(|| MappingError::custom(node_path(), ty, "missing type parameter"))
}

fn resolve(
    options: &ConfigOptions,
    ty: &TypeToken,
    node_path: impl FnOnce() -> NodePath,
) -> Result<Arc<dyn TypeSerializer>, MappingError> {
    options
        .serializers()
        .resolve(ty)
        .ok_or_else(|| MappingError::unresolved(node_path(), ty))
}

fn wrong_shape(node: &Node<'_>, ty: &TypeToken, found: &'static str) -> MappingError {
    MappingError::coercion(node.path(), ty, CoercionError::WrongShape { found })
}

/// Handles the list and set families.
///
/// A scalar node reads as a one-element list and an empty node as an empty
/// one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSerializer;

impl TypeSerializer for ListSerializer {
    fn deserialize(&self, ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError> {
        let element = param(ty, 0, || node.path())?;
        let serializer = resolve(node.options(), &element, || node.path())?;
        let children = if node.is_list() {
            node.children_list()
        } else if node.is_scalar() {
            vec![node.clone()]
        } else if node.is_map() {
            return Err(wrong_shape(node, ty, "map"));
        } else {
            Vec::new()
        };
        let items = children
            .iter()
            .map(|child| serializer.deserialize(&element, child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(DynList(items)))
    }

    fn serialize(
        &self,
        ty: &TypeToken,
        value: Option<DynValue>,
        node: &mut NodeMut<'_>,
    ) -> Result<(), MappingError> {
        let Some(value) = value else {
            node.clear();
            return Ok(());
        };
        let DynList(items) =
            downcast::<DynList>(value).ok_or_else(|| MappingError::mismatch(node.path(), ty))?;
        let element = param(ty, 0, || node.path())?;
        let serializer = resolve(node.options(), &element, || node.path())?;

        if !node.is_list() {
            node.set_value(Value::empty_list())?;
        }
        // Elements that write nothing leave no slot, so later elements
        // close the gap instead of landing at their source index.
        let mut cursor = 0;
        for item in items {
            let before = node.child_keys().len();
            serializer.serialize(&element, Some(item), &mut node.get_node(Key::Index(cursor)))?;
            let after = node.child_keys().len();
            if after > before || (cursor < before && after == before) {
                cursor += 1;
            }
        }
        for index in (cursor..node.child_keys().len()).rev() {
            node.remove_child(Key::Index(index));
        }
        Ok(())
    }
}

/// Handles the map family. Keys are stored by their text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapSerializer;

impl TypeSerializer for MapSerializer {
    fn deserialize(&self, ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError> {
        let key_ty = param(ty, 0, || node.path())?;
        let value_ty = param(ty, 1, || node.path())?;
        let key_serializer = resolve(node.options(), &key_ty, || node.path())?;
        let value_serializer = resolve(node.options(), &value_ty, || node.path())?;
        if node.is_null() {
            return Ok(Box::new(DynMap(Vec::new())));
        }
        if !node.is_map() {
            let found = if node.is_list() { "list" } else { "scalar" };
            return Err(wrong_shape(node, ty, found));
        }

        let mut scratch = ConfigTree::with_options(node.options().clone());
        let mut entries = Vec::new();
        for (key, child) in node.children_map() {
            scratch.root_mut().set_value(key.to_string())?;
            let key_value = key_serializer
                .deserialize(&key_ty, &scratch.root())
                .map_err(|err| {
                    MappingError::custom(child.path(), &key_ty, format!("invalid map key: {err}"))
                })?;
            let value = value_serializer.deserialize(&value_ty, &child)?;
            entries.push((key_value, value));
        }
        Ok(Box::new(DynMap(entries)))
    }

    fn serialize(
        &self,
        ty: &TypeToken,
        value: Option<DynValue>,
        node: &mut NodeMut<'_>,
    ) -> Result<(), MappingError> {
        let Some(value) = value else {
            node.clear();
            return Ok(());
        };
        let DynMap(entries) =
            downcast::<DynMap>(value).ok_or_else(|| MappingError::mismatch(node.path(), ty))?;
        let key_ty = param(ty, 0, || node.path())?;
        let value_ty = param(ty, 1, || node.path())?;
        let value_serializer = resolve(node.options(), &value_ty, || node.path())?;

        let mut scratch = ConfigTree::with_options(node.options().clone());
        let mut keyed = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            scratch.root_mut().set_dyn(&key_ty, Some(key))?;
            let key = scratch
                .root()
                .scalar()
                .map(|scalar| Key::Name(scalar.to_string()))
                .ok_or_else(|| {
                    MappingError::custom(node.path(), &key_ty, "map keys must be scalars")
                })?;
            keyed.push((key, value));
        }

        if !node.is_map() {
            node.set_value(Value::empty_map())?;
        }
        let keep: HashSet<&Key> = keyed.iter().map(|(key, _)| key).collect();
        for key in node.child_keys() {
            if !keep.contains(&key) {
                node.remove_child(key);
            }
        }
        for (key, value) in keyed {
            let mut child = node.get_node(key);
            value_serializer.serialize(&value_ty, Some(value), &mut child)?;
        }
        Ok(())
    }
}

/// Copies whole subtrees as [`Value`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

impl TypeSerializer for ValueSerializer {
    fn deserialize(&self, _ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError> {
        Ok(Box::new(node.get_value()))
    }

    fn serialize(
        &self,
        ty: &TypeToken,
        value: Option<DynValue>,
        node: &mut NodeMut<'_>,
    ) -> Result<(), MappingError> {
        let value = match value {
            Some(value) => {
                downcast::<Value>(value).ok_or_else(|| MappingError::mismatch(node.path(), ty))?
            }
            None => Value::Null,
        };
        node.set_value(value)?;
        Ok(())
    }
}
