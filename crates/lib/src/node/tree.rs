//! Arena storage backing a configuration tree.

use std::mem;

use indexmap::IndexMap;

use super::{Key, Node, NodeId, NodeMeta, NodeMut, NodePath, Scalar, Value, handle::Position};
use crate::options::{ConfigOptions, MapOrdering};

/// Content of one attached node.
///
/// `Null` only ever appears on the root, or transiently on a node between
/// attachment and its first assignment.
#[derive(Debug, Clone)]
pub(crate) enum Storage {
    Null,
    Scalar(Scalar),
    List(Vec<NodeId>),
    Map(IndexMap<Key, NodeId>),
}

impl Storage {
    fn child_ids(&self) -> Vec<NodeId> {
        match self {
            Storage::List(items) => items.clone(),
            Storage::Map(entries) => entries.values().copied().collect(),
            Storage::Null | Storage::Scalar(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) key: Option<Key>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) storage: Storage,
    pub(crate) meta: NodeMeta,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// A configuration document: a root node and everything attached below it.
///
/// Cloning a tree produces a fully independent deep copy.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    options: ConfigOptions,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ConfigTree {
    /// Trees are equal when their root values are equal.
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl ConfigTree {
    /// Creates an empty tree with default options.
    pub fn new() -> Self {
        Self::with_options(ConfigOptions::default())
    }

    /// Creates an empty tree using `options`.
    pub fn with_options(options: ConfigOptions) -> Self {
        let mut tree = ConfigTree {
            options,
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        tree.root = tree.alloc(None, None, Storage::Null);
        tree
    }

    /// The options shared by every node of this tree.
    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    /// Replaces the options. Existing content is kept as is.
    pub fn set_options(&mut self, options: ConfigOptions) {
        self.options = options;
    }

    /// Id of the root node, which is always attached.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Read handle on the root node.
    pub fn root(&self) -> Node<'_> {
        Node::new(self, Position::Attached(self.root))
    }

    /// Write handle on the root node.
    pub fn root_mut(&mut self) -> NodeMut<'_> {
        let root = self.root;
        NodeMut::new(self, Position::Attached(root))
    }

    /// Read handle on the node at `path` below the root.
    pub fn node(&self, path: impl Into<NodePath>) -> Node<'_> {
        self.root().get_node(path)
    }

    /// Write handle on the node at `path` below the root.
    pub fn node_mut(&mut self, path: impl Into<NodePath>) -> NodeMut<'_> {
        let position = self.locate(self.root, path.into().into_keys());
        NodeMut::new(self, position)
    }

    /// Read handle on an attached node, or `None` if `id` was detached.
    pub fn node_by_id(&self, id: NodeId) -> Option<Node<'_>> {
        self.is_live(id)
            .then(|| Node::new(self, Position::Attached(id)))
    }

    /// Write handle on an attached node, or `None` if `id` was detached.
    pub fn node_mut_by_id(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.is_live(id) {
            Some(NodeMut::new(self, Position::Attached(id)))
        } else {
            None
        }
    }

    /// Snapshot of the whole document.
    pub fn to_value(&self) -> Value {
        self.snapshot(self.root)
    }

    /// Number of attached nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    pub(crate) fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
    }

    fn alloc(&mut self, key: Option<Key>, parent: Option<NodeId>, storage: Storage) -> NodeId {
        let data = NodeData {
            key,
            parent,
            storage,
            meta: NodeMeta::default(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.data = Some(data);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    data: Some(data),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Releases `id` and its whole subtree. Does not touch the parent.
    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            if let Some(data) = slot.data.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                pending.extend(data.storage.child_ids());
            }
        }
    }

    pub(crate) fn child(&self, id: NodeId, key: &Key) -> Option<NodeId> {
        match &self.data(id)?.storage {
            Storage::Map(entries) => entries.get(key).copied(),
            Storage::List(items) => key.as_index().and_then(|i| items.get(i).copied()),
            Storage::Null | Storage::Scalar(_) => None,
        }
    }

    pub(crate) fn children(&self, id: NodeId) -> Vec<(Key, NodeId)> {
        match self.data(id).map(|data| &data.storage) {
            Some(Storage::Map(entries)) => entries.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            Some(Storage::List(items)) => items
                .iter()
                .enumerate()
                .map(|(i, id)| (Key::Index(i), *id))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Walks `keys` from `anchor` as far as attached nodes exist.
    pub(crate) fn locate(&self, anchor: NodeId, keys: Vec<Key>) -> Position {
        let mut current = anchor;
        for (depth, key) in keys.iter().enumerate() {
            match self.child(current, key) {
                Some(child) => current = child,
                None => {
                    return Position::Virtual {
                        anchor: current,
                        keys: keys[depth..].to_vec(),
                    };
                }
            }
        }
        Position::Attached(current)
    }

    pub(crate) fn path_of(&self, id: NodeId) -> NodePath {
        let mut keys = Vec::new();
        let mut current = self.data(id);
        while let Some(data) = current {
            if let Some(key) = &data.key {
                keys.push(key.clone());
            }
            current = data.parent.and_then(|parent| self.data(parent));
        }
        keys.reverse();
        NodePath::new(keys)
    }

    /// Inserts a fresh, empty child under `parent`, reshaping the parent's
    /// container as needed:
    ///
    /// - a name key turns a list or scalar parent into a map
    /// - an index key turns an empty parent into a list, and a scalar parent
    ///   into a list holding the old scalar at index 0
    /// - an index past the end of a list appends at the next dense index
    pub(crate) fn attach_child(&mut self, parent: NodeId, key: Key) -> NodeId {
        let ordering = self.options.map_ordering();
        let Some(old) = self
            .data_mut(parent)
            .map(|data| mem::replace(&mut data.storage, Storage::Null))
        else {
            return parent;
        };
        let mut released = Vec::new();
        let child = self.alloc(None, Some(parent), Storage::Null);

        let (storage, actual_key) = match (old, key) {
            (Storage::Map(mut entries), key) => {
                if let Some(previous) = entries.insert(key.clone(), child) {
                    released.push(previous);
                }
                (Storage::Map(entries), key)
            }
            (Storage::List(mut items), Key::Index(index)) => {
                if index < items.len() {
                    released.push(mem::replace(&mut items[index], child));
                    (Storage::List(items), Key::Index(index))
                } else {
                    items.push(child);
                    let last = items.len() - 1;
                    (Storage::List(items), Key::Index(last))
                }
            }
            (Storage::Scalar(scalar), Key::Index(index)) => {
                let promoted = self.alloc(Some(Key::Index(0)), Some(parent), Storage::Scalar(scalar));
                let mut items = vec![promoted];
                if index == 0 {
                    released.push(mem::replace(&mut items[0], child));
                    (Storage::List(items), Key::Index(0))
                } else {
                    items.push(child);
                    (Storage::List(items), Key::Index(1))
                }
            }
            (Storage::Null, Key::Index(_)) => (Storage::List(vec![child]), Key::Index(0)),
            (old, key @ Key::Name(_)) => {
                released.extend(old.child_ids());
                let mut entries = IndexMap::new();
                entries.insert(key.clone(), child);
                (Storage::Map(entries), key)
            }
        };

        for id in released {
            self.free_subtree(id);
        }
        if let Some(data) = self.data_mut(child) {
            data.key = Some(actual_key);
        }
        if let Some(data) = self.data_mut(parent) {
            data.storage = storage;
            if ordering == MapOrdering::Sorted {
                if let Storage::Map(entries) = &mut data.storage {
                    entries.sort_keys();
                }
            }
        }
        child
    }

    /// Removes `id` from its parent and frees its subtree. Later list
    /// siblings shift down one index.
    ///
    /// Returns the parent and the key the node had.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<(NodeId, Key)> {
        let data = self.data(id)?;
        let parent = data.parent?;
        let key = data.key.clone()?;
        let mut shifted = Vec::new();
        if let Some(parent_data) = self.data_mut(parent) {
            match &mut parent_data.storage {
                Storage::Map(entries) => {
                    entries.shift_remove(&key);
                }
                Storage::List(items) => {
                    if let Some(index) = items.iter().position(|child| *child == id) {
                        items.remove(index);
                        shifted.extend(items.iter().copied().enumerate().skip(index));
                    }
                }
                Storage::Null | Storage::Scalar(_) => {}
            }
        }
        for (index, sibling) in shifted {
            if let Some(data) = self.data_mut(sibling) {
                data.key = Some(Key::Index(index));
            }
        }
        self.free_subtree(id);
        Some((parent, key))
    }

    fn replace_storage(&mut self, id: NodeId, storage: Storage) {
        let released = match self.data_mut(id) {
            Some(data) => mem::replace(&mut data.storage, storage).child_ids(),
            None => return,
        };
        for child in released {
            self.free_subtree(child);
        }
    }

    /// Writes `value` into an attached node.
    ///
    /// Existing children whose key survives are updated in place so their
    /// identity and metadata are kept. Callers validate `value` against the
    /// accepted types beforehand.
    pub(crate) fn assign(&mut self, id: NodeId, value: Value) {
        match value {
            Value::Null => self.replace_storage(id, Storage::Null),
            Value::Scalar(scalar) => self.replace_storage(id, Storage::Scalar(scalar)),
            Value::List(items) => {
                let items: Vec<Value> = items.into_iter().filter(|v| !v.is_null()).collect();
                let existing = match self.data(id).map(|data| &data.storage) {
                    Some(Storage::List(current)) => current.clone(),
                    Some(_) => {
                        self.replace_storage(id, Storage::List(Vec::new()));
                        Vec::new()
                    }
                    None => return,
                };
                for child in existing.iter().skip(items.len()).rev() {
                    self.detach(*child);
                }
                for (index, item) in items.into_iter().enumerate() {
                    let child = match existing.get(index) {
                        Some(child) => *child,
                        None => self.attach_child(id, Key::Index(index)),
                    };
                    self.assign(child, item);
                }
            }
            Value::Map(entries) => {
                let entries: Vec<(Key, Value)> =
                    entries.into_iter().filter(|(_, v)| !v.is_null()).collect();
                match self.data(id).map(|data| &data.storage) {
                    Some(Storage::Map(current)) => {
                        let stale: Vec<NodeId> = current
                            .iter()
                            .filter(|(key, _)| !entries.iter().any(|(k, _)| k == *key))
                            .map(|(_, child)| *child)
                            .collect();
                        for child in stale {
                            self.detach(child);
                        }
                    }
                    Some(_) => self.replace_storage(id, Storage::Map(IndexMap::new())),
                    None => return,
                }
                let order: Vec<Key> = entries.iter().map(|(k, _)| k.clone()).collect();
                for (key, item) in entries {
                    let child = match self.child(id, &key) {
                        Some(child) => child,
                        None => self.attach_child(id, key),
                    };
                    self.assign(child, item);
                }
                if self.options.map_ordering() == MapOrdering::Insertion {
                    if let Some(Storage::Map(current)) = self.data_mut(id).map(|d| &mut d.storage) {
                        current.sort_by_cached_key(|key, _| order.iter().position(|k| k == key));
                    }
                }
            }
        }
    }

    /// Deep-copies `source_id` of `source` over the attached node `target`,
    /// metadata included.
    pub(crate) fn graft(&mut self, target: NodeId, source: &ConfigTree, source_id: NodeId) {
        let Some(data) = source.data(source_id) else {
            return;
        };
        if let Some(target_data) = self.data_mut(target) {
            target_data.meta = data.meta.clone();
        }
        match &data.storage {
            Storage::Null => self.replace_storage(target, Storage::Null),
            Storage::Scalar(scalar) => self.replace_storage(target, Storage::Scalar(scalar.clone())),
            Storage::List(_) => {
                self.replace_storage(target, Storage::List(Vec::new()));
                for (_, child) in source.children(source_id) {
                    let copy = self.attach_child(target, Key::Index(usize::MAX));
                    self.graft(copy, source, child);
                }
            }
            Storage::Map(_) => {
                self.replace_storage(target, Storage::Map(IndexMap::new()));
                for (key, child) in source.children(source_id) {
                    let copy = self.attach_child(target, key);
                    self.graft(copy, source, child);
                }
            }
        }
    }

    /// Fills in whatever `target` lacks from `source`. Existing values of
    /// `target` win; maps are merged key by key.
    pub(crate) fn merge(&mut self, target: NodeId, source: &ConfigTree, source_id: NodeId) {
        let Some(data) = source.data(source_id) else {
            return;
        };
        let source_is_map = matches!(data.storage, Storage::Map(_));
        if matches!(data.storage, Storage::Null) {
            return;
        }
        let (target_empty, target_is_map) = match self.data(target).map(|d| &d.storage) {
            Some(Storage::Null) => (true, false),
            Some(Storage::Map(_)) => (false, true),
            Some(_) => (false, false),
            None => return,
        };
        if target_empty {
            self.graft(target, source, source_id);
        } else if source_is_map && target_is_map {
            for (key, child) in source.children(source_id) {
                match self.child(target, &key) {
                    Some(existing) => self.merge(existing, source, child),
                    None => {
                        let copy = self.attach_child(target, key);
                        self.graft(copy, source, child);
                    }
                }
            }
        }
    }

    pub(crate) fn snapshot(&self, id: NodeId) -> Value {
        let Some(data) = self.data(id) else {
            return Value::Null;
        };
        match &data.storage {
            Storage::Null => Value::Null,
            Storage::Scalar(scalar) => Value::Scalar(scalar.clone()),
            Storage::List(items) => Value::List(items.iter().map(|c| self.snapshot(*c)).collect()),
            Storage::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, c)| (k.clone(), self.snapshot(*c)))
                    .collect(),
            ),
        }
    }

    /// Copies the subtree at `id` into a new tree sharing these options.
    pub(crate) fn extract(&self, id: NodeId) -> ConfigTree {
        let mut copy = ConfigTree::with_options(self.options.clone());
        let root = copy.root;
        copy.graft(root, self, id);
        copy
    }
}
