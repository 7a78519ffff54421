//! Read and write handles on tree positions.

use std::{collections::BTreeMap, fmt};

use indexmap::IndexMap;

use super::{
    ConfigTree, Key, NodeError, NodeId, NodeMeta, NodePath, Scalar, Value,
    tree::{NodeData, Storage},
};
use crate::{
    options::ConfigOptions,
    serialize::{ConfigType, MappingError, TypeToken, coerce},
};

static NO_HINTS: BTreeMap<String, Value> = BTreeMap::new();

/// Where a handle points.
///
/// A virtual position remembers the nearest attached ancestor and the keys
/// leading from it to the requested node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Position {
    Attached(NodeId),
    Virtual { anchor: NodeId, keys: Vec<Key> },
}

impl Position {
    /// Re-walks a virtual position, which may have been attached by a write
    /// through another handle since it was created.
    fn resolve(&self, tree: &ConfigTree) -> Position {
        match self {
            Position::Attached(_) => self.clone(),
            Position::Virtual { anchor, keys } => tree.locate(*anchor, keys.clone()),
        }
    }

    fn descend(&self, tree: &ConfigTree, path: NodePath) -> Position {
        match self {
            Position::Attached(id) => tree.locate(*id, path.into_keys()),
            Position::Virtual { anchor, keys } => {
                let mut keys = keys.clone();
                keys.extend(path.into_keys());
                tree.locate(*anchor, keys)
            }
        }
    }
}

/// A read-only handle on a node, attached or virtual.
///
/// Handles are cheap to clone. While any `Node` exists the tree cannot change,
/// so everything a handle reports stays valid for its lifetime.
#[derive(Clone)]
pub struct Node<'t> {
    tree: &'t ConfigTree,
    position: Position,
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path())
            .field("virtual", &self.is_virtual())
            .field("value", &self.get_value())
            .finish()
    }
}

impl<'t> Node<'t> {
    pub(crate) fn new(tree: &'t ConfigTree, position: Position) -> Self {
        Node { tree, position }
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'t ConfigTree {
        self.tree
    }

    /// Options of the owning tree.
    pub fn options(&self) -> &'t ConfigOptions {
        self.tree.options()
    }

    /// Arena id, for attached nodes only.
    pub fn id(&self) -> Option<NodeId> {
        match self.position {
            Position::Attached(id) if self.tree.is_live(id) => Some(id),
            _ => None,
        }
    }

    fn data(&self) -> Option<&'t NodeData> {
        match self.position {
            Position::Attached(id) => self.tree.data(id),
            Position::Virtual { .. } => None,
        }
    }

    pub(crate) fn storage(&self) -> Option<&'t Storage> {
        self.data().map(|data| &data.storage)
    }

    /// This node's key in its parent. `None` for the root.
    pub fn key(&self) -> Option<Key> {
        match &self.position {
            Position::Attached(_) => self.data().and_then(|data| data.key.clone()),
            Position::Virtual { keys, .. } => keys.last().cloned(),
        }
    }

    /// Path from the root of the tree to this node.
    pub fn path(&self) -> NodePath {
        match &self.position {
            Position::Attached(id) => self.tree.path_of(*id),
            Position::Virtual { anchor, keys } => {
                let mut path = self.tree.path_of(*anchor);
                for key in keys {
                    path.push(key.clone());
                }
                path
            }
        }
    }

    /// The parent node, virtual if this node's parent is virtual.
    pub fn parent(&self) -> Option<Node<'t>> {
        let position = match &self.position {
            Position::Attached(_) => Position::Attached(self.data()?.parent?),
            Position::Virtual { anchor, keys } if keys.len() == 1 => Position::Attached(*anchor),
            Position::Virtual { anchor, keys } => Position::Virtual {
                anchor: *anchor,
                keys: keys[..keys.len() - 1].to_vec(),
            },
        };
        Some(Node::new(self.tree, position))
    }

    /// Traverses to a descendant. Never fails: missing nodes come back
    /// virtual.
    pub fn get_node(&self, path: impl Into<NodePath>) -> Node<'t> {
        Node::new(self.tree, self.position.descend(self.tree, path.into()))
    }

    /// Whether this node has no place in the tree.
    pub fn is_virtual(&self) -> bool {
        self.data().is_none()
    }

    /// Whether this node holds no value. True for virtual nodes and an
    /// empty root.
    pub fn is_null(&self) -> bool {
        matches!(self.storage(), None | Some(Storage::Null))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.storage(), Some(Storage::Map(_)))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.storage(), Some(Storage::List(_)))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.storage(), Some(Storage::Scalar(_)))
    }

    /// Whether this node is a container with at least one child.
    pub fn has_children(&self) -> bool {
        match self.storage() {
            Some(Storage::Map(entries)) => !entries.is_empty(),
            Some(Storage::List(items)) => !items.is_empty(),
            _ => false,
        }
    }

    /// Snapshot of this node's value. [`Value::Null`] when virtual.
    pub fn get_value(&self) -> Value {
        match self.position {
            Position::Attached(id) => self.tree.snapshot(id),
            Position::Virtual { .. } => Value::Null,
        }
    }

    /// Snapshot of this node's value, or `default` when it holds none.
    pub fn get_value_or(&self, default: impl Into<Value>) -> Value {
        if self.is_null() {
            default.into()
        } else {
            self.get_value()
        }
    }

    /// The scalar held by this node, if it is a leaf.
    pub fn scalar(&self) -> Option<&'t Scalar> {
        match self.storage() {
            Some(Storage::Scalar(scalar)) => Some(scalar),
            _ => None,
        }
    }

    /// Leniently reads the scalar as a string.
    pub fn get_string(&self) -> Option<String> {
        self.scalar().map(Scalar::to_string)
    }

    /// Leniently reads the scalar as an integer. Uncoercible values read as
    /// `None`.
    pub fn get_i64(&self) -> Option<i64> {
        coerce::to_integer::<i64>(self.scalar()?).ok()
    }

    /// Leniently reads the scalar as a float.
    pub fn get_f64(&self) -> Option<f64> {
        coerce::to_f64(self.scalar()?).ok()
    }

    /// Leniently reads the scalar as a boolean.
    pub fn get_bool(&self) -> Option<bool> {
        coerce::to_bool(self.scalar()?).ok()
    }

    /// Keys of the attached children, in container order.
    pub fn child_keys(&self) -> Vec<Key> {
        match self.position {
            Position::Attached(id) => self.tree.children(id).into_iter().map(|(k, _)| k).collect(),
            Position::Virtual { .. } => Vec::new(),
        }
    }

    /// Snapshot of the attached children keyed by name or index.
    ///
    /// The returned collection does not follow later structural changes.
    pub fn children_map(&self) -> IndexMap<Key, Node<'t>> {
        match self.position {
            Position::Attached(id) => self
                .tree
                .children(id)
                .into_iter()
                .map(|(key, child)| (key, Node::new(self.tree, Position::Attached(child))))
                .collect(),
            Position::Virtual { .. } => IndexMap::new(),
        }
    }

    /// Snapshot of the list children. Empty unless this node is a list.
    pub fn children_list(&self) -> Vec<Node<'t>> {
        match (self.position.clone(), self.storage()) {
            (Position::Attached(_), Some(Storage::List(items))) => items
                .iter()
                .map(|child| Node::new(self.tree, Position::Attached(*child)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn comment(&self) -> Option<&'t str> {
        self.data().and_then(|data| data.meta.comment.as_deref())
    }

    /// A single out-of-band hint.
    pub fn hint(&self, name: &str) -> Option<&'t Value> {
        self.data().and_then(|data| data.meta.hints.get(name))
    }

    /// All out-of-band hints of this node.
    pub fn hints(&self) -> &'t BTreeMap<String, Value> {
        self.data().map_or(&NO_HINTS, |data| &data.meta.hints)
    }

    /// Deep copy of this subtree as the root of a new, independent tree.
    pub fn copy(&self) -> ConfigTree {
        match self.position {
            Position::Attached(id) => self.tree.extract(id),
            Position::Virtual { .. } => ConfigTree::with_options(self.options().clone()),
        }
    }

    /// Reads this node as a `T` using the tree's serializer registry.
    pub fn get_as<T: ConfigType>(&self) -> Result<T, MappingError> {
        if self.is_null() {
            if let Some(absent) = T::absent() {
                return Ok(absent);
            }
        }
        let token = T::type_token().canonical();
        let serializer = self
            .options()
            .serializers()
            .resolve(&token)
            .ok_or_else(|| MappingError::unresolved(self.path(), &token))?;
        let value = serializer.deserialize(&token, self)?;
        T::from_dyn(value).ok_or_else(|| MappingError::mismatch(self.path(), &token))
    }

    /// Reads this node as a `T`, returning `default` when it holds no value.
    pub fn get_as_or<T: ConfigType>(&self, default: T) -> Result<T, MappingError> {
        if self.is_null() {
            Ok(default)
        } else {
            self.get_as()
        }
    }
}

/// A handle with exclusive access to the tree, used for mutation.
///
/// Hints and comments set on a virtual handle are held by the handle and
/// applied to the node when it attaches.
pub struct NodeMut<'t> {
    pub(crate) tree: &'t mut ConfigTree,
    pub(crate) position: Position,
    pending: NodeMeta,
}

impl fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMut")
            .field("path", &self.path())
            .field("virtual", &self.is_virtual())
            .finish()
    }
}

impl<'t> NodeMut<'t> {
    pub(crate) fn new(tree: &'t mut ConfigTree, position: Position) -> Self {
        NodeMut {
            tree,
            position,
            pending: NodeMeta::default(),
        }
    }

    /// Read-only view of this handle.
    pub fn as_node(&self) -> Node<'_> {
        Node::new(self.tree, self.position.resolve(self.tree))
    }

    /// Picks up an attachment made through a descendant handle, moving any
    /// pending metadata onto the node.
    fn refresh(&mut self) {
        if matches!(self.position, Position::Attached(_)) {
            return;
        }
        self.position = self.position.resolve(self.tree);
        if let Position::Attached(id) = self.position {
            if let Some(data) = self.tree.data_mut(id) {
                data.meta.absorb(std::mem::take(&mut self.pending));
            }
        }
    }

    pub fn options(&self) -> &ConfigOptions {
        self.tree.options()
    }

    pub fn id(&self) -> Option<NodeId> {
        self.as_node().id()
    }

    pub fn key(&self) -> Option<Key> {
        self.as_node().key()
    }

    pub fn path(&self) -> NodePath {
        self.as_node().path()
    }

    pub fn is_virtual(&self) -> bool {
        self.as_node().is_virtual()
    }

    pub fn is_null(&self) -> bool {
        self.as_node().is_null()
    }

    pub fn is_map(&self) -> bool {
        self.as_node().is_map()
    }

    pub fn is_list(&self) -> bool {
        self.as_node().is_list()
    }

    pub fn get_value(&self) -> Value {
        self.as_node().get_value()
    }

    pub fn get_i64(&self) -> Option<i64> {
        self.as_node().get_i64()
    }

    pub fn get_string(&self) -> Option<String> {
        self.as_node().get_string()
    }

    pub fn child_keys(&self) -> Vec<Key> {
        self.as_node().child_keys()
    }

    pub fn comment(&self) -> Option<&str> {
        self.pending
            .comment
            .as_deref()
            .or_else(|| self.as_node().comment())
    }

    pub fn hint(&self, name: &str) -> Option<&Value> {
        self.pending
            .hints
            .get(name)
            .or_else(|| self.as_node().hint(name))
    }

    /// Traverses to a descendant, reborrowing this handle.
    pub fn get_node(&mut self, path: impl Into<NodePath>) -> NodeMut<'_> {
        self.refresh();
        let position = self.position.descend(self.tree, path.into());
        NodeMut::new(self.tree, position)
    }

    /// Traverses to a descendant, consuming this handle.
    pub fn into_node(mut self, path: impl Into<NodePath>) -> NodeMut<'t> {
        self.refresh();
        let position = self.position.descend(self.tree, path.into());
        NodeMut::new(self.tree, position)
    }

    /// A virtual handle positioned at the next list index of this node.
    ///
    /// Nothing changes until a value is set through the returned handle. A
    /// scalar node then becomes a list with its old value at index 0.
    pub fn append_list_node(&mut self) -> NodeMut<'_> {
        self.refresh();
        let index = match self.as_node().storage() {
            Some(Storage::List(items)) => items.len(),
            Some(Storage::Scalar(_)) => 1,
            _ => 0,
        };
        self.get_node(Key::Index(index))
    }

    /// Attaches this node and its virtual ancestors if needed.
    pub(crate) fn ensure_attached(&mut self) -> NodeId {
        let (anchor, keys) = match &self.position {
            Position::Attached(id) => return *id,
            Position::Virtual { anchor, keys } => (*anchor, keys.clone()),
        };
        let mut current = anchor;
        for key in keys {
            current = match self.tree.child(current, &key) {
                Some(child) => child,
                None => self.tree.attach_child(current, key),
            };
        }
        if let Some(data) = self.tree.data_mut(current) {
            data.meta.absorb(std::mem::take(&mut self.pending));
        }
        self.position = Position::Attached(current);
        current
    }

    fn check_accepted(&self, value: &Value) -> Result<(), NodeError> {
        let options = self.tree.options();
        match value.find_rejected(&|kind| options.accepts(kind)) {
            Some(kind) => Err(NodeError::UnsupportedValue {
                path: self.path(),
                kind,
            }),
            None => Ok(()),
        }
    }

    /// Sets this node's value.
    ///
    /// [`Value::Null`] detaches the node and its subtree (the root is cleared
    /// instead). Lists and maps replace the children, reusing existing
    /// children whose key is kept. Any other value attaches this node first.
    ///
    /// Fails without modifying anything if a scalar kind in `value` is not
    /// accepted by the tree's options.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), NodeError> {
        let value = value.into();
        if value.is_null() {
            self.detach();
            return Ok(());
        }
        self.check_accepted(&value)?;
        let id = self.ensure_attached();
        self.tree.assign(id, value);
        Ok(())
    }

    /// Replaces this node's content with a deep copy of `source`, which may
    /// belong to any tree. Metadata is copied along. An empty source detaches
    /// this node.
    pub fn set_node(&mut self, source: &Node<'_>) -> Result<(), NodeError> {
        let Some(source_id) = source.id().filter(|_| !source.is_null()) else {
            self.detach();
            return Ok(());
        };
        self.check_accepted(&source.get_value())?;
        let id = self.ensure_attached();
        self.tree.graft(id, source.tree(), source_id);
        Ok(())
    }

    /// Copies the parts of `source` this node lacks. Present values win, and
    /// maps are merged key by key.
    pub fn merge_values_from(&mut self, source: &Node<'_>) -> Result<(), NodeError> {
        let Some(source_id) = source.id() else {
            return Ok(());
        };
        if source.is_null() {
            return Ok(());
        }
        self.check_accepted(&source.get_value())?;
        let id = self.ensure_attached();
        self.tree.merge(id, source.tree(), source_id);
        Ok(())
    }

    /// Detaches this node. Equivalent to setting [`Value::Null`].
    pub fn clear(&mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        self.refresh();
        let Position::Attached(id) = self.position else {
            return;
        };
        if id == self.tree.root_id() {
            self.tree.assign(id, Value::Null);
            return;
        }
        if let Some((parent, key)) = self.tree.detach(id) {
            self.position = Position::Virtual {
                anchor: parent,
                keys: vec![key],
            };
        }
    }

    /// Removes a direct child. Returns whether one was attached.
    pub fn remove_child(&mut self, key: impl Into<Key>) -> bool {
        self.refresh();
        let Position::Attached(id) = self.position else {
            return false;
        };
        match self.tree.child(id, &key.into()) {
            Some(child) => self.tree.detach(child).is_some(),
            None => false,
        }
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        self.refresh();
        let NodeMut {
            tree,
            position,
            pending,
        } = self;
        match position {
            Position::Attached(id) => tree
                .data_mut(*id)
                .map(|data| &mut data.meta)
                .unwrap_or(pending),
            Position::Virtual { .. } => pending,
        }
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.meta_mut().comment = Some(comment.into());
    }

    pub fn remove_comment(&mut self) -> Option<String> {
        self.meta_mut().comment.take()
    }

    /// Stores an out-of-band hint on this node.
    pub fn set_hint(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.meta_mut().hints.insert(name.into(), value.into());
    }

    pub fn remove_hint(&mut self, name: &str) -> Option<Value> {
        self.meta_mut().hints.remove(name)
    }

    /// Reads this node as a `T`.
    pub fn get_as<T: ConfigType>(&self) -> Result<T, MappingError> {
        self.as_node().get_as()
    }

    /// Reads this node as a `T`, falling back to `default` when it holds no
    /// value. With [`copy_defaults`](ConfigOptions::copy_defaults) on, the
    /// default is also written into the node.
    pub fn get_as_or<T: ConfigType + Clone>(&mut self, default: T) -> Result<T, MappingError> {
        if !self.is_null() {
            return self.get_as();
        }
        if self.options().copy_defaults() {
            self.set_as(default.clone())?;
        }
        Ok(default)
    }

    /// Writes `value` into this node using the tree's serializer registry.
    pub fn set_as<T: ConfigType>(&mut self, value: T) -> Result<(), MappingError> {
        let token = T::type_token();
        self.set_dyn(&token, value.into_dyn())
    }

    /// Writes an erased value of type `token`.
    pub fn set_dyn(
        &mut self,
        token: &TypeToken,
        value: Option<crate::serialize::DynValue>,
    ) -> Result<(), MappingError> {
        let token = token.canonical();
        let serializer = self
            .options()
            .serializers()
            .resolve(&token)
            .ok_or_else(|| MappingError::unresolved(self.path(), &token))?;
        serializer.serialize(&token, value, self)
    }
}
