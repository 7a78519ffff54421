//! Options shared by every node of a tree.

use std::{collections::BTreeSet, sync::Arc};

use crate::{node::ScalarKind, serialize::SerializerRegistry};

/// How map children are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapOrdering {
    /// Keep keys in the order they were written.
    #[default]
    Insertion,
    /// Keep keys sorted, indices before names.
    Sorted,
}

/// Configuration consumed by nodes and serializers.
///
/// Options are immutable; the `with_*` methods return a modified copy.
///
/// ```
/// # use configtree::{ConfigOptions, node::ScalarKind};
/// let options = ConfigOptions::default()
///     .with_accepted_types([ScalarKind::Text, ScalarKind::Int])
///     .with_copy_defaults(true);
/// assert!(options.accepts(ScalarKind::Int));
/// assert!(!options.accepts(ScalarKind::Float));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    serializers: Arc<SerializerRegistry>,
    accepted_types: Option<Arc<BTreeSet<ScalarKind>>>,
    copy_defaults: bool,
    map_ordering: MapOrdering,
    header: Option<String>,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        ConfigOptions {
            serializers: SerializerRegistry::defaults(),
            accepted_types: None,
            copy_defaults: false,
            map_ordering: MapOrdering::default(),
            header: None,
        }
    }
}

impl ConfigOptions {
    /// The registry used for typed access.
    pub fn serializers(&self) -> &Arc<SerializerRegistry> {
        &self.serializers
    }

    pub fn with_serializers(mut self, serializers: Arc<SerializerRegistry>) -> Self {
        self.serializers = serializers;
        self
    }

    /// Whether scalars of `kind` may be stored as they are. Every kind is
    /// accepted unless a whitelist was configured.
    pub fn accepts(&self, kind: ScalarKind) -> bool {
        self.accepted_types
            .as_ref()
            .is_none_or(|accepted| accepted.contains(&kind))
    }

    /// The configured whitelist, if any.
    pub fn accepted_types(&self) -> Option<&BTreeSet<ScalarKind>> {
        self.accepted_types.as_deref()
    }

    /// Restricts stored scalars to the given kinds.
    pub fn with_accepted_types(mut self, kinds: impl IntoIterator<Item = ScalarKind>) -> Self {
        self.accepted_types = Some(Arc::new(kinds.into_iter().collect()));
        self
    }

    /// Lifts any whitelist.
    pub fn with_all_types_accepted(mut self) -> Self {
        self.accepted_types = None;
        self
    }

    /// Whether defaults handed to a typed read are written into empty nodes.
    pub fn copy_defaults(&self) -> bool {
        self.copy_defaults
    }

    pub fn with_copy_defaults(mut self, copy_defaults: bool) -> Self {
        self.copy_defaults = copy_defaults;
        self
    }

    pub fn map_ordering(&self) -> MapOrdering {
        self.map_ordering
    }

    pub fn with_map_ordering(mut self, ordering: MapOrdering) -> Self {
        self.map_ordering = ordering;
        self
    }

    /// Free text a format codec may emit at the top of a document.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}
