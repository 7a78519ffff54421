//! Transformations gated on a document's recorded version.

use std::{
    collections::BTreeMap,
    ops::Bound::{Excluded, Unbounded},
};

use tracing::info;

use super::ConfigTransformation;
use crate::{
    Error,
    node::{NodeError, NodeMut, NodePath},
};

/// Version recorded for documents that carry none.
pub const UNVERSIONED: i64 = -1;

/// Builds a [`VersionedTransformation`].
pub struct VersionedBuilder<E = Error> {
    version_path: NodePath,
    versions: BTreeMap<i64, Box<dyn ConfigTransformation<E>>>,
}

impl<E> VersionedBuilder<E> {
    /// Starts a builder reading the version from the `version` key.
    pub fn new() -> Self {
        VersionedBuilder {
            version_path: NodePath::from("version"),
            versions: BTreeMap::new(),
        }
    }

    /// Sets where the version number is stored.
    ///
    /// Fails if `path` is empty: the root cannot hold both the document and
    /// its version.
    pub fn version_key(mut self, path: impl Into<NodePath>) -> Result<Self, NodeError> {
        let path = path.into();
        if path.is_empty() {
            return Err(NodeError::InvalidArgument {
                reason: "version path must not be empty".to_string(),
            });
        }
        self.version_path = path;
        Ok(self)
    }

    /// Registers the step that brings a document up to `version`, replacing
    /// any step already registered for it.
    pub fn add_version(
        mut self,
        version: i64,
        transformation: impl ConfigTransformation<E> + 'static,
    ) -> Self {
        self.versions.insert(version, Box::new(transformation));
        self
    }

    pub fn build(self) -> VersionedTransformation<E> {
        VersionedTransformation {
            version_path: self.version_path,
            versions: self.versions,
        }
    }
}

impl<E> Default for VersionedBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies, in ascending order, every registered step newer than the version
/// stored in the document, then records the last version reached.
///
/// A document without a readable version counts as [`UNVERSIONED`]. Applying
/// again once the document is current runs no step.
pub struct VersionedTransformation<E = Error> {
    version_path: NodePath,
    versions: BTreeMap<i64, Box<dyn ConfigTransformation<E>>>,
}

impl<E> VersionedTransformation<E> {
    pub fn version_path(&self) -> &NodePath {
        &self.version_path
    }

    /// The newest registered version, if any.
    pub fn latest_version(&self) -> Option<i64> {
        self.versions.keys().next_back().copied()
    }

    /// The version recorded at this transformation's version path.
    pub fn current_version(&self, node: &NodeMut<'_>) -> i64 {
        node.as_node()
            .get_node(self.version_path.clone())
            .get_i64()
            .unwrap_or(UNVERSIONED)
    }
}

impl<E: From<NodeError>> ConfigTransformation<E> for VersionedTransformation<E> {
    fn apply(&self, node: &mut NodeMut<'_>) -> Result<(), E> {
        let mut current = self.current_version(node);
        for (&version, transformation) in self.versions.range((Excluded(current), Unbounded)) {
            info!(from = current, to = version, "updating configuration version");
            transformation.apply(node)?;
            current = version;
        }
        node.get_node(self.version_path.clone()).set_value(current)?;
        Ok(())
    }
}
