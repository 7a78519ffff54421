//! Sequential composition of transformations.

use super::ConfigTransformation;
use crate::{Error, node::NodeMut};

/// Applies its transformations one after another, stopping at the first
/// error.
pub struct ChainedTransformation<E = Error> {
    transformations: Vec<Box<dyn ConfigTransformation<E>>>,
}

impl<E> ChainedTransformation<E> {
    pub fn new() -> Self {
        ChainedTransformation {
            transformations: Vec::new(),
        }
    }

    /// Appends `transformation` to the chain.
    pub fn then(mut self, transformation: impl ConfigTransformation<E> + 'static) -> Self {
        self.transformations.push(Box::new(transformation));
        self
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }
}

impl<E> Default for ChainedTransformation<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FromIterator<Box<dyn ConfigTransformation<E>>> for ChainedTransformation<E> {
    fn from_iter<I: IntoIterator<Item = Box<dyn ConfigTransformation<E>>>>(iter: I) -> Self {
        ChainedTransformation {
            transformations: iter.into_iter().collect(),
        }
    }
}

impl<E> ConfigTransformation<E> for ChainedTransformation<E> {
    fn apply(&self, node: &mut NodeMut<'_>) -> Result<(), E> {
        for transformation in &self.transformations {
            transformation.apply(node)?;
        }
        Ok(())
    }
}
