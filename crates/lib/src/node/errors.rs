//! Error types for structural node operations.

use thiserror::Error as ThisError;

use super::{NodePath, ScalarKind};
use crate::Error;

/// Errors raised by the node data model.
///
/// Absence is never an error: reading a virtual node quietly yields nothing.
/// Only writes the configured options refuse, and programmer misuse, fail.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum NodeError {
    /// A value contained a scalar kind the options do not accept.
    #[error("Unsupported value at {path}: {kind} values are not accepted by this tree")]
    UnsupportedValue {
        /// Path of the node being written
        path: NodePath,
        /// The rejected scalar kind
        kind: ScalarKind,
    },

    /// An argument could never be valid, such as an empty version path.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },
}

impl NodeError {
    /// Check if this error is a rejected value.
    pub fn is_unsupported_value(&self) -> bool {
        matches!(self, NodeError::UnsupportedValue { .. })
    }

    /// Check if this error reports programmer misuse.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, NodeError::InvalidArgument { .. })
    }

    /// Path of the node involved, if any.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            NodeError::UnsupportedValue { path, .. } => Some(path),
            NodeError::InvalidArgument { .. } => None,
        }
    }
}

impl From<NodeError> for Error {
    fn from(err: NodeError) -> Self {
        Error::Node(err)
    }
}
