//!
//! configtree: a format-agnostic configuration tree.
//! This library provides the in-memory document model that configuration
//! formats read into and write out of, typed access to its values, and
//! structural migrations between document versions.
//!
//! ## Core Concepts
//!
//! * **Trees (`node::ConfigTree`)**: An arena owning every node of one document. Nodes are
//!   addressed by path and read or written through short-lived handles.
//! * **Nodes (`node::Node`, `node::NodeMut`)**: A position in the tree holding nothing, a scalar,
//!   a list of children or a map of children. Handles may point at positions that do not exist
//!   yet ("virtual" nodes); writing a value attaches them and their missing ancestors.
//! * **Options (`ConfigOptions`)**: Settings shared by a tree: which serializers to use, which
//!   scalar kinds may be stored natively and whether read defaults are written back.
//! * **Serializers (`serialize::SerializerRegistry`)**: Convert between nodes and Rust values,
//!   resolved by requested type with exact, predicate and supertype matching.
//! * **Transformations (`transform`)**: Rewrite a tree by wildcard path, typically to migrate an
//!   older document layout. Versioned transformations apply only the steps a document is missing.
//! * **Formats (`format::ConfigFormat`)**: The boundary to textual codecs. A JSON codec is included.
//!
//! ```rust
//! use configtree::{ConfigTree, path};
//!
//! let mut tree = ConfigTree::new();
//! tree.node_mut(path!["server", "port"]).set_value(8080)?;
//!
//! let port: u16 = tree.node(path!["server", "port"]).get_as()?;
//! assert_eq!(port, 8080);
//! assert!(tree.node(path!["server", "host"]).is_virtual());
//! # Ok::<(), configtree::Error>(())
//! ```

pub mod format;
pub mod node;
pub mod options;
pub mod serialize;
pub mod transform;

/// Re-export the tree and its handles for easier access.
pub use node::{ConfigTree, Key, Node, NodeMut, NodePath, Value};
pub use options::{ConfigOptions, MapOrdering};

/// Result type used throughout the configtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the configtree library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from the node data model
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured errors from typed value mapping
    #[error(transparent)]
    Mapping(serialize::MappingError),

    /// Structured errors from format codecs
    #[error(transparent)]
    Format(format::FormatError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Node(_) => "node",
            Error::Mapping(_) => "serialize",
            Error::Format(_) => "format",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serde",
        }
    }

    /// Check if this error indicates that a requested value was absent.
    pub fn is_no_value(&self) -> bool {
        match self {
            Error::Mapping(mapping_err) => mapping_err.is_no_value(),
            _ => false,
        }
    }

    /// Check if this error is a failed conversion of a stored value.
    pub fn is_coercion_error(&self) -> bool {
        match self {
            Error::Mapping(mapping_err) => {
                mapping_err.is_coercion_failure() || mapping_err.is_invalid_enum()
            }
            _ => false,
        }
    }

    /// Check if this error indicates a value the tree's options refuse.
    pub fn is_unsupported_value(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_unsupported_value(),
            Error::Mapping(serialize::MappingError::Node(node_err)) => {
                node_err.is_unsupported_value()
            }
            Error::Format(format_err) => format_err.is_unrepresentable(),
            _ => false,
        }
    }

    /// Check if this error indicates programmer misuse.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error came from parsing or emitting a document.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_) | Error::Serialize(_))
    }
}
