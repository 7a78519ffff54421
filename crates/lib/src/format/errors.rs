//! Error types for format codecs.

use thiserror::Error as ThisError;

use crate::{Error, node::NodePath};

/// Errors raised while turning text into a tree or back.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum FormatError {
    /// The input is not a valid document.
    #[error("Invalid {format} document at line {line}, column {column}: {reason}")]
    Parse {
        /// Name of the format
        format: &'static str,
        /// Line of the error, starting at 1
        line: usize,
        /// Column of the error, starting at 1
        column: usize,
        /// Parser message
        reason: String,
    },

    /// The tree holds a value the format cannot express.
    #[error("Cannot write {path} as {format}: {reason}")]
    Unrepresentable {
        /// Name of the format
        format: &'static str,
        /// Node holding the value
        path: NodePath,
        /// What could not be expressed
        reason: String,
    },
}

impl FormatError {
    /// Check if this error is a malformed input document.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, FormatError::Parse { .. })
    }

    /// Check if this error is a value the format cannot express.
    pub fn is_unrepresentable(&self) -> bool {
        matches!(self, FormatError::Unrepresentable { .. })
    }

    /// Name of the format that raised this error.
    pub fn format(&self) -> &'static str {
        match self {
            FormatError::Parse { format, .. } | FormatError::Unrepresentable { format, .. } => {
                format
            }
        }
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::Format(err)
    }
}
