//! Error types for typed mapping between nodes and values.

use thiserror::Error as ThisError;

use super::TypeToken;
use crate::{
    Error,
    node::{NodeError, NodePath},
};

/// Why a scalar could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum CoercionError {
    /// The value lies outside the target's representable range.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// A floating value with a fraction was read as an integer.
    #[error("{value} has a fractional part not representable as {target}")]
    FractionalPart { value: String, target: &'static str },

    /// The value has no reading as the target type.
    #[error("'{value}' is not a valid {target}")]
    Unparseable { value: String, target: &'static str },

    /// A container was found where a scalar was expected.
    #[error("Value must be provided as a scalar, found a {found}")]
    WrongShape { found: &'static str },
}

/// Errors raised while reading or writing typed values.
///
/// Every variant names the node path and the requested type.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum MappingError {
    /// The node holds no value and the type has no absent form.
    #[error("No value present at {path} for {type_name}")]
    NoValue { path: NodePath, type_name: String },

    /// The node's scalar could not be coerced.
    #[error("Cannot read {type_name} at {path}: {reason}")]
    CoercionFailed {
        path: NodePath,
        type_name: String,
        #[source]
        reason: CoercionError,
    },

    /// No enum constant matched the stored name.
    #[error(
        "Invalid enum constant '{value}' for {type_name} at {path}, expected one of: {}",
        .expected.join(", ")
    )]
    InvalidEnumConstant {
        path: NodePath,
        type_name: String,
        value: String,
        expected: Vec<String>,
    },

    /// No serializer is registered for the type.
    #[error("No serializer registered for {type_name} (at {path})")]
    UnresolvedType { path: NodePath, type_name: String },

    /// A serializer returned a value of an unexpected type.
    #[error("Serializer for {type_name} at {path} produced a value of another type")]
    TypeMismatch { path: NodePath, type_name: String },

    /// A failure reported by a custom serializer.
    #[error("Cannot map {type_name} at {path}: {reason}")]
    Custom {
        path: NodePath,
        type_name: String,
        reason: String,
    },

    /// Writing the serialized form into the node failed.
    #[error(transparent)]
    Node(#[from] NodeError),
}

impl MappingError {
    pub fn no_value(path: NodePath, ty: &TypeToken) -> Self {
        MappingError::NoValue {
            path,
            type_name: ty.name().to_string(),
        }
    }

    pub fn coercion(path: NodePath, ty: &TypeToken, reason: CoercionError) -> Self {
        MappingError::CoercionFailed {
            path,
            type_name: ty.name().to_string(),
            reason,
        }
    }

    pub fn unresolved(path: NodePath, ty: &TypeToken) -> Self {
        MappingError::UnresolvedType {
            path,
            type_name: ty.name().to_string(),
        }
    }

    pub fn mismatch(path: NodePath, ty: &TypeToken) -> Self {
        MappingError::TypeMismatch {
            path,
            type_name: ty.name().to_string(),
        }
    }

    pub fn custom(path: NodePath, ty: &TypeToken, reason: impl Into<String>) -> Self {
        MappingError::Custom {
            path,
            type_name: ty.name().to_string(),
            reason: reason.into(),
        }
    }

    /// Path of the node involved, if known.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            MappingError::NoValue { path, .. }
            | MappingError::CoercionFailed { path, .. }
            | MappingError::InvalidEnumConstant { path, .. }
            | MappingError::UnresolvedType { path, .. }
            | MappingError::TypeMismatch { path, .. }
            | MappingError::Custom { path, .. } => Some(path),
            MappingError::Node(err) => err.path(),
        }
    }

    /// The coercion failure behind this error, if any.
    pub fn coercion_error(&self) -> Option<&CoercionError> {
        match self {
            MappingError::CoercionFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn is_no_value(&self) -> bool {
        matches!(self, MappingError::NoValue { .. })
    }

    pub fn is_coercion_failure(&self) -> bool {
        matches!(self, MappingError::CoercionFailed { .. })
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self.coercion_error(), Some(CoercionError::OutOfRange { .. }))
    }

    pub fn is_fractional(&self) -> bool {
        matches!(self.coercion_error(), Some(CoercionError::FractionalPart { .. }))
    }

    pub fn is_wrong_shape(&self) -> bool {
        matches!(self.coercion_error(), Some(CoercionError::WrongShape { .. }))
    }

    pub fn is_invalid_enum(&self) -> bool {
        matches!(self, MappingError::InvalidEnumConstant { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, MappingError::UnresolvedType { .. })
    }
}

impl From<MappingError> for Error {
    fn from(err: MappingError) -> Self {
        Error::Mapping(err)
    }
}
