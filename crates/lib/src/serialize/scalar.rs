//! Serializers for single scalar values.

use regex::Regex;
use url::Url;
use uuid::Uuid;

use super::{CoercionError, DynValue, MappingError, TypeSerializer, TypeToken, coerce};
use crate::node::{Node, NodeMut, Scalar};

/// Conversion logic for one scalar type, wrapped into a [`TypeSerializer`]
/// by [`ScalarAdapter`].
///
/// The adapter handles node shape: a single-element list is unwrapped, a
/// container is rejected, and an empty node reports that no value is present.
pub trait ScalarSerializer: Send + Sync {
    /// Converts a stored scalar into a value of type `ty`.
    fn deserialize_scalar(&self, ty: &TypeToken, scalar: &Scalar)
    -> Result<DynValue, CoercionError>;

    /// Native form of `value`, stored as-is when the options accept its kind.
    fn native(&self, _ty: &TypeToken, _value: &DynValue) -> Option<Scalar> {
        None
    }

    /// Representation used when the native form is unavailable or refused.
    /// `None` if `value` is not of the expected type.
    fn serialize_scalar(&self, ty: &TypeToken, value: &DynValue) -> Option<Scalar>;
}

/// Lifts a [`ScalarSerializer`] into a [`TypeSerializer`].
#[derive(Debug, Clone, Default)]
pub struct ScalarAdapter<S>(pub S);

/// Finds the scalar held by `node`, looking through a single-element list.
pub(crate) fn read_scalar<'t>(ty: &TypeToken, node: &Node<'t>) -> Result<&'t Scalar, MappingError> {
    let target = match node.children_list().as_slice() {
        [only] => only.clone(),
        _ => node.clone(),
    };
    if let Some(scalar) = target.scalar() {
        return Ok(scalar);
    }
    let found = if target.is_map() {
        "map"
    } else if target.is_list() {
        "list"
    } else {
        return Err(MappingError::no_value(node.path(), ty));
    };
    Err(MappingError::coercion(
        node.path(),
        ty,
        CoercionError::WrongShape { found },
    ))
}

/// Stores `native` when the options accept its kind, else the fallback.
pub(crate) fn write_scalar(
    ty: &TypeToken,
    native: Option<Scalar>,
    fallback: impl FnOnce() -> Option<Scalar>,
    node: &mut NodeMut<'_>,
) -> Result<(), MappingError> {
    let scalar = match native {
        Some(scalar) if node.options().accepts(scalar.kind()) => scalar,
        _ => fallback().ok_or_else(|| MappingError::mismatch(node.path(), ty))?,
    };
    node.set_value(scalar)?;
    Ok(())
}

impl<S: ScalarSerializer> TypeSerializer for ScalarAdapter<S> {
    fn deserialize(&self, ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError> {
        let scalar = read_scalar(ty, node)?;
        self.0
            .deserialize_scalar(ty, scalar)
            .map_err(|reason| MappingError::coercion(node.path(), ty, reason))
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
        let native = self.0.native(ty, &value);
        write_scalar(ty, native, || self.0.serialize_scalar(ty, &value), node)
    }
}

/// Reads any scalar as its text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl ScalarSerializer for StringSerializer {
    fn deserialize_scalar(&self, _ty: &TypeToken, scalar: &Scalar) -> Result<DynValue, CoercionError> {
        Ok(Box::new(scalar.to_string()))
    }

    fn native(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value.downcast_ref::<String>().cloned().map(Scalar::Text)
    }

    fn serialize_scalar(&self, ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        self.native(ty, value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolSerializer;

impl ScalarSerializer for BoolSerializer {
    fn deserialize_scalar(&self, _ty: &TypeToken, scalar: &Scalar) -> Result<DynValue, CoercionError> {
        Ok(Box::new(coerce::to_bool(scalar)?))
    }

    fn native(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value.downcast_ref::<bool>().copied().map(Scalar::Bool)
    }

    fn serialize_scalar(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value
            .downcast_ref::<bool>()
            .map(|b| Scalar::Text(b.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CharSerializer;

impl ScalarSerializer for CharSerializer {
    fn deserialize_scalar(&self, _ty: &TypeToken, scalar: &Scalar) -> Result<DynValue, CoercionError> {
        Ok(Box::new(coerce::to_char(scalar)?))
    }

    fn native(&self, ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        self.serialize_scalar(ty, value)
    }

    fn serialize_scalar(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value
            .downcast_ref::<char>()
            .map(|c| Scalar::Text(c.to_string()))
    }
}

/// Handles every primitive integer and float type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberSerializer;

macro_rules! numbers {
    (ints: [$($int:ty),*], floats: [$($float:ident => $conv:path),*]) => {
        impl NumberSerializer {
            /// Whether `ty` is a number type this serializer handles.
            pub fn handles(ty: &TypeToken) -> bool {
                $(ty.is::<$int>() ||)* $(ty.is::<$float>() ||)* false
            }
        }

        impl ScalarSerializer for NumberSerializer {
            fn deserialize_scalar(
                &self,
                ty: &TypeToken,
                scalar: &Scalar,
            ) -> Result<DynValue, CoercionError> {
                $(if ty.is::<$int>() {
                    return Ok(Box::new(coerce::to_integer::<$int>(scalar)?));
                })*
                $(if ty.is::<$float>() {
                    return Ok(Box::new($conv(scalar)?));
                })*
                Err(CoercionError::Unparseable {
                    value: scalar.to_string(),
                    target: "number",
                })
            }

            fn native(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
                $(if let Some(n) = value.downcast_ref::<$int>() {
                    return i64::try_from(*n).ok().map(Scalar::Int);
                })*
                $(if let Some(x) = value.downcast_ref::<$float>() {
                    return Some(Scalar::Float(f64::from(*x)));
                })*
                None
            }

            fn serialize_scalar(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
                $(if let Some(n) = value.downcast_ref::<$int>() {
                    return Some(Scalar::Text(n.to_string()));
                })*
                $(if let Some(x) = value.downcast_ref::<$float>() {
                    return Some(Scalar::Text(x.to_string()));
                })*
                None
            }
        }
    };
}

numbers!(
    ints: [i8, i16, i32, i64, isize, u8, u16, u32, u64, usize],
    floats: [f32 => coerce::to_f32, f64 => coerce::to_f64]
);

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSerializer;

impl ScalarSerializer for UuidSerializer {
    fn deserialize_scalar(&self, _ty: &TypeToken, scalar: &Scalar) -> Result<DynValue, CoercionError> {
        let text = scalar.to_string();
        Uuid::parse_str(text.trim())
            .map(|uuid| Box::new(uuid) as DynValue)
            .map_err(|_| CoercionError::Unparseable {
                value: text,
                target: "uuid",
            })
    }

    fn serialize_scalar(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value
            .downcast_ref::<Uuid>()
            .map(|uuid| Scalar::Text(uuid.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UrlSerializer;

impl ScalarSerializer for UrlSerializer {
    fn deserialize_scalar(&self, _ty: &TypeToken, scalar: &Scalar) -> Result<DynValue, CoercionError> {
        let text = scalar.to_string();
        Url::parse(text.trim())
            .map(|url| Box::new(url) as DynValue)
            .map_err(|_| CoercionError::Unparseable {
                value: text,
                target: "url",
            })
    }

    fn serialize_scalar(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value
            .downcast_ref::<Url>()
            .map(|url| Scalar::Text(url.to_string()))
    }
}

/// Compiles stored text into a [`Regex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternSerializer;

impl ScalarSerializer for PatternSerializer {
    fn deserialize_scalar(&self, _ty: &TypeToken, scalar: &Scalar) -> Result<DynValue, CoercionError> {
        let text = scalar.to_string();
        Regex::new(&text)
            .map(|pattern| Box::new(pattern) as DynValue)
            .map_err(|_| CoercionError::Unparseable {
                value: text,
                target: "pattern",
            })
    }

    fn serialize_scalar(&self, _ty: &TypeToken, value: &DynValue) -> Option<Scalar> {
        value
            .downcast_ref::<Regex>()
            .map(|pattern| Scalar::Text(pattern.as_str().to_string()))
    }
}
