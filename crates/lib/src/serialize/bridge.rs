//! Serde-backed serializers for structured application types.
//!
//! Any `Serialize + DeserializeOwned` type can be mapped through the JSON
//! data model: the node subtree is converted to a `serde_json::Value` and
//! handed to serde, and back. Declare the type with
//! [`serde_config_type!`](crate::serde_config_type) and register a
//! [`SerdeSerializer`] for it in a child registry.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};

use super::{DynValue, MappingError, TypeSerializer, TypeToken};
use crate::node::{Node, NodeMut, Value};

/// Maps `T` with serde.
pub struct SerdeSerializer<T>(PhantomData<fn() -> T>);

impl<T> SerdeSerializer<T> {
    pub fn new() -> Self {
        SerdeSerializer(PhantomData)
    }
}

impl<T> Default for SerdeSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeSerializer for SerdeSerializer<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn deserialize(&self, ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError> {
        serde_json::from_value::<T>(node.get_value().to_json())
            .map(|value| Box::new(value) as DynValue)
            .map_err(|err| MappingError::custom(node.path(), ty, err.to_string()))
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
        let value = value
            .downcast_ref::<T>()
            .ok_or_else(|| MappingError::mismatch(node.path(), ty))?;
        let json = serde_json::to_value(value)
            .map_err(|err| MappingError::custom(node.path(), ty, err.to_string()))?;
        node.set_value(Value::from(json))?;
        Ok(())
    }
}

/// Implements [`ConfigType`](crate::serialize::ConfigType) for serde types.
#[macro_export]
macro_rules! serde_config_type {
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::serialize::ConfigType for $ty {
            fn type_token() -> $crate::serialize::TypeToken {
                $crate::serialize::TypeToken::of::<$ty>()
            }

            fn from_dyn(value: $crate::serialize::DynValue) -> Option<Self> {
                value.downcast::<$ty>().ok().map(|boxed| *boxed)
            }

            fn into_dyn(self) -> Option<$crate::serialize::DynValue> {
                Some(Box::new(self))
            }
        })+
    };
}
