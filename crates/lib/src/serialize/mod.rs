//! Typed mapping between nodes and Rust values.
//!
//! A [`TypeSerializer`] converts between a node and a value of some type.
//! Serializers are found through a [`SerializerRegistry`], which resolves a
//! [`TypeToken`] by exact match, then by predicate, then by walking declared
//! supertypes.
//!
//! Serializers work on type-erased values ([`DynValue`]). The [`ConfigType`]
//! trait links a Rust type to its token and erased form, and backs the typed
//! accessors [`Node::get_as`](crate::node::Node::get_as) and
//! [`NodeMut::set_as`](crate::node::NodeMut::set_as).
//!
//! ```rust
//! use configtree::{ConfigTree, path};
//!
//! let mut tree = ConfigTree::new();
//! tree.node_mut("ports").set_as(vec![80u16, 443])?;
//! assert_eq!(tree.node(path!["ports", 1]).get_i64(), Some(443));
//!
//! tree.node_mut("timeout").set_value("0x1E")?;
//! assert_eq!(tree.node("timeout").get_as::<u32>()?, 30);
//! assert_eq!(tree.node("missing").get_as::<Option<u32>>()?, None);
//! # Ok::<(), configtree::Error>(())
//! ```

mod bridge;
mod collection;
pub mod coerce;
mod enums;
mod errors;
mod registry;
mod scalar;
mod token;

use std::{
    any::Any,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::Hash,
};

use indexmap::{IndexMap, IndexSet};

pub use bridge::SerdeSerializer;
pub use collection::{ListSerializer, MapSerializer, ValueSerializer};
pub use enums::{ConfigEnum, EnumConstant, EnumSerializer, enum_from_dyn};
pub use errors::{CoercionError, MappingError};
pub use registry::{SerializerRegistry, TypeMatcher};
pub use scalar::{
    BoolSerializer, CharSerializer, NumberSerializer, PatternSerializer, ScalarAdapter,
    ScalarSerializer, StringSerializer, UrlSerializer, UuidSerializer,
};
pub use token::{AnyEnum, TypeFamily, TypeToken};

use crate::node::{Node, NodeMut, Value};

/// A type-erased value passed between serializers.
pub type DynValue = Box<dyn Any + Send + Sync>;

/// Erased contents of a list or set.
pub struct DynList(pub Vec<DynValue>);

/// Erased entries of a map, in order.
pub struct DynMap(pub Vec<(DynValue, DynValue)>);

/// Converts between nodes and values of the types it is registered for.
pub trait TypeSerializer: Send + Sync {
    /// Reads a value of type `ty` from `node`.
    fn deserialize(&self, ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError>;

    /// Writes `value` into `node`. `None` clears the node.
    fn serialize(
        &self,
        ty: &TypeToken,
        value: Option<DynValue>,
        node: &mut NodeMut<'_>,
    ) -> Result<(), MappingError>;
}

/// A Rust type with a serializer-facing description.
pub trait ConfigType: Sized + 'static {
    fn type_token() -> TypeToken;

    /// Recovers a value from its erased form.
    fn from_dyn(value: DynValue) -> Option<Self>;

    /// Erases a value. `None` stands for absence.
    fn into_dyn(self) -> Option<DynValue>;

    /// The value an empty node reads as, if the type has one.
    fn absent() -> Option<Self> {
        None
    }
}

fn downcast<T: 'static>(value: DynValue) -> Option<T> {
    value.downcast::<T>().ok().map(|boxed| *boxed)
}

macro_rules! plain_config_type {
    ($($ty:ty),* $(,)?) => {
        $(impl ConfigType for $ty {
            fn type_token() -> TypeToken {
                TypeToken::of::<$ty>()
            }

            fn from_dyn(value: DynValue) -> Option<Self> {
                downcast(value)
            }

            fn into_dyn(self) -> Option<DynValue> {
                Some(Box::new(self))
            }
        })*
    };
}

plain_config_type!(
    String,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    uuid::Uuid,
    url::Url,
    regex::Regex,
    Value,
);

impl<T: ConfigType> ConfigType for Option<T> {
    fn type_token() -> TypeToken {
        TypeToken::wrapper::<Option<T>>(T::type_token())
    }

    fn from_dyn(value: DynValue) -> Option<Self> {
        T::from_dyn(value).map(Some)
    }

    fn into_dyn(self) -> Option<DynValue> {
        self.and_then(T::into_dyn)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: ConfigType> ConfigType for Box<T> {
    fn type_token() -> TypeToken {
        TypeToken::wrapper::<Box<T>>(T::type_token())
    }

    fn from_dyn(value: DynValue) -> Option<Self> {
        T::from_dyn(value).map(Box::new)
    }

    fn into_dyn(self) -> Option<DynValue> {
        (*self).into_dyn()
    }

    fn absent() -> Option<Self> {
        T::absent().map(Box::new)
    }
}

fn list_from_dyn<T: ConfigType, C: FromIterator<T>>(value: DynValue) -> Option<C> {
    let DynList(items) = downcast(value)?;
    items.into_iter().map(T::from_dyn).collect()
}

fn list_into_dyn<T: ConfigType>(items: impl IntoIterator<Item = T>) -> Option<DynValue> {
    Some(Box::new(DynList(
        items.into_iter().filter_map(T::into_dyn).collect(),
    )))
}

macro_rules! list_config_type {
    ($family:ident, $coll:ident $(, $bound:path)*) => {
        impl<T: ConfigType $(+ $bound)*> ConfigType for $coll<T> {
            fn type_token() -> TypeToken {
                TypeToken::generic::<$coll<T>>(TypeFamily::$family, vec![T::type_token()])
            }

            fn from_dyn(value: DynValue) -> Option<Self> {
                list_from_dyn::<T, _>(value)
            }

            fn into_dyn(self) -> Option<DynValue> {
                list_into_dyn(self)
            }
        }
    };
}

list_config_type!(List, Vec);
list_config_type!(List, VecDeque);
list_config_type!(Set, HashSet, Eq, Hash);
list_config_type!(Set, BTreeSet, Ord);
list_config_type!(Set, IndexSet, Eq, Hash);

fn map_from_dyn<K: ConfigType, V: ConfigType, C: FromIterator<(K, V)>>(
    value: DynValue,
) -> Option<C> {
    let DynMap(entries) = downcast(value)?;
    entries
        .into_iter()
        .map(|(k, v)| Some((K::from_dyn(k)?, V::from_dyn(v)?)))
        .collect()
}

fn map_into_dyn<K: ConfigType, V: ConfigType>(
    entries: impl IntoIterator<Item = (K, V)>,
) -> Option<DynValue> {
    Some(Box::new(DynMap(
        entries
            .into_iter()
            .filter_map(|(k, v)| Some((k.into_dyn()?, v.into_dyn()?)))
            .collect(),
    )))
}

macro_rules! map_config_type {
    ($coll:ident $(, $bound:path)*) => {
        impl<K: ConfigType $(+ $bound)*, V: ConfigType> ConfigType for $coll<K, V> {
            fn type_token() -> TypeToken {
                TypeToken::generic::<$coll<K, V>>(
                    TypeFamily::Map,
                    vec![K::type_token(), V::type_token()],
                )
            }

            fn from_dyn(value: DynValue) -> Option<Self> {
                map_from_dyn::<K, V, _>(value)
            }

            fn into_dyn(self) -> Option<DynValue> {
                map_into_dyn(self)
            }
        }
    };
}

map_config_type!(HashMap, Eq, Hash);
map_config_type!(BTreeMap, Ord);
map_config_type!(IndexMap, Eq, Hash);
