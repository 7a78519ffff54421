//! Enums mapped by constant name.

use super::{
    DynValue, MappingError, TypeSerializer, TypeToken,
    scalar::{read_scalar, write_scalar},
};
use crate::node::{Node, NodeMut, Scalar};

/// An enum whose variants are stored by name.
///
/// Usually implemented through [`config_enum!`](crate::config_enum).
pub trait ConfigEnum: Sized + 'static {
    /// Constant names in declaration order.
    const CONSTANTS: &'static [&'static str];

    fn from_constant(name: &str) -> Option<Self>;

    fn constant(&self) -> &'static str;
}

/// The erased form of any enum value: its constant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumConstant(pub &'static str);

/// Resolves enum constants by name.
///
/// An exact match wins. Otherwise exactly one case-insensitive match is
/// required; none or several is an invalid-constant error listing the legal
/// names.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumSerializer;

impl EnumSerializer {
    /// Looks `name` up among `constants`.
    pub fn lookup(constants: &'static [&'static str], name: &str) -> Option<&'static str> {
        if let Some(exact) = constants.iter().find(|c| **c == name) {
            return Some(*exact);
        }
        let mut matches = constants.iter().filter(|c| c.eq_ignore_ascii_case(name));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(*only),
            _ => None,
        }
    }
}

impl TypeSerializer for EnumSerializer {
    fn deserialize(&self, ty: &TypeToken, node: &Node<'_>) -> Result<DynValue, MappingError> {
        let name = read_scalar(ty, node)?.to_string();
        match Self::lookup(ty.constants(), name.trim()) {
            Some(constant) => Ok(Box::new(EnumConstant(constant))),
            None => Err(MappingError::InvalidEnumConstant {
                path: node.path(),
                type_name: ty.name().to_string(),
                value: name,
                expected: ty.constants().iter().map(|c| c.to_string()).collect(),
            }),
        }
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
        let name = value
            .downcast_ref::<EnumConstant>()
            .map(|EnumConstant(name)| Scalar::Text(name.to_string()));
        write_scalar(ty, None, || name, node)
    }
}

/// Recovers an enum from its erased constant.
#[doc(hidden)]
pub fn enum_from_dyn<E: ConfigEnum>(value: DynValue) -> Option<E> {
    let EnumConstant(name) = *value.downcast::<EnumConstant>().ok()?;
    E::from_constant(name)
}

/// Declares an enum stored by variant name.
///
/// ```
/// use configtree::{ConfigTree, config_enum};
///
/// config_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Mode { Fast, Safe }
/// }
///
/// let mut tree = ConfigTree::new();
/// tree.node_mut("mode").set_value("safe")?;
/// assert_eq!(tree.node("mode").get_as::<Mode>()?, Mode::Safe);
///
/// tree.node_mut("mode").set_as(Mode::Fast)?;
/// assert_eq!(tree.node("mode").get_string().as_deref(), Some("Fast"));
/// # Ok::<(), configtree::Error>(())
/// ```
#[macro_export]
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$vmeta])* $variant),*
        }

        impl $crate::serialize::ConfigEnum for $name {
            const CONSTANTS: &'static [&'static str] = &[$(stringify!($variant)),*];

            fn from_constant(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some($name::$variant),)*
                    _ => None,
                }
            }

            fn constant(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }
        }

        impl $crate::serialize::ConfigType for $name {
            fn type_token() -> $crate::serialize::TypeToken {
                $crate::serialize::TypeToken::enumeration::<$name>()
            }

            fn from_dyn(value: $crate::serialize::DynValue) -> Option<Self> {
                $crate::serialize::enum_from_dyn::<$name>(value)
            }

            fn into_dyn(self) -> Option<$crate::serialize::DynValue> {
                let name = $crate::serialize::ConfigEnum::constant(&self);
                Some(Box::new($crate::serialize::EnumConstant(name)))
            }
        }
    };
}
