//! Runtime descriptions of requested value types.

use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use super::ConfigEnum;

/// Structural family of a type, used by the collection serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Plain,
    List,
    Set,
    Map,
}

/// Supertype marker shared by every [`ConfigEnum`] type.
pub enum AnyEnum {}

#[derive(Debug, Clone)]
struct TokenInner {
    id: TypeId,
    name: String,
    family: TypeFamily,
    params: Vec<TypeToken>,
    supertypes: Vec<TypeToken>,
    constants: &'static [&'static str],
    wraps: Option<TypeToken>,
}

/// Describes a type for serializer resolution: identity, generic
/// parameters, declared supertypes and, for enums, the constant names.
///
/// Tokens compare and hash by type identity only.
///
/// ```
/// # use configtree::serialize::{ConfigType, TypeFamily, TypeToken};
/// let token = <Vec<Option<u8>>>::type_token();
/// assert_eq!(token.family(), TypeFamily::List);
/// assert_eq!(token.name(), "Vec<Option<u8>>");
/// assert_eq!(token.param(0).unwrap().canonical(), TypeToken::of::<u8>());
/// ```
#[derive(Clone)]
pub struct TypeToken(Arc<TokenInner>);

impl TypeToken {
    fn build<T: ?Sized + 'static>(family: TypeFamily, params: Vec<TypeToken>) -> Self {
        TypeToken(Arc::new(TokenInner {
            id: TypeId::of::<T>(),
            name: short_name(type_name::<T>()),
            family,
            params,
            supertypes: Vec::new(),
            constants: &[],
            wraps: None,
        }))
    }

    /// A plain, non-generic type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::build::<T>(TypeFamily::Plain, Vec::new())
    }

    /// A generic type with its parameters.
    pub fn generic<T: ?Sized + 'static>(family: TypeFamily, params: Vec<TypeToken>) -> Self {
        Self::build::<T>(family, params)
    }

    /// An enum type carrying its constant names.
    pub fn enumeration<E: ConfigEnum>() -> Self {
        let mut token = Self::of::<E>().with_supertype(Self::of::<AnyEnum>());
        Arc::make_mut(&mut token.0).constants = E::CONSTANTS;
        token
    }

    /// A transparent wrapper that resolves like `inner`, such as `Box<T>`.
    pub fn wrapper<W: ?Sized + 'static>(inner: TypeToken) -> Self {
        let mut token = Self::build::<W>(TypeFamily::Plain, vec![inner.clone()]);
        Arc::make_mut(&mut token.0).wraps = Some(inner);
        token
    }

    /// Declares an additional supertype consulted during resolution.
    pub fn with_supertype(mut self, supertype: TypeToken) -> Self {
        Arc::make_mut(&mut self.0).supertypes.push(supertype);
        self
    }

    pub fn id(&self) -> TypeId {
        self.0.id
    }

    /// Readable type name without module paths.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn family(&self) -> TypeFamily {
        self.0.family
    }

    pub fn params(&self) -> &[TypeToken] {
        &self.0.params
    }

    pub fn param(&self, index: usize) -> Option<&TypeToken> {
        self.0.params.get(index)
    }

    pub fn supertypes(&self) -> &[TypeToken] {
        &self.0.supertypes
    }

    /// Constant names of an enum type, empty otherwise.
    pub fn constants(&self) -> &'static [&'static str] {
        self.0.constants
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.0.id == TypeId::of::<T>()
    }

    /// Strips transparent wrappers, so `Box<u8>` and `u8` share one form.
    pub fn canonical(&self) -> TypeToken {
        let mut current = self;
        while let Some(inner) = &current.0.wraps {
            current = inner;
        }
        current.clone()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.0.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Drops module paths from every segment of a type name.
fn short_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}
