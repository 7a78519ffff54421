//! Priority-ordered lookup of serializers by requested type.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use regex::Regex;
use url::Url;
use uuid::Uuid;

use super::{
    AnyEnum, BoolSerializer, CharSerializer, EnumSerializer, ListSerializer, MapSerializer,
    NumberSerializer, PatternSerializer, ScalarAdapter, ScalarSerializer, StringSerializer,
    TypeFamily, TypeSerializer, TypeToken, UrlSerializer, UuidSerializer, ValueSerializer,
};
use crate::node::Value;

/// Decides whether a registry entry applies to a requested type.
#[derive(Clone)]
pub enum TypeMatcher {
    /// Matches one type exactly.
    Exact(TypeToken),
    /// Matches any type the predicate accepts.
    Predicate(Arc<dyn Fn(&TypeToken) -> bool + Send + Sync>),
}

impl TypeMatcher {
    pub fn exact<T: ?Sized + 'static>() -> Self {
        TypeMatcher::Exact(TypeToken::of::<T>())
    }

    pub fn predicate(test: impl Fn(&TypeToken) -> bool + Send + Sync + 'static) -> Self {
        TypeMatcher::Predicate(Arc::new(test))
    }

    pub fn matches(&self, ty: &TypeToken) -> bool {
        match self {
            TypeMatcher::Exact(token) => token == ty,
            TypeMatcher::Predicate(test) => test(ty),
        }
    }
}

impl fmt::Debug for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMatcher::Exact(token) => f.debug_tuple("Exact").field(token).finish(),
            TypeMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

struct Entry {
    matcher: TypeMatcher,
    serializer: Arc<dyn TypeSerializer>,
}

static DEFAULTS: LazyLock<Arc<SerializerRegistry>> =
    LazyLock::new(|| Arc::new(SerializerRegistry::with_defaults()));

/// Maps requested types to serializers.
///
/// Entries are consulted in registration order and the first match wins.
/// For a requested type the registry tries, in order:
///
/// 1. exact entries for the canonical type,
/// 2. predicate entries for it,
/// 3. the same two steps for each declared supertype, breadth first,
/// 4. the parent registry, if any.
///
/// Results are cached per canonical type. Registering an entry clears the
/// cache. Lookups from several threads may compute the same entry twice; the
/// results are identical so the last write wins.
///
/// ```
/// # use configtree::serialize::{SerializerRegistry, StringSerializer, TypeToken};
/// let defaults = SerializerRegistry::defaults();
/// assert!(defaults.resolve(&TypeToken::of::<u16>()).is_some());
///
/// struct Port(u16);
/// let mut registry = SerializerRegistry::child(defaults);
/// assert!(registry.resolve(&TypeToken::of::<Port>()).is_none());
/// registry.register_scalar::<Port>(StringSerializer);
/// assert!(registry.resolve(&TypeToken::of::<Port>()).is_some());
/// ```
pub struct SerializerRegistry {
    parent: Option<Arc<SerializerRegistry>>,
    entries: Vec<Entry>,
    cache: RwLock<HashMap<TypeToken, Arc<dyn TypeSerializer>>>,
}

impl SerializerRegistry {
    /// An empty registry with no parent.
    pub fn new() -> Self {
        SerializerRegistry {
            parent: None,
            entries: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// An empty registry that falls back to `parent`.
    pub fn child(parent: Arc<SerializerRegistry>) -> Self {
        SerializerRegistry {
            parent: Some(parent),
            ..Self::new()
        }
    }

    /// The shared registry holding the stock serializers.
    pub fn defaults() -> Arc<SerializerRegistry> {
        Arc::clone(&DEFAULTS)
    }

    /// A fresh registry populated with the stock serializers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register_scalar::<String>(StringSerializer)
            .register_scalar::<bool>(BoolSerializer)
            .register_scalar::<char>(CharSerializer)
            .register_predicate(NumberSerializer::handles, ScalarAdapter(NumberSerializer))
            .register_scalar::<Uuid>(UuidSerializer)
            .register_scalar::<Url>(UrlSerializer)
            .register_scalar::<Regex>(PatternSerializer)
            .register_exact::<Value>(ValueSerializer)
            .register_exact::<AnyEnum>(EnumSerializer)
            .register_predicate(
                |ty| matches!(ty.family(), TypeFamily::List | TypeFamily::Set),
                ListSerializer,
            )
            .register_predicate(|ty| ty.family() == TypeFamily::Map, MapSerializer);
        registry
    }

    pub fn parent(&self) -> Option<&Arc<SerializerRegistry>> {
        self.parent.as_ref()
    }

    /// Appends an entry at the lowest priority.
    pub fn register(
        &mut self,
        matcher: TypeMatcher,
        serializer: impl TypeSerializer + 'static,
    ) -> &mut Self {
        self.entries.push(Entry {
            matcher,
            serializer: Arc::new(serializer),
        });
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self
    }

    pub fn register_exact<T: ?Sized + 'static>(
        &mut self,
        serializer: impl TypeSerializer + 'static,
    ) -> &mut Self {
        self.register(TypeMatcher::exact::<T>(), serializer)
    }

    pub fn register_predicate(
        &mut self,
        test: impl Fn(&TypeToken) -> bool + Send + Sync + 'static,
        serializer: impl TypeSerializer + 'static,
    ) -> &mut Self {
        self.register(TypeMatcher::predicate(test), serializer)
    }

    /// Registers a [`ScalarSerializer`] for exactly `T`.
    pub fn register_scalar<T: ?Sized + 'static>(
        &mut self,
        serializer: impl ScalarSerializer + 'static,
    ) -> &mut Self {
        self.register_exact::<T>(ScalarAdapter(serializer))
    }

    /// Number of entries registered directly on this registry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the serializer for `ty`, or `None` if nothing matches.
    pub fn resolve(&self, ty: &TypeToken) -> Option<Arc<dyn TypeSerializer>> {
        let canonical = ty.canonical();
        if let Some(found) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&canonical)
        {
            return Some(Arc::clone(found));
        }

        tracing::trace!(type_name = canonical.name(), "resolving serializer");
        let found = self
            .resolve_local(&canonical)
            .or_else(|| self.parent.as_ref()?.resolve(&canonical))?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(canonical, Arc::clone(&found));
        Some(found)
    }

    fn resolve_local(&self, ty: &TypeToken) -> Option<Arc<dyn TypeSerializer>> {
        let mut queue = VecDeque::from([ty.clone()]);
        let mut seen = HashSet::new();
        while let Some(candidate) = queue.pop_front() {
            if !seen.insert(candidate.clone()) {
                continue;
            }
            if let Some(found) = self.find_entry(&candidate) {
                return Some(found);
            }
            queue.extend(candidate.supertypes().iter().map(TypeToken::canonical));
        }
        None
    }

    fn find_entry(&self, ty: &TypeToken) -> Option<Arc<dyn TypeSerializer>> {
        let exact = self.entries.iter().find(|entry| match &entry.matcher {
            TypeMatcher::Exact(token) => token == ty,
            TypeMatcher::Predicate(_) => false,
        });
        exact
            .or_else(|| {
                self.entries.iter().find(|entry| match &entry.matcher {
                    TypeMatcher::Exact(_) => false,
                    TypeMatcher::Predicate(test) => test(ty),
                })
            })
            .map(|entry| Arc::clone(&entry.serializer))
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("entries", &self.entries.len())
            .field(
                "matchers",
                &self.entries.iter().map(|e| &e.matcher).collect::<Vec<_>>(),
            )
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
