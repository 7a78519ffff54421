//! Paths that may contain wildcard segments, and their ordering.

use std::{cmp::Ordering, fmt};

use crate::node::{Key, NodePath};

/// One step of a [`WildcardPath`].
///
/// Segments order indices before names before the wildcard, so concrete
/// segments always sort ahead of [`PathSegment::Wildcard`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Index(usize),
    Name(String),
    /// Stands for every child of the node reached so far.
    Wildcard,
}

/// The wildcard segment.
pub const WILDCARD: PathSegment = PathSegment::Wildcard;

impl PathSegment {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathSegment::Wildcard)
    }

    /// The concrete key, or `None` for the wildcard.
    pub fn as_key(&self) -> Option<Key> {
        match self {
            PathSegment::Index(index) => Some(Key::Index(*index)),
            PathSegment::Name(name) => Some(Key::Name(name.clone())),
            PathSegment::Wildcard => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{index}"),
            PathSegment::Name(name) => f.write_str(name),
            PathSegment::Wildcard => f.write_str("*"),
        }
    }
}

impl From<Key> for PathSegment {
    fn from(key: Key) -> Self {
        match key {
            Key::Index(index) => PathSegment::Index(index),
            Key::Name(name) => PathSegment::Name(name),
        }
    }
}

impl From<&Key> for PathSegment {
    fn from(key: &Key) -> Self {
        key.clone().into()
    }
}

/// `"*"` becomes the wildcard; anything else is a name.
impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        if name == "*" {
            PathSegment::Wildcard
        } else {
            PathSegment::Name(name.to_string())
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A path whose segments may be wildcards, used to address transformation
/// actions.
///
/// Paths are ordered segment by segment. When one path is a prefix of the
/// other, the longer path sorts first, so deeper nodes are transformed before
/// their ancestors.
///
/// ```
/// # use configtree::transform::{WildcardPath, WILDCARD};
/// let deep = WildcardPath::from(["servers", "*", "port"]);
/// let shallow = WildcardPath::from(["servers", "*"]);
/// let concrete = WildcardPath::from(["servers", "main"]);
/// assert!(deep < shallow);
/// assert!(concrete < shallow);
/// assert_eq!(shallow.segments()[1], WILDCARD);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct WildcardPath {
    segments: Vec<PathSegment>,
}

impl WildcardPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        WildcardPath { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(PathSegment::is_wildcard)
    }

    /// The equivalent concrete path, if there is no wildcard.
    pub fn to_node_path(&self) -> Option<NodePath> {
        self.segments.iter().map(PathSegment::as_key).collect()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> WildcardPath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        WildcardPath { segments }
    }

    /// Returns a new path with the segment at `index` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn with_segment(&self, index: usize, segment: impl Into<PathSegment>) -> WildcardPath {
        let mut segments = self.segments.clone();
        segments[index] = segment.into();
        WildcardPath { segments }
    }
}

impl Ord for WildcardPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .iter()
            .zip(&other.segments)
            .map(|(a, b)| a.cmp(b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| other.segments.len().cmp(&self.segments.len()))
    }
}

impl PartialOrd for WildcardPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WildcardPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for WildcardPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        WildcardPath::new(iter.into_iter().collect())
    }
}

impl From<Vec<PathSegment>> for WildcardPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        WildcardPath::new(segments)
    }
}

impl From<&NodePath> for WildcardPath {
    fn from(path: &NodePath) -> Self {
        path.iter().map(PathSegment::from).collect()
    }
}

impl From<NodePath> for WildcardPath {
    fn from(path: NodePath) -> Self {
        WildcardPath::from(&path)
    }
}

impl From<&str> for WildcardPath {
    fn from(segment: &str) -> Self {
        WildcardPath::new(vec![segment.into()])
    }
}

impl<const N: usize> From<[&str; N]> for WildcardPath {
    fn from(segments: [&str; N]) -> Self {
        segments.into_iter().map(PathSegment::from).collect()
    }
}

impl<const N: usize> From<[PathSegment; N]> for WildcardPath {
    fn from(segments: [PathSegment; N]) -> Self {
        WildcardPath::new(segments.into())
    }
}
