#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Write};

mod key;
pub use key::{AnyKey, CodingKey, parse_index};

/// A single step in a [`CodingPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// A field name in an object (or a stringified index when a sequence is
    /// read through a keyed container)
    Field(String),
    /// A position in an array
    Index(usize),
}

impl PathSegment {
    /// Shorthand for [`PathSegment::Field`].
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// The textual name of this segment. Indices are rendered in decimal.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Field(name) => Cow::Borrowed(name),
            PathSegment::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The numeric index of this segment, if it has one.
    pub fn index(&self) -> Option<usize> {
        match self {
            PathSegment::Field(name) => parse_index(name),
            PathSegment::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Render a sequence of segments like `.users[0].name`, or `<root>` when empty.
pub fn format_segments(segments: &[PathSegment]) -> String {
    if segments.is_empty() {
        return "<root>".into();
    }
    let mut s = String::new();
    for seg in segments {
        let _ = write!(s, "{seg}");
    }
    s
}

struct Node {
    parent: CodingPath,
    segment: PathSegment,
    depth: usize,
}

/// An immutable trail of [`PathSegment`]s from the root of a value.
///
/// Paths are persistent: [`CodingPath::push`] returns a new path that shares
/// its prefix with the original, so handing a path down to every nested
/// container costs one allocation per nesting step and never mutates what the
/// caller holds.
#[derive(Clone, Default)]
pub struct CodingPath {
    tail: Option<Arc<Node>>,
}

impl CodingPath {
    /// The empty path, pointing at the root value.
    pub const fn root() -> Self {
        Self { tail: None }
    }

    /// Return a new path with `segment` appended.
    #[must_use]
    pub fn push(&self, segment: PathSegment) -> Self {
        let depth = self.len() + 1;
        Self {
            tail: Some(Arc::new(Node {
                parent: self.clone(),
                segment,
                depth,
            })),
        }
    }

    /// Number of segments, which is the nesting depth below the root.
    pub fn len(&self) -> usize {
        self.tail.as_ref().map_or(0, |node| node.depth)
    }

    /// Whether this path points at the root.
    pub fn is_empty(&self) -> bool {
        self.tail.is_none()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.tail.as_ref().map(|node| &node.segment)
    }

    /// The path without its last segment.
    pub fn parent(&self) -> Option<&CodingPath> {
        self.tail.as_ref().map(|node| &node.parent)
    }

    /// Collect the segments, root first.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self;
        while let Some(node) = &cursor.tail {
            out.push(node.segment.clone());
            cursor = &node.parent;
        }
        out.reverse();
        out
    }
}

impl PartialEq for CodingPath {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (mut a, mut b) = (self, other);
        loop {
            match (&a.tail, &b.tail) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if Arc::ptr_eq(x, y) {
                        return true;
                    }
                    if x.segment != y.segment {
                        return false;
                    }
                    a = &x.parent;
                    b = &y.parent;
                }
                _ => return false,
            }
        }
    }
}

impl Eq for CodingPath {}

impl fmt::Debug for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments()).finish()
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_segments(&self.segments()))
    }
}

impl From<&CodingPath> for Vec<PathSegment> {
    fn from(path: &CodingPath) -> Self {
        path.segments()
    }
}

impl FromIterator<PathSegment> for CodingPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CodingPath::root(), |path, seg| path.push(seg))
    }
}
