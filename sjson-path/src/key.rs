//! Key descriptors.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;

use crate::PathSegment;

/// Parse `name` as an array index.
///
/// Only canonical decimal text is accepted: ASCII digits, no sign, and no
/// leading zeros (except for `"0"` itself). This is the same rendering that
/// `usize::to_string` produces, so an index survives a trip through its name.
pub fn parse_index(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    name.parse().ok()
}

/// A type that names the keys of a keyed container.
///
/// Every key has a textual name; keys that denote sequence positions also
/// expose a numeric index. Implementations must be constructible from either
/// form, since the decoder hands back keys it found in the data via
/// [`CodingKey::from_name`].
pub trait CodingKey: Sized {
    /// The textual name of the key, as it appears in a JSON object.
    fn name(&self) -> Cow<'_, str>;

    /// The numeric index of the key, if it denotes a sequence position.
    fn index(&self) -> Option<usize> {
        parse_index(&self.name())
    }

    /// Build a key from its textual name. Returns `None` for names this key
    /// type does not recognise.
    fn from_name(name: &str) -> Option<Self>;

    /// Build a key from a numeric index.
    fn from_index(index: usize) -> Option<Self> {
        Self::from_name(&index.to_string())
    }

    /// The path segment recorded when descending through this key.
    fn to_segment(&self) -> PathSegment {
        PathSegment::Field(self.name().into_owned())
    }
}

/// A key that accepts any name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnyKey {
    name: String,
}

impl AnyKey {
    /// Create a key with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl CodingKey for AnyKey {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(Self::new(name))
    }

    fn from_index(index: usize) -> Option<Self> {
        Some(Self::new(index.to_string()))
    }
}

impl CodingKey for String {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(name.into())
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for AnyKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AnyKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<usize> for AnyKey {
    fn from(index: usize) -> Self {
        Self::new(index.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_indices_only() {
        sjson_testhelpers::setup();

        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("042"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("1.0"), None);
    }

    #[test]
    fn any_key_round_trips_index() {
        sjson_testhelpers::setup();

        let key = AnyKey::from_index(7).unwrap();
        assert_eq!(key.name(), "7");
        assert_eq!(key.index(), Some(7));
        assert_eq!(AnyKey::from("name").index(), None);
    }

    #[derive(Debug, PartialEq)]
    enum Field {
        Id,
        Title,
    }

    impl CodingKey for Field {
        fn name(&self) -> Cow<'_, str> {
            match self {
                Field::Id => "id".into(),
                Field::Title => "title".into(),
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "id" => Some(Field::Id),
                "title" => Some(Field::Title),
                _ => None,
            }
        }
    }

    #[test]
    fn closed_key_set() {
        sjson_testhelpers::setup();

        assert_eq!(Field::from_name("title"), Some(Field::Title));
        assert_eq!(Field::from_name("body"), None);
        assert_eq!(Field::from_index(0), None);
        assert_eq!(Field::Id.to_segment(), PathSegment::field("id"));
    }
}
