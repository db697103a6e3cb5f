//! Error types for parsing and decoding.

use core::fmt::{self, Display};

use sjson_path::{CodingPath, PathSegment, format_segments};
use sjson_value::{Value, ValueKind};

/// A syntax error raised by the parser.
///
/// Syntax errors are found before any structure exists, so they carry a
/// character offset instead of a coding path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Character (not byte) offset at which the parser gave up
    pub offset: usize,
}

impl ParseError {
    /// Create a new parse error.
    pub const fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl core::error::Error for ParseError {}

/// Specific kinds of syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The character is not allowed where it appeared
    UnexpectedChar(char),
    /// An object repeats a key it already holds
    DuplicateKey(String),
    /// A backslash was followed by something other than a JSON escape
    InvalidEscape(char),
    /// A `\u` escape contained a non-hex character
    InvalidUnicodeEscape(char),
    /// A UTF-16 surrogate escape without its other half
    UnpairedSurrogate,
    /// The input ended inside a value
    UnexpectedEnd,
    /// The input held no value at all
    Empty,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            ParseErrorKind::DuplicateKey(key) => write!(f, "duplicate key `{key}`"),
            ParseErrorKind::InvalidEscape(c) => write!(f, "invalid escape `\\{c}`"),
            ParseErrorKind::InvalidUnicodeEscape(c) => {
                write!(f, "invalid character {c:?} in unicode escape")
            }
            ParseErrorKind::UnpairedSurrogate => write!(f, "unpaired surrogate in unicode escape"),
            ParseErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            ParseErrorKind::Empty => write!(f, "no value found"),
        }
    }
}

/// Error produced while decoding a typed value.
///
/// Every error carries the coding path at which it happened. For
/// [`DecodeErrorKind::KeyNotFound`] the path is that of the object which
/// lacks the key; for every other kind it includes the offending key or
/// index as its last segment.
#[derive(Debug)]
pub struct DecodeError {
    /// The specific kind of error
    pub kind: DecodeErrorKind,
    /// Path through the source value where the error occurred
    pub path: Vec<PathSegment>,
    /// The root value being decoded, attached by the entry points when the
    /// `diagnostics` feature is enabled
    pub source_value: Option<Value>,
}

impl DecodeError {
    /// Create a new error at `path`.
    pub fn new(kind: DecodeErrorKind, path: &CodingPath) -> Self {
        Self {
            kind,
            path: path.segments(),
            source_value: None,
        }
    }

    /// The data could not be interpreted: malformed syntax, unparsable
    /// numeric or date text, or bytes that are not text.
    pub fn data_corrupted(path: &CodingPath, message: impl Into<String>) -> Self {
        Self::new(
            DecodeErrorKind::DataCorrupted {
                message: message.into(),
            },
            path,
        )
    }

    /// The stored value has a different kind than requested.
    pub fn type_mismatch(path: &CodingPath, expected: &'static str, got: ValueKind) -> Self {
        Self::new(DecodeErrorKind::TypeMismatch { expected, got }, path)
    }

    /// `key` is absent from the object at `path`.
    pub fn key_not_found(path: &CodingPath, key: PathSegment) -> Self {
        Self::new(DecodeErrorKind::KeyNotFound { key }, path)
    }

    /// A value was required at `path` but there was `null` or nothing.
    pub fn value_not_found(path: &CodingPath, expected: &'static str) -> Self {
        Self::new(DecodeErrorKind::ValueNotFound { expected }, path)
    }

    /// Attach the root value for diagnostics.
    pub fn with_value(mut self, value: Value) -> Self {
        self.source_value = Some(value);
        self
    }

    /// The key or index this error is about: the missing key for
    /// [`DecodeErrorKind::KeyNotFound`], otherwise the last path segment.
    pub fn key(&self) -> Option<&PathSegment> {
        match &self.kind {
            DecodeErrorKind::KeyNotFound { key } => Some(key),
            _ => self.path.last(),
        }
    }

    /// The path as a [`CodingPath`].
    pub fn coding_path(&self) -> CodingPath {
        self.path.iter().cloned().collect()
    }

    /// Format the path as a string, `<root>` when empty.
    pub fn path_string(&self) -> String {
        format_segments(&self.path)
    }

    /// Convert this error into a report that renders the source value.
    #[cfg(feature = "diagnostics")]
    pub fn into_report(self) -> crate::report::DecodeErrorReport {
        crate::report::DecodeErrorReport::new(self)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path_string(), self.kind)
        }
    }
}

impl core::error::Error for DecodeError {}

impl From<ParseError> for DecodeError {
    fn from(err: ParseError) -> Self {
        DecodeError::data_corrupted(
            &CodingPath::root(),
            format!("the given data was not valid JSON: {err}"),
        )
    }
}

/// The four ways a decode can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Malformed syntax, unparsable numeric/date text, or non-text input
    DataCorrupted {
        /// Human-readable description
        message: String,
    },
    /// The stored value's kind disagrees with the requested kind
    TypeMismatch {
        /// What the target type expected
        expected: &'static str,
        /// What the value actually was
        got: ValueKind,
    },
    /// A required object field is absent
    KeyNotFound {
        /// The missing key
        key: PathSegment,
    },
    /// A field is null, or a sequence ran out, where a value was required
    ValueNotFound {
        /// What the target type expected
        expected: &'static str,
    },
}

impl Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::DataCorrupted { message } => write!(f, "data corrupted: {message}"),
            DecodeErrorKind::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            DecodeErrorKind::KeyNotFound { key } => write!(f, "key `{}` not found", key.name()),
            DecodeErrorKind::ValueNotFound { expected } => {
                write!(f, "value not found: expected {expected}")
            }
        }
    }
}

impl DecodeErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            DecodeErrorKind::DataCorrupted { .. } => "sjson::data_corrupted",
            DecodeErrorKind::TypeMismatch { .. } => "sjson::type_mismatch",
            DecodeErrorKind::KeyNotFound { .. } => "sjson::key_not_found",
            DecodeErrorKind::ValueNotFound { .. } => "sjson::value_not_found",
        }
    }

    /// Get a label describing what the error points to.
    pub fn label(&self) -> String {
        match self {
            DecodeErrorKind::DataCorrupted { .. } => "this value can't be interpreted".into(),
            DecodeErrorKind::TypeMismatch { expected, got } => {
                format!("expected {expected}, got {got}")
            }
            DecodeErrorKind::KeyNotFound { key } => format!("missing key `{}`", key.name()),
            DecodeErrorKind::ValueNotFound { expected } => format!("expected {expected} here"),
        }
    }
}

/// Result type for decoding
pub type Result<T, E = DecodeError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_at_root_has_no_prefix() {
        sjson_testhelpers::setup();

        let err = DecodeError::value_not_found(&CodingPath::root(), "bool");
        assert_eq!(err.to_string(), "value not found: expected bool");
        assert_eq!(err.key(), None);
    }

    #[test]
    fn key_not_found_reports_the_key() {
        sjson_testhelpers::setup();

        let path = CodingPath::root().push(PathSegment::field("user"));
        let err = DecodeError::key_not_found(&path, PathSegment::field("email"));
        assert_eq!(err.to_string(), "at .user: key `email` not found");
        assert_eq!(err.key(), Some(&PathSegment::field("email")));
        assert_eq!(err.coding_path(), path);
        assert_eq!(err.kind.code(), "sjson::key_not_found");
    }

    #[test]
    fn parse_errors_become_data_corrupted() {
        sjson_testhelpers::setup();

        let err: DecodeError = ParseError::new(ParseErrorKind::UnexpectedChar('x'), 3).into();
        assert!(err.path.is_empty());
        assert_eq!(
            err.to_string(),
            "data corrupted: the given data was not valid JSON: unexpected character 'x' at offset 3"
        );
    }
}
