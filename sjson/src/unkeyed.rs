use chrono::{DateTime, Utc};
use sjson_path::{CodingKey, CodingPath, PathSegment};
use sjson_value::Value;

use crate::decode::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::keyed::{KeyedContainer, super_key_not_found};
use crate::session::Session;

/// A view of an array as a sequence read front to back.
///
/// The cursor moves forward by one on every successful read. A failed read
/// leaves it in place, so the error (and any retry) refers to the same
/// element. Reading past the end fails with
/// [`ValueNotFound`](crate::DecodeErrorKind::ValueNotFound) at the
/// out-of-range index.
#[derive(Debug, Clone)]
pub struct UnkeyedContainer<'a> {
    items: &'a [Value],
    path: CodingPath,
    session: Session<'a>,
    index: usize,
}

impl<'a> UnkeyedContainer<'a> {
    pub(crate) const fn new(items: &'a [Value], path: CodingPath, session: Session<'a>) -> Self {
        Self {
            items,
            path,
            session,
            index: 0,
        }
    }

    /// Path of the array itself.
    pub const fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Total number of elements.
    pub const fn count(&self) -> usize {
        self.items.len()
    }

    /// Index of the next element to be read.
    pub const fn current_index(&self) -> usize {
        self.index
    }

    /// Number of elements not read yet.
    pub const fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.index)
    }

    /// Whether every element has been read.
    pub const fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    /// Whether the next element is `null`. Moves past it only if it is.
    pub fn decode_nil(&mut self) -> Result<bool, DecodeError> {
        let is_null = self.peek("value")?.value().is_null();
        if is_null {
            self.index += 1;
        }
        Ok(is_null)
    }

    /// Decode the next element.
    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let decoded = self.peek(T::type_name())?.decode()?;
        self.index += 1;
        Ok(decoded)
    }

    /// Decode the next element, `null` becoming `None`.
    pub fn decode_optional<T: Decode>(&mut self) -> Result<Option<T>, DecodeError> {
        self.decode::<Option<T>>()
    }

    /// Decode the next element with the session's date strategy.
    pub fn decode_date(&mut self) -> Result<DateTime<Utc>, DecodeError> {
        let date = self.peek("date")?.single_value_container().decode_date()?;
        self.index += 1;
        Ok(date)
    }

    /// View the next element as keyed by `K`.
    pub fn nested_keyed<K: CodingKey>(&mut self) -> Result<KeyedContainer<'a, K>, DecodeError> {
        let container = self.peek("object")?.keyed_container()?;
        self.index += 1;
        Ok(container)
    }

    /// View the next element as a sequence.
    pub fn nested_unkeyed(&mut self) -> Result<UnkeyedContainer<'a>, DecodeError> {
        let container = self.peek("array")?.unkeyed_container()?;
        self.index += 1;
        Ok(container)
    }

    /// Always fails: there is no parent value to decode.
    pub fn super_decoder(&mut self) -> Result<Decoder<'a>, DecodeError> {
        Err(super_key_not_found(&self.path))
    }

    /// A decoder for the element under the cursor.
    fn peek(&self, expected: &'static str) -> Result<Decoder<'a>, DecodeError> {
        let path = self.path.push(PathSegment::Index(self.index));
        match self.items.get(self.index) {
            Some(value) => Ok(Decoder::new(value, path, self.session)),
            None => Err(DecodeError::value_not_found(&path, expected)),
        }
    }
}
