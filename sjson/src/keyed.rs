use core::marker::PhantomData;

use chrono::{DateTime, Utc};
use sjson_path::{AnyKey, CodingKey, CodingPath, PathSegment, parse_index};
use sjson_value::{Object, Value};

use crate::decode::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::session::Session;
use crate::unkeyed::UnkeyedContainer;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Entries<'a> {
    Object(&'a Object),
    /// An array read by stringified index
    Array(&'a [Value]),
}

impl<'a> Entries<'a> {
    fn get(self, name: &str) -> Option<&'a Value> {
        match self {
            Entries::Object(obj) => obj.get(name),
            Entries::Array(items) => parse_index(name).and_then(|i| items.get(i)),
        }
    }

    fn len(self) -> usize {
        match self {
            Entries::Object(obj) => obj.len(),
            Entries::Array(items) => items.len(),
        }
    }
}

/// A view of an object as fields looked up by key.
///
/// `K` is the key type the caller describes its fields with; it defaults to
/// [`AnyKey`], which accepts any name. Error paths follow one rule: a missing
/// key is reported at this container's path with the key alongside, every
/// other failure at this container's path extended by the key.
#[derive(Debug, Clone)]
pub struct KeyedContainer<'a, K = AnyKey> {
    entries: Entries<'a>,
    path: CodingPath,
    session: Session<'a>,
    _key: PhantomData<fn() -> K>,
}

impl<'a, K: CodingKey> KeyedContainer<'a, K> {
    pub(crate) const fn new(entries: Entries<'a>, path: CodingPath, session: Session<'a>) -> Self {
        Self {
            entries,
            path,
            session,
            _key: PhantomData,
        }
    }

    /// Path of the object itself.
    pub const fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Every key present that `K` can represent, in source order.
    pub fn keys(&self) -> Vec<K> {
        match self.entries {
            Entries::Object(obj) => obj.keys().filter_map(|name| K::from_name(name)).collect(),
            Entries::Array(items) => (0..items.len()).filter_map(K::from_index).collect(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is present (even if its value is `null`).
    pub fn contains(&self, key: impl Into<K>) -> bool {
        self.entries.get(&key.into().name()).is_some()
    }

    /// Whether the value under `key` is `null`.
    pub fn decode_nil(&self, key: impl Into<K>) -> Result<bool, DecodeError> {
        let key = key.into();
        Ok(self.lookup(&key)?.is_null())
    }

    /// Decode the value under `key`.
    pub fn decode<T: Decode>(&self, key: impl Into<K>) -> Result<T, DecodeError> {
        self.decoder(key)?.decode()
    }

    /// Decode the value under `key`, treating a missing key or `null` as
    /// `None`.
    pub fn decode_optional<T: Decode>(&self, key: impl Into<K>) -> Result<Option<T>, DecodeError> {
        let key = key.into();
        match self.entries.get(&key.name()) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                T::decode(Decoder::new(value, self.child_path(&key), self.session)).map(Some)
            }
        }
    }

    /// Decode the value under `key` with the session's date strategy.
    pub fn decode_date(&self, key: impl Into<K>) -> Result<DateTime<Utc>, DecodeError> {
        self.decoder(key)?.single_value_container().decode_date()
    }

    /// A decoder for the value under `key`.
    pub fn decoder(&self, key: impl Into<K>) -> Result<Decoder<'a>, DecodeError> {
        let key = key.into();
        let value = self.lookup(&key)?;
        Ok(Decoder::new(value, self.child_path(&key), self.session))
    }

    /// The value under `key`, viewed as keyed by `NK`.
    pub fn nested_keyed<NK: CodingKey>(
        &self,
        key: impl Into<K>,
    ) -> Result<KeyedContainer<'a, NK>, DecodeError> {
        self.decoder(key)?.keyed_container()
    }

    /// The value under `key`, viewed as a sequence.
    pub fn nested_unkeyed(&self, key: impl Into<K>) -> Result<UnkeyedContainer<'a>, DecodeError> {
        self.decoder(key)?.unkeyed_container()
    }

    /// Always fails: there is no parent value to decode.
    pub fn super_decoder(&self) -> Result<Decoder<'a>, DecodeError> {
        Err(super_key_not_found(&self.path))
    }

    /// Always fails: there is no parent value to decode.
    pub fn super_decoder_for_key(&self, _key: impl Into<K>) -> Result<Decoder<'a>, DecodeError> {
        Err(super_key_not_found(&self.path))
    }

    fn lookup(&self, key: &K) -> Result<&'a Value, DecodeError> {
        self.entries
            .get(&key.name())
            .ok_or_else(|| DecodeError::key_not_found(&self.path, key.to_segment()))
    }

    fn child_path(&self, key: &K) -> CodingPath {
        self.path.push(key.to_segment())
    }
}

pub(crate) fn super_key_not_found(path: &CodingPath) -> DecodeError {
    DecodeError::key_not_found(path, PathSegment::field("super"))
}
