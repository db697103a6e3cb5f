use sjson_path::CodingKey;
use sjson_path::CodingPath;
use sjson_value::Value;
use tracing::trace;

use crate::decode::Decode;
use crate::error::DecodeError;
use crate::keyed::{Entries, KeyedContainer};
use crate::session::Session;
use crate::single_value::SingleValueContainer;
use crate::unkeyed::UnkeyedContainer;

/// One value at one path, ready to be viewed as whichever container the
/// target type needs.
///
/// [`Decode`] implementations receive a `Decoder` and pick the shape:
///
/// ```
/// use sjson::{Decode, DecodeError, Decoder};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Decode for Point {
///     fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
///         let fields = decoder.keyed_container::<sjson::AnyKey>()?;
///         Ok(Point {
///             x: fields.decode("x")?,
///             y: fields.decode("y")?,
///         })
///     }
/// }
///
/// let p: Point = sjson::from_str(r#"{"x": 1, "y": -2}"#).unwrap();
/// assert_eq!((p.x, p.y), (1, -2));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    value: &'a Value,
    path: CodingPath,
    session: Session<'a>,
}

impl<'a> Decoder<'a> {
    /// Wrap `value`, found at `path`.
    pub const fn new(value: &'a Value, path: CodingPath, session: Session<'a>) -> Self {
        Self {
            value,
            path,
            session,
        }
    }

    /// Where this value sits in the document.
    pub const fn path(&self) -> &CodingPath {
        &self.path
    }

    /// The value being decoded.
    pub const fn value(&self) -> &'a Value {
        self.value
    }

    /// The session this decoder belongs to.
    pub const fn session(&self) -> Session<'a> {
        self.session
    }

    /// View the value as fields looked up by key.
    ///
    /// Arrays are accepted too, keyed by their indices written in decimal
    /// (`"0"`, `"1"`, ...).
    pub fn keyed_container<K: CodingKey>(&self) -> Result<KeyedContainer<'a, K>, DecodeError> {
        trace!("keyed container at {}", self.path);
        let entries = match self.value {
            Value::Object(obj) => Entries::Object(obj),
            Value::Array(items) => Entries::Array(items),
            Value::Null => return Err(DecodeError::value_not_found(&self.path, "object")),
            other => return Err(DecodeError::type_mismatch(&self.path, "object", other.kind())),
        };
        Ok(KeyedContainer::new(entries, self.path.clone(), self.session))
    }

    /// View the value as a sequence read front to back.
    pub fn unkeyed_container(&self) -> Result<UnkeyedContainer<'a>, DecodeError> {
        trace!("unkeyed container at {}", self.path);
        match self.value {
            Value::Array(items) => Ok(UnkeyedContainer::new(
                items,
                self.path.clone(),
                self.session,
            )),
            Value::Null => Err(DecodeError::value_not_found(&self.path, "array")),
            other => Err(DecodeError::type_mismatch(&self.path, "array", other.kind())),
        }
    }

    /// View the value as a single leaf. Never fails.
    pub fn single_value_container(&self) -> SingleValueContainer<'a> {
        SingleValueContainer::new(self.value, self.path.clone(), self.session)
    }

    /// Shorthand for `T::decode(self)`.
    pub fn decode<T: Decode>(self) -> Result<T, DecodeError> {
        T::decode(self)
    }
}
