#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod error;
pub use error::*;

mod parser;
pub use parser::parse;

mod number;
pub use number::Number;

mod decode;
pub use decode::Decode;

mod decoder;
pub use decoder::Decoder;

mod keyed;
pub use keyed::KeyedContainer;

mod unkeyed;
pub use unkeyed::UnkeyedContainer;

mod single_value;
pub use single_value::SingleValueContainer;

mod session;
pub use session::Session;

mod date;
pub use date::DateStrategy;

#[cfg(feature = "diagnostics")]
mod report;
#[cfg(feature = "diagnostics")]
pub use report::DecodeErrorReport;

pub use sjson_path::{AnyKey, CodingKey, CodingPath, PathSegment};
pub use sjson_value::{Object, Value, ValueKind};

use tracing::trace;

/// Decodes JSON documents into [`Decode`] types.
///
/// Holds the per-call configuration. Each `decode*` call parses the input,
/// opens a fresh [`Session`] borrowing this configuration and drives the
/// target type's [`Decode`] implementation from the root.
#[derive(Debug, Default)]
pub struct JsonDecoder {
    date_strategy: DateStrategy,
}

impl JsonDecoder {
    /// A decoder with the default configuration: dates are read as integer
    /// milliseconds since the Unix epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `date_strategy` for every date this decoder reads.
    pub fn with_date_strategy(mut self, date_strategy: DateStrategy) -> Self {
        self.date_strategy = date_strategy;
        self
    }

    /// The date strategy in effect.
    pub const fn date_strategy(&self) -> &DateStrategy {
        &self.date_strategy
    }

    /// Decode `T` from UTF-8 encoded JSON.
    pub fn decode<T: Decode>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        let text = core::str::from_utf8(bytes).map_err(|err| {
            DecodeError::data_corrupted(
                &CodingPath::root(),
                format!("the given data is not valid UTF-8: {err}"),
            )
        })?;
        self.decode_str(text)
    }

    /// Decode `T` from JSON text.
    pub fn decode_str<T: Decode>(&self, text: &str) -> Result<T, DecodeError> {
        let value = parse(text)?;
        self.decode_value(&value)
            .map_err(|err| attach_source(err, value))
    }

    /// Decode `T` from an already parsed value.
    pub fn decode_value<T: Decode>(&self, value: &Value) -> Result<T, DecodeError> {
        trace!("decoding {} with {:?}", T::type_name(), self.date_strategy);
        let session = Session::new(&self.date_strategy);
        T::decode(Decoder::new(value, CodingPath::root(), session))
    }
}

#[cfg(feature = "diagnostics")]
fn attach_source(err: DecodeError, value: Value) -> DecodeError {
    err.with_value(value)
}

#[cfg(not(feature = "diagnostics"))]
fn attach_source(err: DecodeError, _value: Value) -> DecodeError {
    err
}

/// Decode `T` from UTF-8 encoded JSON with the default configuration.
pub fn from_slice<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    JsonDecoder::new().decode(bytes)
}

/// Decode `T` from JSON text with the default configuration.
pub fn from_str<T: Decode>(text: &str) -> Result<T, DecodeError> {
    JsonDecoder::new().decode_str(text)
}

/// Decode `T` from a parsed [`Value`] with the default configuration.
pub fn from_value<T: Decode>(value: &Value) -> Result<T, DecodeError> {
    JsonDecoder::new().decode_value(value)
}
