//! The [`Decode`] trait and its implementations for standard types.

use core::hash::BuildHasher;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use sjson_path::AnyKey;
use sjson_value::Value;

use crate::decoder::Decoder;
use crate::error::DecodeError;

/// A type that can be built from a [`Decoder`].
///
/// Implementations describe their own shape: a struct asks for a keyed
/// container and decodes its fields, a collection asks for an unkeyed one,
/// a scalar reads a single value.
pub trait Decode: Sized {
    /// Build `Self` from the decoder's value.
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError>;

    /// Name used in error messages when no value is found for this type.
    fn type_name() -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl Decode for bool {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.single_value_container().decode_bool()
    }

    fn type_name() -> &'static str {
        "bool"
    }
}

impl Decode for String {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.single_value_container().decode_string()
    }

    fn type_name() -> &'static str {
        "string"
    }
}

impl Decode for char {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        let container = decoder.single_value_container();
        let text = container.decode_str()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::data_corrupted(
                container.path(),
                format!("expected a single character, got {text:?}"),
            )),
        }
    }

    fn type_name() -> &'static str {
        "char"
    }
}

macro_rules! impl_decode_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
                    decoder.single_value_container().decode_number::<$ty>()
                }

                fn type_name() -> &'static str {
                    <$ty as crate::Number>::TYPE_NAME
                }
            }
        )*
    };
}

impl_decode_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Decode for Decimal {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.single_value_container().decode_decimal()
    }

    fn type_name() -> &'static str {
        "decimal"
    }
}

impl Decode for DateTime<Utc> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decoder.single_value_container().decode_date()
    }

    fn type_name() -> &'static str {
        "date"
    }
}

impl Decode for Value {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(decoder.value().clone())
    }

    fn type_name() -> &'static str {
        "value"
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.value().is_null() {
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }

    fn type_name() -> &'static str {
        T::type_name()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        T::decode(decoder).map(Box::new)
    }

    fn type_name() -> &'static str {
        T::type_name()
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        let mut items = decoder.unkeyed_container()?;
        let mut out = Vec::with_capacity(items.count());
        while !items.is_at_end() {
            out.push(items.decode()?);
        }
        Ok(out)
    }

    fn type_name() -> &'static str {
        "array"
    }
}

/// Shared body of the string-keyed map impls.
fn decode_entries<T, M>(decoder: Decoder<'_>) -> Result<M, DecodeError>
where
    T: Decode,
    M: FromIterator<(String, T)>,
{
    let fields = decoder.keyed_container::<AnyKey>()?;
    fields
        .keys()
        .into_iter()
        .map(|key| {
            let name = key.as_str().to_owned();
            fields.decode::<T>(key).map(|value| (name, value))
        })
        .collect()
}

impl<T: Decode> Decode for IndexMap<String, T> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decode_entries(decoder)
    }

    fn type_name() -> &'static str {
        "object"
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decode_entries(decoder)
    }

    fn type_name() -> &'static str {
        "object"
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        decode_entries(decoder)
    }

    fn type_name() -> &'static str {
        "object"
    }
}
