use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sjson_path::CodingPath;
use sjson_value::{Value, ValueKind};

use crate::decode::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::number::Number;
use crate::session::Session;

/// A view of one value as a leaf.
///
/// Every typed read checks for `null` first (reported as
/// [`ValueNotFound`](crate::DecodeErrorKind::ValueNotFound)), then that the
/// value has the requested kind (else
/// [`TypeMismatch`](crate::DecodeErrorKind::TypeMismatch)). Number text that
/// does not fit the requested type is
/// [`DataCorrupted`](crate::DecodeErrorKind::DataCorrupted).
#[derive(Debug, Clone)]
pub struct SingleValueContainer<'a> {
    value: &'a Value,
    path: CodingPath,
    session: Session<'a>,
}

impl<'a> SingleValueContainer<'a> {
    pub(crate) const fn new(value: &'a Value, path: CodingPath, session: Session<'a>) -> Self {
        Self {
            value,
            path,
            session,
        }
    }

    /// Path of the wrapped value.
    pub const fn path(&self) -> &CodingPath {
        &self.path
    }

    /// The wrapped value.
    pub const fn value(&self) -> &'a Value {
        self.value
    }

    /// The session this container belongs to.
    pub const fn session(&self) -> Session<'a> {
        self.session
    }

    /// Whether the value is `null`.
    pub const fn decode_nil(&self) -> bool {
        self.value.is_null()
    }

    /// Read a boolean.
    pub fn decode_bool(&self) -> Result<bool, DecodeError> {
        match self.value {
            Value::Bool(b) => Ok(*b),
            other => Err(self.unexpected(other, "bool")),
        }
    }

    /// Borrow a string.
    pub fn decode_str(&self) -> Result<&'a str, DecodeError> {
        match self.value {
            Value::String(s) => Ok(s),
            other => Err(self.unexpected(other, "string")),
        }
    }

    /// Read an owned string.
    pub fn decode_string(&self) -> Result<String, DecodeError> {
        self.decode_str().map(String::from)
    }

    /// Read a number of type `N`.
    pub fn decode_number<N: Number>(&self) -> Result<N, DecodeError> {
        let raw = self.raw_number(N::TYPE_NAME)?;
        N::parse_raw(raw).ok_or_else(|| {
            DecodeError::data_corrupted(
                &self.path,
                format!("can't parse {} from `{raw}`", N::TYPE_NAME),
            )
        })
    }

    /// Read an exact decimal.
    ///
    /// Numbers with more significant digits than [`Decimal`] can hold are
    /// rejected rather than rounded.
    pub fn decode_decimal(&self) -> Result<Decimal, DecodeError> {
        let raw = self.raw_number("decimal")?;
        let parsed = if raw.contains(['e', 'E']) {
            Decimal::from_scientific(raw)
        } else {
            Decimal::from_str_exact(raw)
        };
        parsed.map_err(|err| {
            DecodeError::data_corrupted(
                &self.path,
                format!("can't parse decimal from `{raw}`: {err}"),
            )
        })
    }

    /// Read a timestamp with the session's date strategy.
    pub fn decode_date(&self) -> Result<DateTime<Utc>, DecodeError> {
        self.session.decode_date(self)
    }

    /// Decode the value as any [`Decode`] type.
    pub fn decode<T: Decode>(&self) -> Result<T, DecodeError> {
        T::decode(Decoder::new(self.value, self.path.clone(), self.session))
    }

    fn raw_number(&self, expected: &'static str) -> Result<&'a str, DecodeError> {
        match self.value {
            Value::Number(raw) => Ok(raw),
            other => Err(self.unexpected(other, expected)),
        }
    }

    fn unexpected(&self, value: &Value, expected: &'static str) -> DecodeError {
        match value.kind() {
            ValueKind::Null => DecodeError::value_not_found(&self.path, expected),
            got => DecodeError::type_mismatch(&self.path, expected, got),
        }
    }
}

#[cfg(test)]
mod tests {
    use sjson_path::PathSegment;

    use super::*;
    use crate::DateStrategy;
    use crate::error::DecodeErrorKind;

    fn with<R>(value: Value, f: impl FnOnce(&SingleValueContainer<'_>) -> R) -> R {
        let strategy = DateStrategy::default();
        let path = CodingPath::root().push(PathSegment::field("v"));
        let container = SingleValueContainer::new(&value, path, Session::new(&strategy));
        f(&container)
    }

    #[test]
    fn scalars() {
        sjson_testhelpers::setup();

        assert!(with(Value::Bool(true), |c| c.decode_bool().unwrap()));
        assert_eq!(with(Value::from("hi"), |c| c.decode_string().unwrap()), "hi");
        assert_eq!(with(Value::from(300u16), |c| c.decode_number::<u16>().unwrap()), 300);
        assert!(with(Value::Null, |c| c.decode_nil()));
    }

    #[test]
    fn null_is_value_not_found() {
        sjson_testhelpers::setup();

        let err = with(Value::Null, |c| c.decode_bool().unwrap_err());
        assert_eq!(err.kind, DecodeErrorKind::ValueNotFound { expected: "bool" });
        assert_eq!(err.path, vec![PathSegment::field("v")]);
    }

    #[test]
    fn wrong_kind_is_type_mismatch() {
        sjson_testhelpers::setup();

        let err = with(Value::from("8"), |c| c.decode_number::<i32>().unwrap_err());
        assert_eq!(
            err.kind,
            DecodeErrorKind::TypeMismatch {
                expected: "i32",
                got: ValueKind::String
            }
        );
    }

    #[test]
    fn overflow_is_data_corrupted() {
        sjson_testhelpers::setup();

        let err = with(Value::from(300u16), |c| c.decode_number::<u8>().unwrap_err());
        assert_eq!(err.to_string(), "at .v: data corrupted: can't parse u8 from `300`");
    }

    #[test]
    fn decimals_are_exact() {
        sjson_testhelpers::setup();

        let d = with(Value::Number("80.6".into()), |c| c.decode_decimal().unwrap());
        assert_eq!(d, Decimal::new(806, 1));
        let d = with(Value::Number("1.5e2".into()), |c| c.decode_decimal().unwrap());
        assert_eq!(d, Decimal::new(150, 0));
        let err = with(Value::Number("1.00000000000000000000000000001".into()), |c| {
            c.decode_decimal().unwrap_err()
        });
        assert!(matches!(err.kind, DecodeErrorKind::DataCorrupted { .. }));
    }
}
