//! Pluggable date decoding.

use alloc::borrow::Cow;
use core::fmt::{self, Display};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::DecodeError;
use crate::single_value::SingleValueContainer;

type DateFn =
    dyn Fn(&SingleValueContainer<'_>) -> Result<DateTime<Utc>, DecodeError> + Send + Sync;

/// How timestamps are read out of a JSON value.
///
/// The strategy receives a single-value container wrapping the value that
/// holds the date and may read it any way it likes. The default reads an
/// integer number of milliseconds since the Unix epoch.
///
/// ```
/// use sjson::{DateStrategy, JsonDecoder};
///
/// let decoder = JsonDecoder::new().with_date_strategy(DateStrategy::format("%Y-%m-%d %H:%M:%S"));
/// let dates: Vec<chrono::DateTime<chrono::Utc>> =
///     decoder.decode_str(r#"["2024-02-29 12:00:00"]"#).unwrap();
/// assert_eq!(dates[0].timestamp(), 1_709_208_000);
/// ```
pub struct DateStrategy {
    description: Cow<'static, str>,
    decode: Box<DateFn>,
}

impl DateStrategy {
    /// A strategy backed by an arbitrary function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&SingleValueContainer<'_>) -> Result<DateTime<Utc>, DecodeError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            description: Cow::Borrowed("custom"),
            decode: Box::new(f),
        }
    }

    /// Read a string and convert it with `f`.
    pub fn from_string<F, E>(f: F) -> Self
    where
        F: Fn(&str) -> Result<DateTime<Utc>, E> + Send + Sync + 'static,
        E: Display,
    {
        Self::custom(move |container| {
            let text = container.decode_str()?;
            f(text).map_err(|err| {
                DecodeError::data_corrupted(
                    container.path(),
                    format!("can't parse string with date: {err}"),
                )
            })
        })
        .described("from_string")
    }

    /// Read an `i64` and convert it with `f`.
    pub fn from_integer<F, E>(f: F) -> Self
    where
        F: Fn(i64) -> Result<DateTime<Utc>, E> + Send + Sync + 'static,
        E: Display,
    {
        Self::custom(move |container| {
            let n = container.decode_number::<i64>()?;
            f(n).map_err(|err| {
                DecodeError::data_corrupted(
                    container.path(),
                    format!("can't transform integer into date: {err}"),
                )
            })
        })
        .described("from_integer")
    }

    /// Read a string in a fixed [`chrono` format](chrono::format::strftime),
    /// interpreted as UTC.
    pub fn format(format: impl Into<String>) -> Self {
        let format = format.into();
        let description = format!("format({format:?})");
        Self::from_string(move |text| {
            NaiveDateTime::parse_from_str(text, &format).map(|naive| naive.and_utc())
        })
        .described(description)
    }

    /// Read integer milliseconds since the Unix epoch.
    pub fn timestamp_millis() -> Self {
        Self::from_integer(|millis| {
            DateTime::from_timestamp_millis(millis).ok_or(OutOfRange(millis))
        })
        .described("timestamp_millis")
    }

    /// Read integer seconds since the Unix epoch.
    pub fn timestamp_secs() -> Self {
        Self::from_integer(|secs| DateTime::from_timestamp(secs, 0).ok_or(OutOfRange(secs)))
            .described("timestamp_secs")
    }

    /// Run the strategy. Errors come back exactly as the strategy raised them.
    pub fn decode(
        &self,
        container: &SingleValueContainer<'_>,
    ) -> Result<DateTime<Utc>, DecodeError> {
        (self.decode)(container)
    }

    fn described(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }
}

impl Default for DateStrategy {
    fn default() -> Self {
        Self::timestamp_millis()
    }
}

impl fmt::Debug for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DateStrategy").field(&self.description).finish()
    }
}

struct OutOfRange(i64);

impl Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is out of range", self.0)
    }
}
