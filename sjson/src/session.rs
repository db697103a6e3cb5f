use chrono::{DateTime, Utc};
use tracing::trace;

use crate::date::DateStrategy;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::single_value::SingleValueContainer;

/// Configuration shared read-only by every container of one decode call.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    date_strategy: &'a DateStrategy,
}

impl<'a> Session<'a> {
    /// Create a session that decodes dates with `date_strategy`.
    pub const fn new(date_strategy: &'a DateStrategy) -> Self {
        Self { date_strategy }
    }

    /// The date strategy in effect.
    pub const fn date_strategy(&self) -> &'a DateStrategy {
        self.date_strategy
    }

    /// Run the date strategy on `container`.
    ///
    /// Corrupted-data failures from the strategy are reported as
    /// "can't parse date" at the container's path. Other failures, such as a
    /// string strategy meeting `null`, pass through unchanged.
    pub fn decode_date(
        &self,
        container: &SingleValueContainer<'_>,
    ) -> Result<DateTime<Utc>, DecodeError> {
        trace!("decoding date at {} with {:?}", container.path(), self.date_strategy);
        self.date_strategy.decode(container).map_err(|err| {
            if let DecodeErrorKind::DataCorrupted { message } = &err.kind {
                DecodeError::data_corrupted(
                    container.path(),
                    format!("can't parse date: {message}"),
                )
            } else {
                err
            }
        })
    }
}
