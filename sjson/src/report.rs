//! miette rendering for decode errors.

use core::fmt;

use sjson_value::format_value_with_spans;

use crate::error::DecodeError;

/// A [`DecodeError`] together with the pretty-printed source value, ready to
/// be rendered by miette.
///
/// The label points at the value the error's path names, or at the closest
/// enclosing value when the path leads somewhere the document doesn't go
/// (a missing key, an index past the end).
pub struct DecodeErrorReport {
    error: DecodeError,
    source_text: Option<String>,
    label: Option<(usize, usize, String)>,
}

impl DecodeErrorReport {
    /// Build a report for `error`.
    pub fn new(error: DecodeError) -> Self {
        let (source_text, label) = match &error.source_value {
            Some(value) => {
                let formatted = format_value_with_spans(value);
                let (start, end) = formatted.closest_span(&error.path);
                (
                    Some(formatted.text),
                    Some((start, end, error.kind.label())),
                )
            }
            None => (None, None),
        };
        Self {
            error,
            source_text,
            label,
        }
    }

    /// The wrapped error.
    pub const fn error(&self) -> &DecodeError {
        &self.error
    }

    /// The pretty-printed source value, if the error carried one.
    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }

    /// Take back the wrapped error.
    pub fn into_error(self) -> DecodeError {
        self.error
    }
}

impl fmt::Debug for DecodeErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.error, f)
    }
}

impl fmt::Display for DecodeErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl core::error::Error for DecodeErrorReport {}

impl miette::Diagnostic for DecodeErrorReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.kind.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_text
            .as_ref()
            .map(|text| text as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let (start, end, label) = self.label.as_ref()?;
        Some(Box::new(core::iter::once(miette::LabeledSpan::at(
            *start..*end,
            label.as_str(),
        ))))
    }
}
