#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod value;
pub use value::*;

mod format;
pub use format::{FormattedValue, Span, format_value, format_value_with_spans};
