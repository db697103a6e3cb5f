//! Pretty formatting for Values with span tracking.
//!
//! Formats a `Value` as indented JSON and records, for every path through the
//! value, the byte span its rendering occupies. Diagnostics use the span table
//! to point at the node an error refers to.

use core::{iter, mem, slice};
use std::collections::BTreeMap;

use indexmap::map::Iter as EntryIter;
use sjson_path::PathSegment;

use crate::Value;
use crate::value::write_json_string;

/// A byte span in formatted output (start, end)
pub type Span = (usize, usize);

/// Result of formatting a value with span tracking
#[derive(Debug)]
pub struct FormattedValue {
    /// The formatted text
    pub text: String,
    /// Map from paths to their byte spans in `text`
    pub spans: BTreeMap<Vec<PathSegment>, Span>,
}

impl FormattedValue {
    /// The span recorded for `path`, if that path exists in the value.
    pub fn span_of(&self, path: &[PathSegment]) -> Option<Span> {
        self.spans.get(path).copied()
    }

    /// The span for `path`, or for its longest existing prefix.
    ///
    /// Useful when the path names something the value does not contain, such
    /// as a missing key: the enclosing object gets highlighted instead.
    pub fn closest_span(&self, path: &[PathSegment]) -> Span {
        (0..=path.len())
            .rev()
            .find_map(|len| self.span_of(&path[..len]))
            .unwrap_or((0, self.text.len()))
    }
}

/// Format a Value as indented JSON text with span tracking
///
/// The walk itself is iterative, but every node keeps its full path in the
/// span table, so the table grows with node count times depth.
pub fn format_value_with_spans(value: &Value) -> FormattedValue {
    let mut ctx = FormatContext::new();
    let mut path = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut next = Some(value);

    loop {
        if let Some(value) = next.take() {
            let start = ctx.len();
            match value {
                Value::Array(items) if !items.is_empty() => {
                    ctx.open('[');
                    stack.push(Frame::new(Children::Array(items.iter().enumerate()), start, ']'));
                }
                Value::Object(obj) if !obj.is_empty() => {
                    ctx.open('{');
                    stack.push(Frame::new(Children::Object(obj.iter()), start, '}'));
                }
                scalar => {
                    let _ = scalar.write_scalar(&mut ctx.output);
                    ctx.spans.insert(path.clone(), (start, ctx.len()));
                }
            }
        }

        let Some(frame) = stack.last_mut() else {
            break;
        };
        if mem::replace(&mut frame.in_child, false) {
            path.pop();
            if frame.children.remaining() > 0 {
                ctx.output.push(',');
            }
            ctx.output.push('\n');
        }
        match frame.children.next_child() {
            Some((segment, child)) => {
                ctx.write_indent();
                if let PathSegment::Field(key) = &segment {
                    let _ = write_json_string(&mut ctx.output, key);
                    ctx.output.push_str(": ");
                }
                path.push(segment);
                frame.in_child = true;
                next = Some(child);
            }
            None => {
                let (start, close) = (frame.start, frame.close);
                stack.pop();
                ctx.close(close);
                ctx.spans.insert(path.clone(), (start, ctx.len()));
            }
        }
    }

    FormattedValue {
        text: ctx.output,
        spans: ctx.spans,
    }
}

/// Format a Value as indented JSON text
pub fn format_value(value: &Value) -> String {
    format_value_with_spans(value).text
}

struct FormatContext {
    output: String,
    spans: BTreeMap<Vec<PathSegment>, Span>,
    indent: usize,
}

impl FormatContext {
    const fn new() -> Self {
        Self {
            output: String::new(),
            spans: BTreeMap::new(),
            indent: 0,
        }
    }

    const fn len(&self) -> usize {
        self.output.len()
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn open(&mut self, bracket: char) {
        self.output.push(bracket);
        self.output.push('\n');
        self.indent += 1;
    }

    fn close(&mut self, bracket: char) {
        self.indent -= 1;
        self.write_indent();
        self.output.push(bracket);
    }
}

/// An open array or object: the children left to write and where it began.
struct Frame<'a> {
    children: Children<'a>,
    start: usize,
    close: char,
    in_child: bool,
}

impl<'a> Frame<'a> {
    const fn new(children: Children<'a>, start: usize, close: char) -> Self {
        Self {
            children,
            start,
            close,
            in_child: false,
        }
    }
}

enum Children<'a> {
    Array(iter::Enumerate<slice::Iter<'a, Value>>),
    Object(EntryIter<'a, String, Value>),
}

impl<'a> Children<'a> {
    fn next_child(&mut self) -> Option<(PathSegment, &'a Value)> {
        match self {
            Children::Array(items) => items.next().map(|(i, v)| (PathSegment::Index(i), v)),
            Children::Object(entries) => entries
                .next()
                .map(|(k, v)| (PathSegment::Field(k.clone()), v)),
        }
    }

    fn remaining(&self) -> usize {
        match self {
            Children::Array(items) => items.len(),
            Children::Object(entries) => entries.len(),
        }
    }
}
