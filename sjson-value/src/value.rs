//! The value tree.

use core::fmt::{self, Write};
use core::{mem, slice};

use indexmap::IndexMap;
use indexmap::map::Iter as EntryIter;

/// Key→value mapping of a JSON object. Keys are unique; iteration follows
/// the order in which keys appeared in the source.
pub type Object = IndexMap<String, Value>;

/// The type of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// Any JSON number
    Number,
    /// A string
    String,
    /// An ordered sequence
    Array,
    /// A key→value mapping
    Object,
}

impl ValueKind {
    /// The lowercase name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An untyped JSON value.
///
/// Values are built bottom-up by the parser and never mutated afterwards;
/// decoders only ever borrow them.
///
/// Dropping, cloning, comparing and [`Display`](fmt::Display) walk the tree
/// with a heap stack, so nesting depth is bounded by memory only. The derived
/// `Debug` output recurses and is meant for shallow values.
#[derive(Debug)]
pub enum Value {
    /// A string, with escapes already decoded
    String(String),
    /// `null`
    Null,
    /// A number, kept as the exact text it was written with
    Number(String),
    /// `true` or `false`
    Bool(bool),
    /// An ordered sequence of values
    Array(Vec<Value>),
    /// A mapping from unique keys to values
    Object(Object),
}

impl Value {
    /// The kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Null => ValueKind::Null,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Whether this is `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean payload, if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The raw number text, if this is a number.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Value::Number(raw) => Some(raw),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is an object.
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Look up position `index` if this is an array.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Take the string payload, or hand the value back if it is not a string.
    pub fn into_string(mut self) -> Result<String, Value> {
        if let Value::String(s) = &mut self {
            return Ok(mem::take(s));
        }
        Err(self)
    }

    pub(crate) fn write_scalar<W: Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            Value::String(s) => write_json_string(w, s),
            Value::Null => w.write_str("null"),
            Value::Number(raw) => w.write_str(raw),
            Value::Bool(b) => w.write_str(if *b { "true" } else { "false" }),
            Value::Array(_) => w.write_str("[]"),
            Value::Object(_) => w.write_str("{}"),
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = match self {
            Value::Array(items) if !items.is_empty() => mem::take(items),
            Value::Object(obj) if !obj.is_empty() => obj.drain(..).map(|(_, v)| v).collect(),
            _ => return,
        };
        // Children are emptied before they drop, so no drop below recurses.
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Array(items) => pending.append(items),
                Value::Object(obj) => pending.extend(obj.drain(..).map(|(_, v)| v)),
                _ => {}
            }
        }
    }
}

/// A container being cloned: the source children left to visit and the
/// copies made so far.
enum CloneFrame<'a> {
    Array(slice::Iter<'a, Value>, Vec<Value>),
    Object(EntryIter<'a, String, Value>, Object, String),
}

impl<'a> CloneFrame<'a> {
    fn next_child(&mut self) -> Option<&'a Value> {
        match self {
            CloneFrame::Array(rest, _) => rest.next(),
            CloneFrame::Object(rest, _, key) => rest.next().map(|(k, v)| {
                key.clone_from(k);
                v
            }),
        }
    }

    fn attach(&mut self, value: Value) {
        match self {
            CloneFrame::Array(_, out) => out.push(value),
            CloneFrame::Object(_, out, key) => {
                out.insert(mem::take(key), value);
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            CloneFrame::Array(_, out) => Value::Array(out),
            CloneFrame::Object(_, out, _) => Value::Object(out),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        let mut stack: Vec<CloneFrame<'_>> = Vec::new();
        let mut next = Some(self);
        loop {
            let mut done = next.take().and_then(|value| match value {
                Value::Array(items) => {
                    stack.push(CloneFrame::Array(items.iter(), Vec::with_capacity(items.len())));
                    None
                }
                Value::Object(obj) => {
                    let out = Object::with_capacity(obj.len());
                    stack.push(CloneFrame::Object(obj.iter(), out, String::new()));
                    None
                }
                Value::String(s) => Some(Value::String(s.clone())),
                Value::Number(raw) => Some(Value::Number(raw.clone())),
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::Null => Some(Value::Null),
            });

            while let Some(frame) = stack.last_mut() {
                if let Some(value) = done.take() {
                    frame.attach(value);
                }
                match frame.next_child() {
                    Some(child) => {
                        next = Some(child);
                        break;
                    }
                    None => done = stack.pop().map(CloneFrame::finish),
                }
            }

            if next.is_none()
                && let Some(value) = done
            {
                return value;
            }
        }
    }
}

/// Structural equality. Objects compare as maps, so key order is ignored.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Value::Array(a), Value::Array(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b));
                }
                (Value::Object(a), Value::Object(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    for (key, value) in a {
                        match b.get(key) {
                            Some(theirs) => pending.push((value, theirs)),
                            None => return false,
                        }
                    }
                }
                (Value::String(a), Value::String(b)) | (Value::Number(a), Value::Number(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::Bool(a), Value::Bool(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::Null, Value::Null) => {}
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

pub(crate) fn write_json_string<W: Write>(w: &mut W, s: &str) -> fmt::Result {
    w.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => w.write_str("\\\"")?,
            '\\' => w.write_str("\\\\")?,
            '\n' => w.write_str("\\n")?,
            '\r' => w.write_str("\\r")?,
            '\t' => w.write_str("\\t")?,
            '\u{0008}' => w.write_str("\\b")?,
            '\u{000C}' => w.write_str("\\f")?,
            c if c.is_control() => write!(w, "\\u{:04x}", c as u32)?,
            c => w.write_char(c)?,
        }
    }
    w.write_char('"')
}

enum WriteFrame<'a> {
    Array(slice::Iter<'a, Value>, bool),
    Object(EntryIter<'a, String, Value>, bool),
}

/// Compact JSON rendering. Numbers are written exactly as they were parsed.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<WriteFrame<'_>> = Vec::new();
        let mut next = Some(self);
        loop {
            match next.take() {
                Some(Value::Array(items)) => {
                    f.write_char('[')?;
                    stack.push(WriteFrame::Array(items.iter(), true));
                }
                Some(Value::Object(obj)) => {
                    f.write_char('{')?;
                    stack.push(WriteFrame::Object(obj.iter(), true));
                }
                Some(scalar) => scalar.write_scalar(f)?,
                None => {}
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };
            match frame {
                WriteFrame::Array(rest, first) => match rest.next() {
                    Some(item) => {
                        if !mem::replace(first, false) {
                            f.write_char(',')?;
                        }
                        next = Some(item);
                    }
                    None => {
                        f.write_char(']')?;
                        stack.pop();
                    }
                },
                WriteFrame::Object(rest, first) => match rest.next() {
                    Some((key, value)) => {
                        if !mem::replace(first, false) {
                            f.write_char(',')?;
                        }
                        write_json_string(f, key)?;
                        f.write_char(':')?;
                        next = Some(value);
                    }
                    None => {
                        f.write_char('}')?;
                        stack.pop();
                    }
                },
            }
        }
    }
}
