//! Character-driven JSON parser.
//!
//! The parser is a push-down automaton: every character is offered to the
//! innermost open scope, which either keeps it, opens a child scope, or
//! completes and hands its value to the parent. Nesting lives on a heap
//! allocated stack, so arbitrarily deep input cannot exhaust the call stack.

use core::mem;

use sjson_value::{Object, Value};
use tracing::{debug, trace};

use crate::error::{ParseError, ParseErrorKind};

/// Parse JSON text into a [`Value`].
///
/// The top-level value must be an object or an array. Leading and trailing
/// whitespace is allowed; anything else after the root value is rejected.
///
/// ```
/// let value = sjson::parse(r#"{"id": 7, "tags": ["a"]}"#).unwrap();
/// assert_eq!(value.get("id").and_then(|v| v.as_number()), Some("7"));
/// ```
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new();
    let mut chars = input.chars().peekable();
    let mut offset = 0;

    while let Some(&c) = chars.peek() {
        let consumed = parser.feed(c).map_err(|kind| fail(kind, offset))?;
        if consumed {
            chars.next();
            offset += 1;
        }
    }

    parser.finish().map_err(|kind| fail(kind, offset))
}

fn fail(kind: ParseErrorKind, offset: usize) -> ParseError {
    debug!("parse failed at offset {offset}: {kind}");
    ParseError::new(kind, offset)
}

struct Parser {
    scope: Scope,
    parents: Vec<Scope>,
}

impl Parser {
    const fn new() -> Self {
        Self {
            scope: Scope::Root(None),
            parents: Vec::new(),
        }
    }

    /// Offer one character. Returns whether it was consumed; a character that
    /// closed a number is offered again to the enclosing scope.
    fn feed(&mut self, c: char) -> Result<bool, ParseErrorKind> {
        match self.scope.accept_char(c)? {
            Step::Stay => Ok(true),
            Step::Descend(child) => {
                trace!("push {} scope (depth {})", child.name(), self.parents.len() + 1);
                let parent = mem::replace(&mut self.scope, child);
                self.parents.push(parent);
                Ok(true)
            }
            Step::Ascend { value, reoffer } => {
                let parent = self
                    .parents
                    .pop()
                    .ok_or(ParseErrorKind::UnexpectedChar(c))?;
                trace!("pop {} scope (depth {})", self.scope.name(), self.parents.len() + 1);
                self.scope = parent;
                self.scope.accept_child(value, c)?;
                Ok(!reoffer)
            }
        }
    }

    fn finish(self) -> Result<Value, ParseErrorKind> {
        if !self.parents.is_empty() {
            return Err(ParseErrorKind::UnexpectedEnd);
        }
        match self.scope {
            Scope::Root(Some(value)) => Ok(value),
            Scope::Root(None) => Err(ParseErrorKind::Empty),
            _ => Err(ParseErrorKind::UnexpectedEnd),
        }
    }
}

/// What a scope did with a character.
enum Step {
    /// State changed in place
    Stay,
    /// A nested value starts here
    Descend(Scope),
    /// The scope is complete
    Ascend {
        value: Value,
        /// Whether the character must be offered to the parent too
        reoffer: bool,
    },
}

enum Scope {
    /// Top level: empty, or holding the finished document
    Root(Option<Value>),
    Array(ArrayScope),
    Object(ObjectScope),
    String(StringScope),
    Number(NumberScope),
    Literal(String),
}

impl Scope {
    const fn name(&self) -> &'static str {
        match self {
            Scope::Root(_) => "root",
            Scope::Array(_) => "array",
            Scope::Object(_) => "object",
            Scope::String(_) => "string",
            Scope::Number(_) => "number",
            Scope::Literal(_) => "literal",
        }
    }

    fn accept_char(&mut self, c: char) -> Result<Step, ParseErrorKind> {
        match self {
            Scope::Root(None) => match c {
                c if is_whitespace(c) => Ok(Step::Stay),
                '{' => Ok(Step::Descend(Scope::Object(ObjectScope::new()))),
                '[' => Ok(Step::Descend(Scope::Array(ArrayScope::new()))),
                c => Err(ParseErrorKind::UnexpectedChar(c)),
            },
            Scope::Root(Some(_)) if is_whitespace(c) => Ok(Step::Stay),
            Scope::Root(Some(_)) => Err(ParseErrorKind::UnexpectedChar(c)),
            Scope::Array(array) => array.accept_char(c),
            Scope::Object(object) => object.accept_char(c),
            Scope::String(string) => string.accept_char(c),
            Scope::Number(number) => number.accept_char(c),
            Scope::Literal(matched) => accept_literal_char(matched, c),
        }
    }

    fn accept_child(&mut self, value: Value, c: char) -> Result<(), ParseErrorKind> {
        match self {
            Scope::Root(slot @ None) => {
                *slot = Some(value);
                Ok(())
            }
            Scope::Array(array) => array.accept_child(value, c),
            Scope::Object(object) => object.accept_child(value, c),
            _ => Err(ParseErrorKind::UnexpectedChar(c)),
        }
    }
}

const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// The scope a value starting with `c` is parsed in, with `c` consumed.
fn value_start(c: char) -> Option<Scope> {
    let scope = match c {
        '"' => Scope::String(StringScope::new()),
        '{' => Scope::Object(ObjectScope::new()),
        '[' => Scope::Array(ArrayScope::new()),
        '-' | '+' => Scope::Number(NumberScope::new(c, NumberState::Sign)),
        '0'..='9' => Scope::Number(NumberScope::new(c, NumberState::Integer)),
        't' | 'f' | 'n' => Scope::Literal(c.to_string()),
        _ => return None,
    };
    Some(scope)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Right after `[`
    ValueOrEnd,
    /// Right after `,`
    Value,
    CommaOrEnd,
}

struct ArrayScope {
    items: Vec<Value>,
    state: ArrayState,
}

impl ArrayScope {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            state: ArrayState::ValueOrEnd,
        }
    }

    fn accept_char(&mut self, c: char) -> Result<Step, ParseErrorKind> {
        if is_whitespace(c) {
            return Ok(Step::Stay);
        }
        match self.state {
            ArrayState::ValueOrEnd | ArrayState::CommaOrEnd if c == ']' => Ok(Step::Ascend {
                value: Value::Array(mem::take(&mut self.items)),
                reoffer: false,
            }),
            ArrayState::CommaOrEnd if c == ',' => {
                self.state = ArrayState::Value;
                Ok(Step::Stay)
            }
            ArrayState::ValueOrEnd | ArrayState::Value => value_start(c)
                .map(Step::Descend)
                .ok_or(ParseErrorKind::UnexpectedChar(c)),
            ArrayState::CommaOrEnd => Err(ParseErrorKind::UnexpectedChar(c)),
        }
    }

    fn accept_child(&mut self, value: Value, c: char) -> Result<(), ParseErrorKind> {
        if self.state == ArrayState::CommaOrEnd {
            return Err(ParseErrorKind::UnexpectedChar(c));
        }
        self.items.push(value);
        self.state = ArrayState::CommaOrEnd;
        Ok(())
    }
}

enum ObjectState {
    /// Right after `{`
    KeyOrEnd,
    /// Right after `,`
    Key,
    Colon(String),
    Value(String),
    CommaOrEnd,
}

struct ObjectScope {
    entries: Object,
    state: ObjectState,
}

impl ObjectScope {
    fn new() -> Self {
        Self {
            entries: Object::new(),
            state: ObjectState::KeyOrEnd,
        }
    }

    fn accept_char(&mut self, c: char) -> Result<Step, ParseErrorKind> {
        if is_whitespace(c) {
            return Ok(Step::Stay);
        }
        match &mut self.state {
            ObjectState::KeyOrEnd | ObjectState::Key if c == '"' => {
                Ok(Step::Descend(Scope::String(StringScope::new())))
            }
            ObjectState::KeyOrEnd | ObjectState::CommaOrEnd if c == '}' => Ok(Step::Ascend {
                value: Value::Object(mem::take(&mut self.entries)),
                reoffer: false,
            }),
            ObjectState::Colon(key) if c == ':' => {
                let key = mem::take(key);
                self.state = ObjectState::Value(key);
                Ok(Step::Stay)
            }
            ObjectState::Value(_) => value_start(c)
                .map(Step::Descend)
                .ok_or(ParseErrorKind::UnexpectedChar(c)),
            ObjectState::CommaOrEnd if c == ',' => {
                self.state = ObjectState::Key;
                Ok(Step::Stay)
            }
            _ => Err(ParseErrorKind::UnexpectedChar(c)),
        }
    }

    fn accept_child(&mut self, value: Value, c: char) -> Result<(), ParseErrorKind> {
        match mem::replace(&mut self.state, ObjectState::CommaOrEnd) {
            ObjectState::KeyOrEnd | ObjectState::Key => {
                let key = value
                    .into_string()
                    .map_err(|_| ParseErrorKind::UnexpectedChar(c))?;
                if self.entries.contains_key(&key) {
                    return Err(ParseErrorKind::DuplicateKey(key));
                }
                self.state = ObjectState::Colon(key);
                Ok(())
            }
            ObjectState::Value(key) => {
                self.entries.insert(key, value);
                Ok(())
            }
            _ => Err(ParseErrorKind::UnexpectedChar(c)),
        }
    }
}

enum Escape {
    None,
    Backslash,
    /// Inside `\uXXXX`; `high` is set while reading the low half of a pair
    Unicode {
        digits: u8,
        unit: u16,
        high: Option<u16>,
    },
    /// A high surrogate was read, its low half must follow
    PendingLow(u16),
    /// Saw the `\` of the low half
    PendingLowU(u16),
}

struct StringScope {
    buf: String,
    escape: Escape,
}

impl StringScope {
    const fn new() -> Self {
        Self {
            buf: String::new(),
            escape: Escape::None,
        }
    }

    fn accept_char(&mut self, c: char) -> Result<Step, ParseErrorKind> {
        match &mut self.escape {
            Escape::None => match c {
                '"' => {
                    return Ok(Step::Ascend {
                        value: Value::String(mem::take(&mut self.buf)),
                        reoffer: false,
                    });
                }
                '\\' => self.escape = Escape::Backslash,
                c => self.buf.push(c),
            },
            Escape::Backslash => {
                let decoded = match c {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        self.escape = Escape::Unicode {
                            digits: 0,
                            unit: 0,
                            high: None,
                        };
                        return Ok(Step::Stay);
                    }
                    c => return Err(ParseErrorKind::InvalidEscape(c)),
                };
                self.buf.push(decoded);
                self.escape = Escape::None;
            }
            Escape::Unicode { digits, unit, high } => {
                let digit = c
                    .to_digit(16)
                    .ok_or(ParseErrorKind::InvalidUnicodeEscape(c))?;
                *unit = (*unit << 4) | digit as u16;
                *digits += 1;
                if *digits == 4 {
                    let (unit, high) = (*unit, *high);
                    self.escape = self.finish_unit(unit, high)?;
                }
            }
            Escape::PendingLow(high) if c == '\\' => self.escape = Escape::PendingLowU(*high),
            Escape::PendingLowU(high) if c == 'u' => {
                self.escape = Escape::Unicode {
                    digits: 0,
                    unit: 0,
                    high: Some(*high),
                }
            }
            Escape::PendingLow(_) | Escape::PendingLowU(_) => {
                return Err(ParseErrorKind::UnpairedSurrogate);
            }
        }
        Ok(Step::Stay)
    }

    fn finish_unit(&mut self, unit: u16, high: Option<u16>) -> Result<Escape, ParseErrorKind> {
        let code_point = match (high, unit) {
            (None, 0xD800..=0xDBFF) => return Ok(Escape::PendingLow(unit)),
            (None, 0xDC00..=0xDFFF) => return Err(ParseErrorKind::UnpairedSurrogate),
            (None, unit) => u32::from(unit),
            (Some(high), 0xDC00..=0xDFFF) => {
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00)
            }
            (Some(_), _) => return Err(ParseErrorKind::UnpairedSurrogate),
        };
        let decoded = char::from_u32(code_point).ok_or(ParseErrorKind::UnpairedSurrogate)?;
        self.buf.push(decoded);
        Ok(Escape::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    /// Only a sign so far
    Sign,
    Integer,
    /// Right after the decimal point
    Point,
    Fraction,
    /// Right after `e`/`E`
    Exponent,
    ExponentSign,
    ExponentDigits,
}

struct NumberScope {
    raw: String,
    state: NumberState,
}

impl NumberScope {
    fn new(first: char, state: NumberState) -> Self {
        Self {
            raw: first.to_string(),
            state,
        }
    }

    fn accept_char(&mut self, c: char) -> Result<Step, ParseErrorKind> {
        use NumberState::*;

        let next = match (self.state, c) {
            (Sign | Integer, '0'..='9') => Integer,
            (Integer, '.') => Point,
            (Point | Fraction, '0'..='9') => Fraction,
            (Integer | Fraction, 'e' | 'E') => Exponent,
            (Exponent, '+' | '-') => ExponentSign,
            (Exponent | ExponentSign | ExponentDigits, '0'..='9') => ExponentDigits,
            (Integer | Fraction | ExponentDigits, c)
                if is_whitespace(c) || matches!(c, ',' | '}' | ']') =>
            {
                return Ok(Step::Ascend {
                    value: Value::Number(mem::take(&mut self.raw)),
                    reoffer: true,
                });
            }
            (_, c) => return Err(ParseErrorKind::UnexpectedChar(c)),
        };
        self.raw.push(c);
        self.state = next;
        Ok(Step::Stay)
    }
}

static LITERALS: [(&str, Value); 3] = [
    ("true", Value::Bool(true)),
    ("false", Value::Bool(false)),
    ("null", Value::Null),
];

fn accept_literal_char(matched: &mut String, c: char) -> Result<Step, ParseErrorKind> {
    matched.push(c);
    let mut candidates = LITERALS
        .iter()
        .filter(|(text, _)| text.starts_with(matched.as_str()));
    match candidates.next() {
        Some((text, value)) if *text == matched.as_str() => Ok(Step::Ascend {
            value: value.clone(),
            reoffer: false,
        }),
        Some(_) => Ok(Step::Stay),
        None => Err(ParseErrorKind::UnexpectedChar(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(input: &str) -> ParseError {
        parse(input).unwrap_err()
    }

    #[test]
    fn nested_shapes() {
        sjson_testhelpers::setup();

        let value = parse(r#"{"a": [1, {"b": null}], "c": {"d": [true, false, "x"]}}"#).unwrap();
        assert_eq!(
            value.to_string(),
            r#"{"a":[1,{"b":null}],"c":{"d":[true,false,"x"]}}"#
        );
    }

    #[test]
    fn empty_containers() {
        sjson_testhelpers::setup();

        assert_eq!(parse("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(parse(" { } ").unwrap(), Value::Object(Object::new()));
        assert_eq!(parse("[[]]").unwrap(), Value::Array(vec![Value::Array(vec![])]));
    }

    #[test]
    fn numbers_keep_their_text() {
        sjson_testhelpers::setup();

        let value = parse("[0, -12, 3.50, 1e3, 2.5E-7, +4]").unwrap();
        let raw: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_number().unwrap())
            .collect();
        assert_eq!(raw, ["0", "-12", "3.50", "1e3", "2.5E-7", "+4"]);
    }

    #[test]
    fn malformed_numbers() {
        sjson_testhelpers::setup();

        for input in ["[-]", "[1.]", "[.5]", "[1e]", "[1e+]", "[1.2.3]", "[--1]", "[1-]"] {
            assert!(
                matches!(parse_err(input).kind, ParseErrorKind::UnexpectedChar(_)),
                "{input} should fail"
            );
        }
    }

    #[test]
    fn number_terminated_by_closer() {
        sjson_testhelpers::setup();

        let value = parse(r#"{"n":5}"#).unwrap();
        assert_eq!(value.get("n").and_then(Value::as_number), Some("5"));
        let value = parse("[5\n]").unwrap();
        assert_eq!(value.get_index(0).and_then(Value::as_number), Some("5"));
    }

    #[test]
    fn escapes() {
        sjson_testhelpers::setup();

        let value = parse(r#"["a\"b\\c\/d\n\t\r\b\f", "\u00e9\u4E2D"]"#).unwrap();
        assert_eq!(
            value.get_index(0).and_then(Value::as_str),
            Some("a\"b\\c/d\n\t\r\u{8}\u{c}")
        );
        assert_eq!(value.get_index(1).and_then(Value::as_str), Some("é中"));
    }

    #[test]
    fn surrogate_pairs_combine() {
        sjson_testhelpers::setup();

        let value = parse(r#"["\ud83d\ude00!"]"#).unwrap();
        assert_eq!(value.get_index(0).and_then(Value::as_str), Some("😀!"));
    }

    #[test]
    fn unpaired_surrogates() {
        sjson_testhelpers::setup();

        for input in [
            r#"["\ud83d"]"#,
            r#"["\ude00"]"#,
            r#"["\ud83dx"]"#,
            r#"["\ud83d\n"]"#,
            r#"["\ud83dA"]"#,
        ] {
            assert_eq!(
                parse_err(input).kind,
                ParseErrorKind::UnpairedSurrogate,
                "{input}"
            );
        }
    }

    #[test]
    fn bad_escapes() {
        sjson_testhelpers::setup();

        assert_eq!(parse_err(r#"["\q"]"#).kind, ParseErrorKind::InvalidEscape('q'));
        assert_eq!(
            parse_err(r#"["\u12g4"]"#).kind,
            ParseErrorKind::InvalidUnicodeEscape('g')
        );
    }

    #[test]
    fn duplicate_keys_rejected() {
        sjson_testhelpers::setup();

        let err = parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DuplicateKey("a".into()));
        assert_eq!(err.offset, 19);
    }

    #[test]
    fn no_empty_slots() {
        sjson_testhelpers::setup();

        for input in [
            "[,]",
            "[1,]",
            "[1,,2]",
            "[1 2]",
            r#"{"a":1,}"#,
            r#"{,}"#,
            r#"{"a" 1}"#,
            r#"{"a":}"#,
        ] {
            assert!(
                matches!(parse_err(input).kind, ParseErrorKind::UnexpectedChar(_)),
                "{input} should fail"
            );
        }
    }

    #[test]
    fn root_must_be_a_container() {
        sjson_testhelpers::setup();

        assert_eq!(parse_err("true").kind, ParseErrorKind::UnexpectedChar('t'));
        assert_eq!(parse_err("\"s\"").kind, ParseErrorKind::UnexpectedChar('"'));
        assert_eq!(parse_err("Not valid string").offset, 0);
    }

    #[test]
    fn trailing_content() {
        sjson_testhelpers::setup();

        assert!(parse("[1]  \n").is_ok());
        let err = parse_err("[1] [2]");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('['));
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn incomplete_input() {
        sjson_testhelpers::setup();

        assert_eq!(parse_err("").kind, ParseErrorKind::Empty);
        assert_eq!(parse_err("  \n").kind, ParseErrorKind::Empty);
        for input in ["[", "{\"a\"", "{\"a\":", "[1", "[\"abc", "[tru"] {
            let err = parse_err(input);
            assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd, "{input}");
            assert_eq!(err.offset, input.chars().count());
        }
    }

    #[test]
    fn literals() {
        sjson_testhelpers::setup();

        assert_eq!(
            parse("[true,false,null]").unwrap(),
            Value::Array(vec![Value::Bool(true), Value::Bool(false), Value::Null])
        );
        assert_eq!(parse_err("[nul]").kind, ParseErrorKind::UnexpectedChar(']'));
        assert_eq!(parse_err("[trUe]").kind, ParseErrorKind::UnexpectedChar('U'));
        assert_eq!(parse_err("[truex]").kind, ParseErrorKind::UnexpectedChar('x'));
    }

    /// Runs `f` with tracing muted; deep inputs emit one event per scope.
    fn quietly<R>(f: impl FnOnce() -> R) -> R {
        tracing::subscriber::with_default(tracing::subscriber::NoSubscriber::default(), f)
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        sjson_testhelpers::setup();

        let depth = 1_000_000;
        let input = "[".repeat(depth) + &"]".repeat(depth);
        let value = quietly(|| parse(&input)).unwrap();
        let mut node = &value;
        let mut seen = 1;
        while let Some(inner) = node.get_index(0) {
            node = inner;
            seen += 1;
        }
        assert_eq!(seen, depth);
        drop(value);
    }

    #[test]
    fn deep_objects_survive_clone_compare_and_display() {
        sjson_testhelpers::setup();

        let depth = 100_000;
        let input = r#"{"a":"#.repeat(depth) + "[]" + &"}".repeat(depth);
        let value = quietly(|| parse(&input)).unwrap();
        let copy = value.clone();
        assert_eq!(copy, value);
        assert_eq!(copy.to_string(), input);
    }

    #[test]
    fn deep_input_failing_late_is_dropped() {
        sjson_testhelpers::setup();

        let depth = 100_000;
        let input = "[".repeat(depth) + "1" + &"]".repeat(depth - 1) + ",";
        let err = quietly(|| parse(&input)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);
    }
}
