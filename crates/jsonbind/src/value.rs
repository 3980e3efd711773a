//! The DOM value type and its event bridge.
//!
//! [`Value`] stands in for a generic document when one is explicitly
//! requested: it implements [`Bind`], so any event stream can materialize
//! into it and any value can be written through it. Integers keep their
//! signedness ([`Value::Int`]/[`Value::Uint`]) so 64-bit values survive the
//! round trip; numeric equality unifies the two integer forms.

use alloc::{
    borrow::Cow,
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};
use core::any::Any;

use crate::{
    bind::{Bind, ParseState},
    error::{Error, ErrorStack},
    event::{Event, EventSink},
};

/// Object representation: string keys in sorted order.
pub type Map = BTreeMap<String, Value>;
/// Array representation.
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// Numbers are split into negative integers, non-negative integers and
/// doubles, matching the event protocol's classification.
///
/// # Examples
///
/// ```
/// use jsonbind::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    /// A negative integer (non-negative integers normalize to [`Value::Uint`]
    /// when built from events).
    Int(i64),
    /// A non-negative integer.
    Uint(u64),
    Double(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Int(a), Self::Uint(b)) | (Self::Uint(b), Self::Int(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        if let Ok(v) = u64::try_from(v) {
            Self::Uint(v)
        } else {
            Self::Int(v)
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(String::from(v))
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Bool`](Value::Bool).
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is any of the numeric variants.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(..) | Self::Uint(..) | Self::Double(..))
    }

    /// Returns `true` if the value is [`String`](Value::String).
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`](Value::Array).
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`](Value::Object).
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The object member at `key`, if this is an object that has it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Replaces quotes, backslashes, control characters (<= U+001F) and the
/// Unicode line separators U+2028/U+2029 (which pre-2019 JavaScript parsers
/// mishandle) with their escape sequences.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_ascii_control() => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Writes a double the way the text writer does: shortest form, with a
/// trailing `.0` appended to whole numbers so the text re-parses as a
/// double. Non-finite values render as `null`.
pub(crate) fn write_double<W: core::fmt::Write>(value: f64, f: &mut W) -> core::fmt::Result {
    if !value.is_finite() {
        return f.write_str("null");
    }
    let text = value.to_string();
    f.write_str(&text)?;
    if !text.contains(['.', 'e', 'E']) {
        f.write_str(".0")?;
    }
    Ok(())
}

impl core::fmt::Display for Value {
    /// Compact JSON text.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Double(n) => write_double(*n, f),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Walk a [`Value`] and push the corresponding event sequence into `sink`.
pub fn emit_value(value: &Value, sink: &mut dyn EventSink) -> bool {
    match value {
        Value::Null => sink.event(Event::Null),
        Value::Bool(b) => sink.event(Event::Bool(*b)),
        Value::Int(n) => match i32::try_from(*n) {
            Ok(n) => sink.event(Event::Int(n)),
            Err(_) => sink.event(Event::Int64(*n)),
        },
        Value::Uint(n) => match u32::try_from(*n) {
            Ok(n) => sink.event(Event::Uint(n)),
            Err(_) => sink.event(Event::Uint64(*n)),
        },
        Value::Double(n) => sink.event(Event::Double(*n)),
        Value::String(s) => sink.event(Event::String(s)),
        Value::Array(arr) => {
            if !sink.event(Event::StartArray) {
                return false;
            }
            for v in arr {
                if !emit_value(v, sink) {
                    return false;
                }
            }
            sink.event(Event::EndArray(arr.len()))
        }
        Value::Object(map) => {
            if !sink.event(Event::StartObject) {
                return false;
            }
            for (k, v) in map {
                if !sink.event(Event::Key(k)) {
                    return false;
                }
                if !emit_value(v, sink) {
                    return false;
                }
            }
            sink.event(Event::EndObject(map.len()))
        }
    }
}

#[derive(Debug)]
enum Frame {
    Array(Array),
    Object(Map, Option<String>),
}

/// State for a [`Value`] binding: a stack of partially built containers.
#[derive(Debug, Default)]
pub struct ValueState {
    stack: Vec<Frame>,
    parsed: bool,
    error: Option<Error>,
}

impl ValueState {
    fn fail(&mut self, error: Error) -> bool {
        self.error = Some(error);
        false
    }
}

impl ParseState for ValueState {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.parsed = false;
        self.error = None;
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        match self.error.take() {
            Some(error) => {
                stack.push(error);
                true
            }
            None => false,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn place(target: &mut Value, state: &mut ValueState, value: Value) -> bool {
    match state.stack.last_mut() {
        None => {
            *target = value;
            state.parsed = true;
            true
        }
        Some(Frame::Array(arr)) => {
            arr.push(value);
            true
        }
        Some(Frame::Object(map, pending)) => match pending.take() {
            Some(key) => {
                map.insert(key, value);
                true
            }
            None => state.fail(Error::CorruptedStructure),
        },
    }
}

impl Bind for Value {
    type State = ValueState;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        if state.error.is_some() {
            return false;
        }
        match event {
            Event::Null => place(self, state, Value::Null),
            Event::Bool(b) => place(self, state, Value::Bool(b)),
            Event::Int(n) => place(self, state, Value::from(i64::from(n))),
            Event::Uint(n) => place(self, state, Value::Uint(u64::from(n))),
            Event::Int64(n) => place(self, state, Value::from(n)),
            Event::Uint64(n) => place(self, state, Value::Uint(n)),
            Event::Double(n) => place(self, state, Value::Double(n)),
            Event::String(s) => place(self, state, Value::String(String::from(s))),
            Event::StartArray => {
                state.stack.push(Frame::Array(Array::new()));
                true
            }
            Event::StartObject => {
                state.stack.push(Frame::Object(Map::new(), None));
                true
            }
            Event::Key(k) => match state.stack.last_mut() {
                Some(Frame::Object(_, pending)) => {
                    *pending = Some(String::from(k));
                    true
                }
                _ => state.fail(Error::CorruptedStructure),
            },
            Event::EndArray(_) => match state.stack.pop() {
                Some(Frame::Array(arr)) => place(self, state, Value::Array(arr)),
                _ => state.fail(Error::CorruptedStructure),
            },
            Event::EndObject(_) => match state.stack.pop() {
                Some(Frame::Object(map, None)) => place(self, state, Value::Object(map)),
                _ => state.fail(Error::CorruptedStructure),
            },
        }
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        emit_value(self, sink)
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("any")
    }

    fn schema(&self) -> Value {
        // An empty schema accepts any instance.
        Value::Object(Map::new())
    }
}
