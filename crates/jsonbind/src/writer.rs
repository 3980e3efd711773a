//! The JSON text writer and the top-level write drivers.
//!
//! [`Writer`] is an [`EventSink`]: a handler walking its bound value pushes
//! the same 13-event protocol into it that the tokenizer produces when
//! reading. Compact mode emits no whitespace; pretty mode indents with four
//! spaces. Non-finite doubles have no JSON representation and fail the
//! write.

use alloc::{string::String, vec::Vec};
use core::fmt;

use crate::{
    bind::{Bind, BindSink, ParseState},
    error::WriteError,
    event::{Event, EventSink},
    value::{Value, ValueState, write_double, write_escaped_string},
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

struct Level {
    container: Container,
    count: usize,
}

/// An [`EventSink`] rendering the event stream as JSON text into any
/// [`fmt::Write`].
pub struct Writer<'w, W: fmt::Write> {
    out: &'w mut W,
    pretty: bool,
    levels: Vec<Level>,
    error: Option<WriteError>,
}

impl<'w, W: fmt::Write> Writer<'w, W> {
    /// A writer producing compact output.
    pub fn compact(out: &'w mut W) -> Self {
        Self {
            out,
            pretty: false,
            levels: Vec::new(),
            error: None,
        }
    }

    /// A writer producing pretty output with four-space indentation.
    pub fn pretty(out: &'w mut W) -> Self {
        Self {
            out,
            pretty: true,
            levels: Vec::new(),
            error: None,
        }
    }

    /// The failure that stopped the stream, if any.
    pub fn take_error(&mut self) -> Option<WriteError> {
        self.error.take()
    }

    fn indent(&mut self, depth: usize) -> fmt::Result {
        self.out.write_char('\n')?;
        for _ in 0..depth {
            self.out.write_str("    ")?;
        }
        Ok(())
    }

    /// Separators before a value in array context (or nothing in object
    /// context, where the key already placed them).
    fn before_value(&mut self) -> fmt::Result {
        let depth = self.levels.len();
        let comma = match self.levels.last_mut() {
            Some(level) if level.container == Container::Array => {
                let comma = level.count > 0;
                level.count += 1;
                Some(comma)
            }
            _ => None,
        };
        if let Some(comma) = comma {
            if comma {
                self.out.write_char(',')?;
            }
            if self.pretty {
                self.indent(depth)?;
            }
        }
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> fmt::Result {
        let depth = self.levels.len();
        let comma = match self.levels.last_mut() {
            Some(level) => {
                let comma = level.count > 0;
                level.count += 1;
                comma
            }
            None => false,
        };
        if comma {
            self.out.write_char(',')?;
        }
        if self.pretty {
            self.indent(depth)?;
        }
        self.out.write_char('"')?;
        write_escaped_string(key, &mut *self.out)?;
        self.out.write_str(if self.pretty { "\": " } else { "\":" })
    }

    fn open(&mut self, container: Container) -> fmt::Result {
        self.before_value()?;
        self.out
            .write_char(if container == Container::Object { '{' } else { '[' })?;
        self.levels.push(Level {
            container,
            count: 0,
        });
        Ok(())
    }

    fn close(&mut self, container: Container) -> fmt::Result {
        let level = self.levels.pop();
        if let Some(level) = level {
            if self.pretty && level.count > 0 {
                self.indent(self.levels.len())?;
            }
        }
        self.out
            .write_char(if container == Container::Object { '}' } else { ']' })
    }

    fn write_event(&mut self, event: Event<'_>) -> Result<(), WriteError> {
        match event {
            Event::Null => {
                self.before_value()?;
                self.out.write_str("null")?;
            }
            Event::Bool(b) => {
                self.before_value()?;
                self.out.write_str(if b { "true" } else { "false" })?;
            }
            Event::Int(v) => {
                self.before_value()?;
                write!(self.out, "{v}")?;
            }
            Event::Uint(v) => {
                self.before_value()?;
                write!(self.out, "{v}")?;
            }
            Event::Int64(v) => {
                self.before_value()?;
                write!(self.out, "{v}")?;
            }
            Event::Uint64(v) => {
                self.before_value()?;
                write!(self.out, "{v}")?;
            }
            Event::Double(v) => {
                if !v.is_finite() {
                    return Err(WriteError::NonFiniteNumber);
                }
                self.before_value()?;
                write_double(v, &mut *self.out)?;
            }
            Event::String(s) => {
                self.before_value()?;
                self.out.write_char('"')?;
                write_escaped_string(s, &mut *self.out)?;
                self.out.write_char('"')?;
            }
            Event::Key(k) => self.write_key(k)?,
            Event::StartObject => self.open(Container::Object)?,
            Event::EndObject(_) => self.close(Container::Object)?,
            Event::StartArray => self.open(Container::Array)?,
            Event::EndArray(_) => self.close(Container::Array)?,
        }
        Ok(())
    }
}

impl<W: fmt::Write> EventSink for Writer<'_, W> {
    fn event(&mut self, event: Event<'_>) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.write_event(event) {
            Ok(()) => true,
            Err(error) => {
                self.error = Some(error);
                false
            }
        }
    }
}

fn finish<W: fmt::Write>(ok: bool, writer: &mut Writer<'_, W>) -> Result<(), WriteError> {
    if ok {
        Ok(())
    } else {
        Err(writer.take_error().unwrap_or(WriteError::Unrepresentable))
    }
}

/// Write `value` as compact JSON text.
///
/// # Errors
///
/// [`WriteError`] when the value has no JSON representation (a non-finite
/// double, an enum variant without an authored name).
pub fn to_string<T: Bind>(value: &T) -> Result<String, WriteError> {
    let mut out = String::new();
    let mut writer = Writer::compact(&mut out);
    let ok = value.emit(&mut writer);
    finish(ok, &mut writer)?;
    Ok(out)
}

/// Write `value` as pretty-printed JSON text.
///
/// # Errors
///
/// See [`to_string`].
pub fn to_string_pretty<T: Bind>(value: &T) -> Result<String, WriteError> {
    let mut out = String::new();
    let mut writer = Writer::pretty(&mut out);
    let ok = value.emit(&mut writer);
    finish(ok, &mut writer)?;
    Ok(out)
}

/// Materialize `value` as a DOM [`Value`].
///
/// # Errors
///
/// See [`to_string`].
pub fn to_value<T: Bind>(value: &T) -> Result<Value, WriteError> {
    let mut dom = Value::Null;
    let mut state = ValueState::default();
    let ok = {
        let mut sink = BindSink::new(&mut dom, &mut state);
        value.emit(&mut sink)
    };
    if ok && state.is_parsed() {
        Ok(dom)
    } else {
        Err(WriteError::Unrepresentable)
    }
}

#[cfg(feature = "std")]
struct IoAdapter<W: std::io::Write> {
    inner: W,
    error: Option<std::io::Error>,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> fmt::Write for IoAdapter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.inner.write_all(s.as_bytes()) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.error = Some(error);
                Err(fmt::Error)
            }
        }
    }
}

#[cfg(feature = "std")]
fn to_io<T: Bind, W: std::io::Write>(out: W, value: &T, pretty: bool) -> Result<(), WriteError> {
    let mut adapter = IoAdapter {
        inner: out,
        error: None,
    };
    let result = {
        let mut writer = if pretty {
            Writer::pretty(&mut adapter)
        } else {
            Writer::compact(&mut adapter)
        };
        let ok = value.emit(&mut writer);
        finish(ok, &mut writer)
    };
    match result {
        Ok(()) => Ok(()),
        // Surface the underlying I/O failure instead of the fmt shim.
        Err(WriteError::Fmt(_)) if adapter.error.is_some() => {
            Err(WriteError::Io(adapter.error.take().unwrap_or_else(|| {
                std::io::Error::other("write failed")
            })))
        }
        Err(error) => Err(error),
    }
}

/// Write `value` as compact JSON to an [`std::io::Write`].
///
/// # Errors
///
/// See [`to_string`]; I/O failures surface as [`WriteError::Io`].
#[cfg(feature = "std")]
pub fn to_writer<T: Bind, W: std::io::Write>(out: W, value: &T) -> Result<(), WriteError> {
    to_io(out, value, false)
}

/// Write `value` as pretty-printed JSON to an [`std::io::Write`].
///
/// # Errors
///
/// See [`to_writer`].
#[cfg(feature = "std")]
pub fn to_writer_pretty<T: Bind, W: std::io::Write>(out: W, value: &T) -> Result<(), WriteError> {
    to_io(out, value, true)
}

/// Write `value` as pretty-printed JSON to a file, creating or truncating
/// it.
///
/// # Errors
///
/// See [`to_writer`].
#[cfg(feature = "std")]
pub fn to_file<T: Bind, P: AsRef<std::path::Path>>(path: P, value: &T) -> Result<(), WriteError> {
    to_writer_pretty(std::fs::File::create(path)?, value)
}
