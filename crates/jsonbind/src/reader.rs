//! The JSON tokenizer and the top-level read drivers.
//!
//! The tokenizer turns one complete JSON text into the 13-event stream and
//! pushes it into an [`EventSink`]. It is iterative (an explicit frame stack,
//! no recursion), borrow-first for strings (a slice of the input when the
//! literal has no escapes, a reused scratch buffer otherwise), and tracks
//! line, column and byte offset for error reporting. Member and element
//! counts are maintained per open container and reported on the closing
//! events.
//!
//! Numbers classify the way the adapters expect: non-negative integers
//! become `Uint`/`Uint64`, negative integers `Int`/`Int64`, anything with a
//! fraction or exponent (or beyond 64 bits) `Double`.

use alloc::{string::String, vec::Vec};

use crate::{
    bind::{Bind, BindSink, ParseState},
    error::{ErrorStack, ParseStatus, SyntaxError},
    event::{Event, EventSink},
    limits::LimitSink,
    options::ReadOptions,
    value::{Value, emit_value},
};

/// Where and why a tokenize run stopped.
pub(crate) struct TokenizeFailure {
    /// `None` when the sink halted the stream.
    pub syntax: Option<SyntaxError>,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

struct Frame {
    object: bool,
    count: usize,
}

/// What the main loop expects to see next.
#[derive(Clone, Copy)]
enum Expect {
    Value,
    /// Value or `]` (immediately after `[`).
    FirstElement,
    /// Key or `}` (immediately after `{`).
    FirstKey,
    Key,
    Colon,
    CommaOrEnd,
}

enum Literal {
    Borrowed(usize, usize),
    Scratch,
}

struct Tokenizer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    column: usize,
    stack: Vec<Frame>,
    scratch: String,
}

type Step = Result<(), TokenizeFailure>;

impl<'s> Tokenizer<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            stack: Vec::new(),
            scratch: String::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Advance over one ASCII byte.
    fn bump(&mut self) {
        if self.src.as_bytes().get(self.pos) == Some(&b'\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    /// Advance over one character of unknown width.
    fn bump_char(&mut self) {
        if let Some(c) = self.peek_char() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Advance to `target`, counting columns over a span known to contain no
    /// newlines (string literal content, numbers).
    fn advance_to(&mut self, target: usize) {
        self.column += self.src[self.pos..target].chars().count();
        self.pos = target;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.bump();
        }
    }

    fn err(&self, syntax: SyntaxError) -> TokenizeFailure {
        TokenizeFailure {
            syntax: Some(syntax),
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn halt(&self) -> TokenizeFailure {
        TokenizeFailure {
            syntax: None,
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn emit(&self, sink: &mut dyn EventSink, event: Event<'_>) -> Step {
        if sink.event(event) { Ok(()) } else { Err(self.halt()) }
    }

    fn run(&mut self, sink: &mut dyn EventSink) -> Step {
        let mut expect = Expect::Value;
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Err(self.err(SyntaxError::UnexpectedEndOfInput));
            };
            match expect {
                Expect::Value | Expect::FirstElement => {
                    if matches!(expect, Expect::FirstElement) && c == b']' {
                        self.bump();
                        expect = self.close_array(sink)?;
                    } else {
                        expect = self.parse_value(sink, c)?;
                    }
                }
                Expect::FirstKey => match c {
                    b'}' => {
                        self.bump();
                        expect = self.close_object(sink)?;
                    }
                    b'"' => {
                        self.parse_key(sink)?;
                        expect = Expect::Colon;
                    }
                    _ => return Err(self.invalid_here()),
                },
                Expect::Key => match c {
                    b'"' => {
                        self.parse_key(sink)?;
                        expect = Expect::Colon;
                    }
                    _ => return Err(self.invalid_here()),
                },
                Expect::Colon => match c {
                    b':' => {
                        self.bump();
                        expect = Expect::Value;
                    }
                    _ => return Err(self.err(SyntaxError::Message("expected ':'"))),
                },
                Expect::CommaOrEnd => {
                    let object = self.stack.last().is_some_and(|f| f.object);
                    match c {
                        b',' => {
                            self.bump();
                            expect = if object { Expect::Key } else { Expect::Value };
                        }
                        b'}' if object => {
                            self.bump();
                            expect = self.close_object(sink)?;
                        }
                        b']' if !object => {
                            self.bump();
                            expect = self.close_array(sink)?;
                        }
                        _ => {
                            return Err(self
                                .err(SyntaxError::Message("expected ',' or a closing bracket")));
                        }
                    }
                }
            }
            if self.stack.is_empty() && matches!(expect, Expect::CommaOrEnd) {
                // The root value is complete.
                self.skip_whitespace();
                if self.pos < self.src.len() {
                    return Err(self.err(SyntaxError::TrailingCharacters));
                }
                return Ok(());
            }
        }
    }

    fn invalid_here(&self) -> TokenizeFailure {
        match self.peek_char() {
            Some(c) => self.err(SyntaxError::InvalidCharacter(c)),
            None => self.err(SyntaxError::UnexpectedEndOfInput),
        }
    }

    /// Transition after a completed value: bump the enclosing container's
    /// count, or finish the root.
    fn after_value(&mut self) -> Expect {
        if let Some(frame) = self.stack.last_mut() {
            frame.count += 1;
        }
        Expect::CommaOrEnd
    }

    fn close_object(&mut self, sink: &mut dyn EventSink) -> Result<Expect, TokenizeFailure> {
        let Some(frame) = self.stack.pop() else {
            return Err(self.err(SyntaxError::Message("unbalanced '}'")));
        };
        self.emit(sink, Event::EndObject(frame.count))?;
        Ok(self.after_value())
    }

    fn close_array(&mut self, sink: &mut dyn EventSink) -> Result<Expect, TokenizeFailure> {
        let Some(frame) = self.stack.pop() else {
            return Err(self.err(SyntaxError::Message("unbalanced ']'")));
        };
        self.emit(sink, Event::EndArray(frame.count))?;
        Ok(self.after_value())
    }

    fn parse_value(
        &mut self,
        sink: &mut dyn EventSink,
        c: u8,
    ) -> Result<Expect, TokenizeFailure> {
        match c {
            b'{' => {
                self.bump();
                self.emit(sink, Event::StartObject)?;
                self.stack.push(Frame {
                    object: true,
                    count: 0,
                });
                Ok(Expect::FirstKey)
            }
            b'[' => {
                self.bump();
                self.emit(sink, Event::StartArray)?;
                self.stack.push(Frame {
                    object: false,
                    count: 0,
                });
                Ok(Expect::FirstElement)
            }
            b'"' => {
                let literal = self.parse_string()?;
                let text = match literal {
                    Literal::Borrowed(start, end) => &self.src[start..end],
                    Literal::Scratch => self.scratch.as_str(),
                };
                if !sink.event(Event::String(text)) {
                    return Err(self.halt());
                }
                Ok(self.after_value())
            }
            b'-' | b'0'..=b'9' => {
                let event = self.parse_number()?;
                self.emit(sink, event)?;
                Ok(self.after_value())
            }
            b't' => {
                self.expect_literal("true")?;
                self.emit(sink, Event::Bool(true))?;
                Ok(self.after_value())
            }
            b'f' => {
                self.expect_literal("false")?;
                self.emit(sink, Event::Bool(false))?;
                Ok(self.after_value())
            }
            b'n' => {
                self.expect_literal("null")?;
                self.emit(sink, Event::Null)?;
                Ok(self.after_value())
            }
            _ => Err(self.invalid_here()),
        }
    }

    fn parse_key(&mut self, sink: &mut dyn EventSink) -> Step {
        let literal = self.parse_string()?;
        let text = match literal {
            Literal::Borrowed(start, end) => &self.src[start..end],
            Literal::Scratch => self.scratch.as_str(),
        };
        if !sink.event(Event::Key(text)) {
            return Err(self.halt());
        }
        Ok(())
    }

    fn expect_literal(&mut self, literal: &'static str) -> Step {
        if self.src[self.pos..].starts_with(literal) {
            for _ in 0..literal.len() {
                self.bump();
            }
            Ok(())
        } else {
            Err(self.invalid_here())
        }
    }

    /// Parse a string literal, positioned on the opening quote. Returns a
    /// borrowed span when the content has no escapes, otherwise the decoded
    /// content lives in `self.scratch`.
    fn parse_string(&mut self) -> Result<Literal, TokenizeFailure> {
        self.bump();
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut i = self.pos;
        loop {
            let Some(&b) = bytes.get(i) else {
                self.advance_to(i);
                return Err(self.err(SyntaxError::UnexpectedEndOfInput));
            };
            match b {
                b'"' => {
                    self.advance_to(i);
                    self.bump();
                    return Ok(Literal::Borrowed(start, i));
                }
                b'\\' => break,
                0x00..=0x1F => {
                    self.advance_to(i);
                    return Err(self.invalid_here());
                }
                _ => i += 1,
            }
        }
        // Escape found: decode into the scratch buffer from here on.
        self.scratch.clear();
        self.scratch.push_str(&self.src[start..i]);
        self.advance_to(i);
        loop {
            let Some(b) = self.peek() else {
                return Err(self.err(SyntaxError::UnexpectedEndOfInput));
            };
            match b {
                b'"' => {
                    self.bump();
                    return Ok(Literal::Scratch);
                }
                b'\\' => {
                    self.bump();
                    self.parse_escape()?;
                }
                0x00..=0x1F => return Err(self.invalid_here()),
                _ => {
                    let Some(c) = self.peek_char() else {
                        return Err(self.err(SyntaxError::UnexpectedEndOfInput));
                    };
                    self.scratch.push(c);
                    self.bump_char();
                }
            }
        }
    }

    fn parse_escape(&mut self) -> Step {
        let Some(b) = self.peek() else {
            return Err(self.err(SyntaxError::UnexpectedEndOfInput));
        };
        let simple = match b {
            b'"' => Some('"'),
            b'\\' => Some('\\'),
            b'/' => Some('/'),
            b'b' => Some('\u{8}'),
            b'f' => Some('\u{c}'),
            b'n' => Some('\n'),
            b'r' => Some('\r'),
            b't' => Some('\t'),
            b'u' => None,
            _ => return Err(self.invalid_here()),
        };
        if let Some(c) = simple {
            self.scratch.push(c);
            self.bump();
            return Ok(());
        }
        self.bump();
        let unit = self.read_hex4()?;
        let code = if (0xD800..=0xDBFF).contains(&unit) {
            // High surrogate: a low surrogate escape must follow.
            if self.peek() != Some(b'\\') {
                return Err(self.err(SyntaxError::InvalidUnicodeEscapeSequence(unit)));
            }
            self.bump();
            if self.peek() != Some(b'u') {
                return Err(self.err(SyntaxError::InvalidUnicodeEscapeSequence(unit)));
            }
            self.bump();
            let low = self.read_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.err(SyntaxError::InvalidUnicodeEscapeSequence(low)));
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        } else {
            unit
        };
        match char::from_u32(code) {
            Some(c) => {
                self.scratch.push(c);
                Ok(())
            }
            None => Err(self.err(SyntaxError::InvalidUnicodeEscapeSequence(code))),
        }
    }

    /// Four hexadecimal digits of a `\u` escape.
    fn read_hex4(&mut self) -> Result<u32, TokenizeFailure> {
        let mut acc = 0u32;
        for _ in 0..4 {
            let Some(c) = self.peek_char() else {
                return Err(self.err(SyntaxError::UnexpectedEndOfInput));
            };
            let digit = match c {
                '0'..='9' => (c as u32) - ('0' as u32),
                'a'..='f' => (c as u32) - ('a' as u32) + 10,
                'A'..='F' => (c as u32) - ('A' as u32) + 10,
                _ => return Err(self.err(SyntaxError::InvalidUnicodeEscapeChar(c))),
            };
            acc = (acc << 4) | digit;
            self.bump();
        }
        Ok(acc)
    }

    /// Parse a number, positioned on `-` or a digit.
    fn parse_number(&mut self) -> Result<Event<'s>, TokenizeFailure> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        let negative = bytes.get(i) == Some(&b'-');
        if negative {
            i += 1;
        }
        let digits_start = i;
        while matches!(bytes.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == digits_start {
            self.advance_to(i);
            return Err(self.invalid_here());
        }
        if bytes[digits_start] == b'0' && i > digits_start + 1 {
            self.advance_to(digits_start + 1);
            return Err(self.err(SyntaxError::Message("leading zeros are not allowed")));
        }
        let mut is_double = false;
        if bytes.get(i) == Some(&b'.') {
            is_double = true;
            i += 1;
            let frac_start = i;
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            if i == frac_start {
                self.advance_to(i);
                return Err(self.invalid_here());
            }
        }
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            is_double = true;
            i += 1;
            if matches!(bytes.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            let exp_start = i;
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            if i == exp_start {
                self.advance_to(i);
                return Err(self.invalid_here());
            }
        }
        let text = &self.src[start..i];
        self.advance_to(i);
        if !is_double {
            if let Ok(magnitude) = self.src[digits_start..i].parse::<u64>() {
                return Ok(Self::classify_integer(negative, magnitude, text)
                    .map_err(|e| self.err(e))?);
            }
            // Magnitude beyond 64 bits: fall through to the double path.
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Event::Double(value)),
            Ok(_) => Err(self.err(SyntaxError::NumberOverflow)),
            Err(_) => Err(self.err(SyntaxError::Message("invalid number"))),
        }
    }

    fn classify_integer(
        negative: bool,
        magnitude: u64,
        text: &str,
    ) -> Result<Event<'static>, SyntaxError> {
        if negative {
            if magnitude <= i64::MAX as u64 {
                let value = -(magnitude as i64);
                match i32::try_from(value) {
                    Ok(value) => Ok(Event::Int(value)),
                    Err(_) => Ok(Event::Int64(value)),
                }
            } else if magnitude == (i64::MAX as u64) + 1 {
                Ok(Event::Int64(i64::MIN))
            } else {
                // Falls outside i64: treat as a double if it is finite.
                match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Event::Double(value)),
                    _ => Err(SyntaxError::NumberOverflow),
                }
            }
        } else {
            match u32::try_from(magnitude) {
                Ok(value) => Ok(Event::Uint(value)),
                Err(_) => Ok(Event::Uint64(magnitude)),
            }
        }
    }
}

/// Tokenize `input` into `sink`.
pub(crate) fn tokenize(input: &str, sink: &mut dyn EventSink) -> Result<(), TokenizeFailure> {
    Tokenizer::new(input).run(sink)
}

/// Read one JSON text into `value` with default options.
///
/// The previous contents of `value` are fully overwritten along the paths
/// the input provides; containers are cleared when their opening event
/// arrives.
///
/// # Errors
///
/// [`ParseStatus`] carries the failure position plus either the tokenizer's
/// [`SyntaxError`] or the adapters' [`ErrorStack`].
pub fn from_str<T: Bind>(input: &str, value: &mut T) -> Result<(), ParseStatus> {
    from_str_with(input, value, &ReadOptions::default())
}

/// Read one JSON text into `value` with explicit [`ReadOptions`].
///
/// # Errors
///
/// See [`from_str`].
pub fn from_str_with<T: Bind>(
    input: &str,
    value: &mut T,
    options: &ReadOptions,
) -> Result<(), ParseStatus> {
    let mut state = T::State::default();
    read_str_with(input, value, &mut state, options)
}

/// Read one JSON text into `value` through a caller-owned state tree.
///
/// The state is reset on entry, so the same `(value, state)` pair can be
/// parsed into repeatedly without rebuilding nested state allocations.
///
/// # Errors
///
/// See [`from_str`].
pub fn read_str_with<T: Bind>(
    input: &str,
    value: &mut T,
    state: &mut T::State,
    options: &ReadOptions,
) -> Result<(), ParseStatus> {
    state.reset();
    let failure = {
        let mut bind = BindSink::new(value, state);
        let mut guard = LimitSink::new(&mut bind, options.limits);
        match tokenize(input, &mut guard) {
            Ok(()) => None,
            Err(failure) => Some((failure, guard.take_error())),
        }
    };
    match failure {
        None => Ok(()),
        Some((failure, guard_error)) => {
            let mut errors = ErrorStack::new();
            state.collect_errors(&mut errors);
            if let Some(error) = guard_error {
                errors.push(error);
            }
            Err(ParseStatus {
                offset: failure.offset,
                line: failure.line,
                column: failure.column,
                syntax: failure.syntax,
                errors,
            })
        }
    }
}

/// Populate `value` from an existing DOM [`Value`].
///
/// # Errors
///
/// [`ParseStatus`] with a zero position and the adapters' [`ErrorStack`].
pub fn from_value<T: Bind>(dom: &Value, value: &mut T) -> Result<(), ParseStatus> {
    let mut state = T::State::default();
    let ok = {
        let mut bind = BindSink::new(value, &mut state);
        emit_value(dom, &mut bind)
    };
    if ok {
        Ok(())
    } else {
        let mut errors = ErrorStack::new();
        state.collect_errors(&mut errors);
        Err(ParseStatus {
            offset: 0,
            line: 0,
            column: 0,
            syntax: None,
            errors,
        })
    }
}

/// Read one JSON text from `reader` into `value`.
///
/// # Errors
///
/// [`ReadError`](crate::ReadError) wraps either the I/O failure or the
/// [`ParseStatus`].
#[cfg(feature = "std")]
pub fn from_reader<T: Bind, R: std::io::Read>(
    mut reader: R,
    value: &mut T,
) -> Result<(), crate::error::ReadError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    from_str(&input, value)?;
    Ok(())
}

/// Read one JSON file into `value`.
///
/// # Errors
///
/// See [`from_reader`].
#[cfg(feature = "std")]
pub fn from_file<T: Bind, P: AsRef<std::path::Path>>(
    path: P,
    value: &mut T,
) -> Result<(), crate::error::ReadError> {
    from_reader(std::fs::File::open(path)?, value)
}
