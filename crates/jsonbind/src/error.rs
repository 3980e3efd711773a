//! Structured errors for binding failures, tokenizer failures and writing
//! failures.
//!
//! Binding errors form an [`ErrorStack`]: an innermost-first trace from the
//! failure site up to the root, where the wrapper records ([`Error::ObjectMember`],
//! [`Error::ArrayElement`]) only annotate *where* a nested fault occurred.
//! Tokenizer-level [`SyntaxError`]s are a separate class carried in
//! [`ParseStatus`] next to the stack, never inside it.

use alloc::{
    string::String,
    vec::Vec,
};
use core::fmt;

use thiserror::Error;

fn join_quoted(names: &[&'static str]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('"');
        out.push_str(name);
        out.push('"');
    }
    out
}

/// One record of a binding failure.
///
/// The set is closed: the first group describes actual faults, the two path
/// records annotate the location of a nested fault, and the last two are
/// raised by the resource limits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The event's JSON type cannot populate the bound target at all.
    #[error("type mismatch: expected \"{expected}\" but got \"{actual}\"")]
    TypeMismatch {
        /// Name of the bound target type.
        expected: alloc::borrow::Cow<'static, str>,
        /// JSON-side name of the offending event.
        actual: &'static str,
    },
    /// A numeric event whose value does not fit the bound target exactly.
    #[error("number out of range: expected \"{expected}\" but the value requires \"{actual}\"")]
    NumberOutOfRange {
        /// Name of the bound target type.
        expected: alloc::borrow::Cow<'static, str>,
        /// JSON-side name of the event that carried the value.
        actual: &'static str,
    },
    /// Required object members absent at `EndObject` time, all of them in
    /// declaration order.
    #[error("missing required field(s): {}", join_quoted(.names))]
    MissingRequired {
        /// Names of every missing member.
        names: Vec<&'static str>,
    },
    /// A key not present in the member table, under `DISALLOW_UNKNOWN_KEY`.
    #[error("unknown field \"{name}\"")]
    UnknownField {
        /// The offending key.
        name: String,
    },
    /// A key repeated for an already-parsed member, without
    /// `ALLOW_DUPLICATE_KEY`.
    #[error("duplicate key \"{name}\"")]
    DuplicateKey {
        /// The repeated key.
        name: String,
    },
    /// A fixed-size array or tuple fed the wrong number of elements.
    #[error("array length mismatch: expected {expected} but got {actual}")]
    ArrayLengthMismatch {
        /// Bound length.
        expected: usize,
        /// Observed element count.
        actual: usize,
    },
    /// A string with no entry in the enum's authored name list.
    #[error("invalid enum value \"{value}\"")]
    InvalidEnum {
        /// The observed string.
        value: String,
    },
    /// Path record: the fault occurred inside the named object member.
    #[error("error at object member \"{name}\"")]
    ObjectMember {
        /// Member name.
        name: String,
    },
    /// Path record: the fault occurred inside the element at this index.
    #[error("error at array element with index {index}")]
    ArrayElement {
        /// Zero-based element index.
        index: usize,
    },
    /// The event stream violated the structural protocol (e.g. a `Key`
    /// outside any object). Well-formed tokenizer output never produces this.
    #[error("corrupted event structure")]
    CorruptedStructure,
    /// The configured maximum nesting depth was exceeded.
    #[error("too many levels of recursion (limit {limit})")]
    RecursionTooDeep {
        /// The configured depth cap.
        limit: u32,
    },
    /// The configured maximum scalar leaf count was exceeded.
    #[error("too many leaves (limit {limit})")]
    TooManyLeaves {
        /// The configured leaf cap.
        limit: u64,
    },
}

/// An ordered, innermost-first trace of [`Error`] records.
///
/// Read front to back it forms a path from the deepest failure to the root:
/// "missing required field → object member `date` → array element 0".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorStack {
    records: Vec<Error>,
}

impl ErrorStack {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Children push before their parents, so appending
    /// preserves innermost-first order.
    pub fn push(&mut self, record: Error) {
        self.records.push(record);
    }

    /// Records, innermost first.
    #[must_use]
    pub fn records(&self) -> &[Error] {
        &self.records
    }

    /// Iterate innermost first.
    pub fn iter(&self) -> core::slice::Iter<'_, Error> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a ErrorStack {
    type Item = &'a Error;
    type IntoIter = core::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "(*) {record}")?;
        }
        Ok(())
    }
}

/// A failure of the tokenizer itself: the input is not well-formed JSON text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that cannot appear at this position.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A non-hexadecimal character inside a `\u` escape.
    #[error("invalid unicode escape sequence at character: '{0}'")]
    InvalidUnicodeEscapeChar(char),
    /// A `\u` escape that decodes to no Unicode scalar value (e.g. a lone
    /// surrogate).
    #[error("invalid unicode escape sequence \\u{0:X}")]
    InvalidUnicodeEscapeSequence(u32),
    /// A number too large for an `f64`.
    #[error("number overflow")]
    NumberOverflow,
    /// The input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Non-whitespace input after the root value.
    #[error("unexpected trailing characters")]
    TrailingCharacters,
    /// A structural expectation stated in prose.
    #[error("{0}")]
    Message(&'static str),
}

/// The outcome of a failed read: where it stopped, why the tokenizer stopped
/// (if it was a syntax problem), and the binding trace (if the receiving
/// adapters rejected the input).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseStatus {
    /// Byte offset of the failure. Zero for DOM-bridge reads.
    pub offset: usize,
    /// One-based line of the failure, zero for DOM-bridge reads.
    pub line: usize,
    /// One-based column of the failure, zero for DOM-bridge reads.
    pub column: usize,
    /// The tokenizer-level error, absent when the adapters stopped the
    /// stream.
    pub syntax: Option<SyntaxError>,
    /// The binding trace, innermost first. Empty for pure syntax errors.
    pub errors: ErrorStack,
}

impl ParseStatus {
    /// True when any failure is recorded. A default-constructed status has
    /// none.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.syntax.is_some() || !self.errors.is_empty()
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.syntax {
            Some(syntax) => write!(
                f,
                "parsing failed at line {} column {} (offset {}): {syntax}",
                self.line, self.column, self.offset
            )?,
            None => write!(
                f,
                "parsing failed at line {} column {} (offset {}): input rejected by the receiving type",
                self.line, self.column, self.offset
            )?,
        }
        if !self.errors.is_empty() {
            write!(f, "\ntrace back (innermost first):\n{}", self.errors)?;
        }
        Ok(())
    }
}

impl core::error::Error for ParseStatus {}

/// A failure while emitting a value as JSON.
#[derive(Error, Debug)]
pub enum WriteError {
    /// A `NaN` or infinite double has no JSON representation.
    #[error("number is not finite")]
    NonFiniteNumber,
    /// The value cannot be represented, e.g. an enum with no authored name
    /// for the current variant.
    #[error("value has no JSON representation")]
    Unrepresentable,
    /// The underlying formatter failed.
    #[error(transparent)]
    Fmt(#[from] core::fmt::Error),
    /// The underlying I/O stream failed.
    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A failure while reading from a stream or file: either the I/O layer or the
/// parse itself.
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum ReadError {
    /// The input could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseStatus),
}
