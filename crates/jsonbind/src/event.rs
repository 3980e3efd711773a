//! The SAX event protocol shared by every producer and consumer in the crate.
//!
//! A streaming source (the tokenizer, the DOM walker, or a handler writing
//! itself out) pushes [`Event`]s one at a time into an [`EventSink`]. A sink
//! returning `false` means "stop feeding me events"; the driver then extracts
//! structured errors from the sink.

/// One SAX token of the streaming JSON protocol.
///
/// Numeric values are split by width and signedness the way the tokenizer
/// classifies them: non-negative integers arrive as [`Event::Uint`] or
/// [`Event::Uint64`], negative integers as [`Event::Int`] or
/// [`Event::Int64`], and anything with a fraction or exponent as
/// [`Event::Double`]. Receiving adapters perform checked narrowing.
///
/// String payloads borrow from the producer for the duration of the call;
/// adapters copy what they keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// A JSON `null`.
    Null,
    /// A JSON `true` or `false`.
    Bool(bool),
    /// An integer that fits `i32`.
    Int(i32),
    /// A non-negative integer that fits `u32`.
    Uint(u32),
    /// An integer that fits `i64` but not `i32`.
    Int64(i64),
    /// A non-negative integer that fits `u64` but not `u32`.
    Uint64(u64),
    /// A number carrying a fraction or exponent, or too large for 64 bits.
    Double(f64),
    /// A complete string value.
    String(&'a str),
    /// Opens an object.
    StartObject,
    /// A member name inside an object.
    Key(&'a str),
    /// Closes an object; carries the member count.
    EndObject(usize),
    /// Opens an array.
    StartArray,
    /// Closes an array; carries the element count.
    EndArray(usize),
}

impl Event<'_> {
    /// The JSON-side type name used in mismatch errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::Null => "null",
            Event::Bool(_) => "bool",
            Event::Int(_) => "int",
            Event::Uint(_) => "uint",
            Event::Int64(_) => "int64",
            Event::Uint64(_) => "uint64",
            Event::Double(_) => "double",
            Event::String(_) => "string",
            Event::StartObject | Event::Key(_) | Event::EndObject(_) => "object",
            Event::StartArray | Event::EndArray(_) => "array",
        }
    }

    /// Whether this event is a scalar leaf, as counted by the resource limits.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Event::Null
                | Event::Bool(_)
                | Event::Int(_)
                | Event::Uint(_)
                | Event::Int64(_)
                | Event::Uint64(_)
                | Event::Double(_)
                | Event::String(_)
        )
    }
}

/// A push-based consumer of [`Event`]s.
///
/// Implemented by the typed adapters (through [`BindSink`](crate::BindSink)),
/// the JSON text [`Writer`](crate::Writer) and the DOM builder. Returning
/// `false` signals the producer to stop; the failure itself stays recorded on
/// the sink side.
pub trait EventSink {
    /// Consume one event. `false` stops the stream.
    fn event(&mut self, event: Event<'_>) -> bool;
}
