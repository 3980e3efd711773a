//! Static-reflection JSON (de)serialization driven by a SAX event stream.
//!
//! A compile-time description of a value's shape — object members, element
//! types, scalar leaves, nullable wrappers, enums, tuples — drives a
//! 13-event streaming protocol that populates or emits the value without an
//! intermediate document. The [`Value`] DOM exists for the cases where one
//! is explicitly requested.
//!
//! # Reading and writing
//!
//! ```
//! #[derive(Default, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! jsonbind::bind_object!(Point { "x" => x, "y" => y });
//!
//! let mut point = Point::default();
//! jsonbind::from_str(r#"{"x":1,"y":2}"#, &mut point).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! assert_eq!(jsonbind::to_string(&point).unwrap(), r#"{"x":1,"y":2}"#);
//! ```
//!
//! # Failure reporting
//!
//! A failed read returns a [`ParseStatus`]: the position the stream stopped
//! at, the tokenizer's [`SyntaxError`] when the text was malformed, and an
//! innermost-first [`ErrorStack`] when the typed adapters rejected
//! well-formed input ("missing required field → object member `date` →
//! array element 0").

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod bind;
mod containers;
mod error;
mod event;
mod limits;
mod nullable;
mod options;
mod primitives;
mod reader;
mod schema;
mod value;
mod writer;

pub mod enums;
pub mod object;
pub mod tuples;

#[cfg(test)]
mod tests;

pub use bind::{Bind, BindSink, DynBind, ParseState, ScalarState};
pub use containers::{FixedState, MapState, SeqState};
pub use enums::EnumBind;
pub use error::{Error, ErrorStack, ParseStatus, SyntaxError, WriteError};
#[cfg(feature = "std")]
pub use error::ReadError;
pub use event::{Event, EventSink};
pub use limits::Limits;
pub use nullable::NullableState;
pub use object::{Flags, Member, ObjectBind, ObjectState};
pub use options::ReadOptions;
pub use reader::{from_str, from_str_with, from_value, read_str_with};
#[cfg(feature = "std")]
pub use reader::{from_file, from_reader};
pub use schema::export_schema;
pub use tuples::{TupleBind, TupleState};
pub use value::{Array, Map, Value, ValueState, emit_value};
pub use writer::{Writer, to_string, to_string_pretty, to_value};
#[cfg(feature = "std")]
pub use writer::{to_file, to_writer, to_writer_pretty};

/// Support items for the generated macro code. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use alloc::borrow::Cow;
}
