//! Tuple adapters: fixed heterogeneous JSON arrays.
//!
//! A tuple parses like a fixed-size array whose slots have different shapes;
//! dispatch runs through the same erased-member machinery as objects, with
//! the element index as the key.

use alloc::{borrow::Cow, boxed::Box, vec::Vec};
use core::any::Any;

use crate::{
    bind::{Bind, DynBind, ParseState},
    error::{Error, ErrorStack},
    event::{Event, EventSink},
    value::{Map, Value},
};

/// Index-based projections for a tuple's elements.
pub trait TupleBind {
    /// Tuple arity.
    const LEN: usize;

    /// Mutable access to the element at `index`.
    fn elem_mut(&mut self, index: usize) -> &mut dyn DynBind;

    /// Shared access to the element at `index`.
    fn elem_ref(&self, index: usize) -> &dyn DynBind;
}

/// State for one tuple binding.
#[derive(Default)]
pub struct TupleState {
    elems: Vec<Box<dyn ParseState>>,
    depth: u32,
    index: usize,
    seen: usize,
    skip_depth: u32,
    parsed: bool,
    error: Option<Error>,
}

impl core::fmt::Debug for TupleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TupleState")
            .field("depth", &self.depth)
            .field("index", &self.index)
            .field("seen", &self.seen)
            .field("parsed", &self.parsed)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl ParseState for TupleState {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
        for elem in &mut self.elems {
            elem.reset();
        }
        self.depth = 0;
        self.index = 0;
        self.seen = 0;
        self.skip_depth = 0;
        self.parsed = false;
        self.error = None;
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        match self.error.take() {
            Some(error) => {
                if let Some(elem) = self.elems.get_mut(self.index) {
                    elem.collect_errors(stack);
                }
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

fn tuple_close(state: &mut TupleState, expected: usize) -> bool {
    state.depth = 0;
    if state.seen == expected {
        state.parsed = true;
        true
    } else {
        state.error = Some(Error::ArrayLengthMismatch {
            expected,
            actual: state.seen,
        });
        false
    }
}

/// Drive one event into a tuple binding. Forward [`Bind::receive`] here.
pub fn receive_tuple<T: TupleBind>(value: &mut T, state: &mut TupleState, event: Event<'_>) -> bool {
    if state.error.is_some() {
        return false;
    }
    if state.elems.len() != T::LEN {
        state.elems = (0..T::LEN).map(|i| value.elem_mut(i).new_state()).collect();
    }
    match event {
        Event::StartArray if state.depth == 0 => {
            state.depth = 1;
            state.index = 0;
            state.seen = 0;
            state.skip_depth = 0;
            true
        }
        other if state.depth == 0 => {
            state.error = Some(Error::TypeMismatch {
                expected: tuple_name(T::LEN),
                actual: other.kind_name(),
            });
            false
        }
        other if state.index >= T::LEN => match other {
            Event::StartObject | Event::StartArray => {
                state.skip_depth += 1;
                true
            }
            Event::EndArray(_) if state.skip_depth == 0 => tuple_close(state, T::LEN),
            Event::EndObject(_) | Event::EndArray(_) => {
                if state.skip_depth > 0 {
                    state.skip_depth -= 1;
                    if state.skip_depth == 0 {
                        state.seen += 1;
                    }
                }
                true
            }
            Event::Key(_) => true,
            _ => {
                if state.skip_depth == 0 {
                    state.seen += 1;
                }
                true
            }
        },
        Event::EndArray(_) if state.depth == 1 => tuple_close(state, T::LEN),
        event => {
            match event {
                Event::StartArray => state.depth += 1,
                Event::EndArray(_) => state.depth -= 1,
                _ => {}
            }
            let index = state.index;
            if !value
                .elem_mut(index)
                .receive_dyn(state.elems[index].as_mut(), event)
            {
                state.error = Some(Error::ArrayElement { index });
                return false;
            }
            if state.depth == 1 && state.elems[index].is_parsed() {
                state.index += 1;
                state.seen += 1;
            }
            true
        }
    }
}

/// Emit a tuple binding as a JSON array. Forward [`Bind::emit`] here.
pub fn emit_tuple<T: TupleBind>(value: &T, sink: &mut dyn EventSink) -> bool {
    if !sink.event(Event::StartArray) {
        return false;
    }
    for index in 0..T::LEN {
        if !value.elem_ref(index).emit_dyn(sink) {
            return false;
        }
    }
    sink.event(Event::EndArray(T::LEN))
}

/// Build the JSON-Schema description of a tuple binding. Forward
/// [`Bind::schema`] here.
pub fn tuple_schema<T: TupleBind>(value: &T) -> Value {
    let items: Vec<Value> = (0..T::LEN).map(|i| value.elem_ref(i).schema_dyn()).collect();
    let mut map = Map::new();
    map.insert("type".into(), Value::String("array".into()));
    map.insert("items".into(), Value::Array(items));
    map.insert("minItems".into(), Value::Uint(T::LEN as u64));
    map.insert("maxItems".into(), Value::Uint(T::LEN as u64));
    Value::Object(map)
}

fn tuple_name(len: usize) -> Cow<'static, str> {
    Cow::Owned(alloc::format!("tuple of {len}"))
}

macro_rules! impl_tuple {
    ($len:expr => $($idx:tt $name:ident),+) => {
        impl<$($name: Bind),+> TupleBind for ($($name,)+) {
            const LEN: usize = $len;

            fn elem_mut(&mut self, index: usize) -> &mut dyn DynBind {
                match index {
                    $($idx => &mut self.$idx,)+
                    _ => panic!("tuple element index out of range"),
                }
            }

            fn elem_ref(&self, index: usize) -> &dyn DynBind {
                match index {
                    $($idx => &self.$idx,)+
                    _ => panic!("tuple element index out of range"),
                }
            }
        }

        impl<$($name: Bind),+> Bind for ($($name,)+) {
            type State = TupleState;

            fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
                receive_tuple(self, state, event)
            }

            fn emit(&self, sink: &mut dyn EventSink) -> bool {
                emit_tuple(self, sink)
            }

            fn type_name() -> Cow<'static, str> {
                tuple_name($len)
            }

            fn schema(&self) -> Value {
                tuple_schema(self)
            }
        }
    };
}

impl_tuple!(2 => 0 A, 1 B);
impl_tuple!(3 => 0 A, 1 B, 2 C);
impl_tuple!(4 => 0 A, 1 B, 2 C, 3 D);
