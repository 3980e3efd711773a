//! The binding core: the [`Bind`] trait implemented per shape, the
//! [`ParseState`] tree that carries parse progress, and the object-safe
//! [`DynBind`] mirror used at the handler-tree boundary.
//!
//! A "handler" in this crate is the pair of a bound value and its state: the
//! value is borrowed afresh for every event, the state persists across events
//! and owns the states of nested slots. This keeps every borrow into
//! caller-owned storage scoped to a single call while still allowing the
//! whole tree to be reset and reused between parses.

use alloc::{borrow::Cow, boxed::Box};
use core::any::Any;

use crate::{
    error::{Error, ErrorStack},
    event::{Event, EventSink},
    value::Value,
};

/// Transient parse progress for one slot of the target value graph.
///
/// States are plain `'static` data: depth counters, the active child, parsed
/// flags and the error record. They nest the same way the bound values nest.
pub trait ParseState: Any {
    /// Whether this slot has received a complete value since the last reset.
    fn is_parsed(&self) -> bool;

    /// Clear all transient state, preparing the slot for another parse.
    /// Child states are kept allocated and reset in place.
    fn reset(&mut self);

    /// Move this slot's error trace onto `stack`, innermost records first.
    /// Returns whether anything was recorded. The error is consumed.
    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool;

    /// Upcast for state recovery behind `dyn ParseState`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A type that can populate itself from a JSON event stream and emit itself
/// back out, one [`ParseState`] per slot.
///
/// Implementations exist for the primitive scalars, `String`, sequences,
/// fixed-size arrays, maps, tuples, `Option`/`Box`/`Rc`/`Arc` wrappers, the
/// DOM [`Value`], and — through [`ObjectBind`](crate::ObjectBind) and the
/// [`bind_object!`](crate::bind_object) macro — user structs.
pub trait Bind {
    /// The state tree for one binding of `Self`.
    type State: ParseState + Default;

    /// Consume one event. Returns `false` on failure; the failure is
    /// recorded in `state` and every later event is rejected until
    /// [`ParseState::reset`].
    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool;

    /// Emit this value as an event sequence. Returns `false` if the sink
    /// stopped or the value has no JSON representation.
    fn emit(&self, sink: &mut dyn EventSink) -> bool;

    /// Human-readable name of the bound type, used in error records.
    fn type_name() -> Cow<'static, str>;

    /// A JSON-Schema-shaped description of this slot's structure.
    fn schema(&self) -> Value;
}

/// Object-safe mirror of [`Bind`], used only where heterogeneous slots meet:
/// object members and tuple elements. Within a shape family dispatch stays
/// static.
pub trait DynBind {
    /// [`Bind::receive`] through an erased state. The state must be the one
    /// produced by [`DynBind::new_state`] on the same binding.
    fn receive_dyn(&mut self, state: &mut dyn ParseState, event: Event<'_>) -> bool;

    /// [`Bind::emit`].
    fn emit_dyn(&self, sink: &mut dyn EventSink) -> bool;

    /// A fresh state for this slot.
    fn new_state(&self) -> Box<dyn ParseState>;

    /// [`Bind::type_name`].
    fn type_name_dyn(&self) -> Cow<'static, str>;

    /// [`Bind::schema`].
    fn schema_dyn(&self) -> Value;
}

impl<T: Bind> DynBind for T {
    fn receive_dyn(&mut self, state: &mut dyn ParseState, event: Event<'_>) -> bool {
        let Some(state) = state.as_any_mut().downcast_mut::<T::State>() else {
            // A state paired with the wrong binding; nothing sensible can be
            // recorded on it, so just stop the stream.
            return false;
        };
        T::receive(self, state, event)
    }

    fn emit_dyn(&self, sink: &mut dyn EventSink) -> bool {
        T::emit(self, sink)
    }

    fn new_state(&self) -> Box<dyn ParseState> {
        Box::new(T::State::default())
    }

    fn type_name_dyn(&self) -> Cow<'static, str> {
        T::type_name()
    }

    fn schema_dyn(&self) -> Value {
        T::schema(self)
    }
}

/// State for single-event scalar slots (numbers, booleans, strings, enums).
#[derive(Debug, Default)]
pub struct ScalarState {
    pub(crate) parsed: bool,
    pub(crate) error: Option<Error>,
}

impl ScalarState {
    /// Terminal-error guard: once a record is set, further events are
    /// rejected until reset.
    pub(crate) fn blocked(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn fail(&mut self, error: Error) -> bool {
        self.error = Some(error);
        false
    }

    pub(crate) fn mismatch(&mut self, expected: Cow<'static, str>, actual: &'static str) -> bool {
        self.fail(Error::TypeMismatch { expected, actual })
    }

    pub(crate) fn out_of_range(
        &mut self,
        expected: Cow<'static, str>,
        actual: &'static str,
    ) -> bool {
        self.fail(Error::NumberOutOfRange { expected, actual })
    }
}

impl ParseState for ScalarState {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
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

/// Adapts a `(value, state)` binding into an [`EventSink`], so the tokenizer
/// and the DOM walker can drive any [`Bind`] implementation.
pub struct BindSink<'a, T: Bind> {
    value: &'a mut T,
    state: &'a mut T::State,
}

impl<'a, T: Bind> BindSink<'a, T> {
    /// Bind `value` and `state` together for the duration of one stream.
    pub fn new(value: &'a mut T, state: &'a mut T::State) -> Self {
        Self { value, state }
    }
}

impl<T: Bind> EventSink for BindSink<'_, T> {
    fn event(&mut self, event: Event<'_>) -> bool {
        T::receive(self.value, self.state, event)
    }
}
