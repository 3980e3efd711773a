//! Nullable and ownership-wrapper adapters.
//!
//! [`Option`] carries the null semantics: `null` at the top of the slot
//! clears it, the first non-null event lazily inserts a default inner value
//! and forwards. `Box`, `Rc` and `Arc` are pure delegating indirections —
//! `Option<Box<T>>` composes into the owned indirection that breaks
//! recursive type graphs, the same role the original nullable pointer
//! adapters played.

use alloc::{borrow::Cow, boxed::Box, format, rc::Rc, sync::Arc, vec};
use core::any::Any;

use crate::{
    bind::{Bind, ParseState},
    error::ErrorStack,
    event::{Event, EventSink},
    value::{Map, Value},
};

/// State for an [`Option`] binding: the inner state plus depth bookkeeping
/// that distinguishes a top-level `null` from nulls nested inside the inner
/// value.
#[derive(Debug)]
pub struct NullableState<S: ParseState> {
    depth: u32,
    set_null: bool,
    inner: S,
}

impl<S: ParseState + Default> Default for NullableState<S> {
    fn default() -> Self {
        Self {
            depth: 0,
            set_null: false,
            inner: S::default(),
        }
    }
}

impl<S: ParseState + Default> ParseState for NullableState<S> {
    fn is_parsed(&self) -> bool {
        self.set_null || self.inner.is_parsed()
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.set_null = false;
        self.inner.reset();
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        self.inner.collect_errors(stack)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    type State = NullableState<T::State>;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        match event {
            Event::Null if state.depth == 0 => {
                *self = None;
                state.set_null = true;
                state.inner.reset();
                true
            }
            event => {
                match event {
                    Event::StartObject | Event::StartArray => state.depth += 1,
                    Event::EndObject(_) | Event::EndArray(_) => {
                        state.depth = state.depth.saturating_sub(1);
                    }
                    _ => {}
                }
                state.set_null = false;
                let inner = self.get_or_insert_with(T::default);
                T::receive(inner, &mut state.inner, event)
            }
        }
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        match self {
            None => sink.event(Event::Null),
            Some(inner) => inner.emit(sink),
        }
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("nullable {}", T::type_name()))
    }

    fn schema(&self) -> Value {
        let inner = match self {
            Some(value) => value.schema(),
            None => T::default().schema(),
        };
        let mut null = Map::new();
        null.insert("type".into(), Value::String("null".into()));
        let mut map = Map::new();
        map.insert("anyOf".into(), Value::Array(vec![Value::Object(null), inner]));
        Value::Object(map)
    }
}

impl<T: Bind> Bind for Box<T> {
    type State = T::State;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        T::receive(&mut **self, state, event)
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        (**self).emit(sink)
    }

    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn schema(&self) -> Value {
        (**self).schema()
    }
}

impl<T: Bind + Clone> Bind for Rc<T> {
    type State = T::State;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        T::receive(Rc::make_mut(self), state, event)
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        (**self).emit(sink)
    }

    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn schema(&self) -> Value {
        (**self).schema()
    }
}

impl<T: Bind + Clone> Bind for Arc<T> {
    type State = T::State;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        T::receive(Arc::make_mut(self), state, event)
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        (**self).emit(sink)
    }

    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn schema(&self) -> Value {
        (**self).schema()
    }
}
