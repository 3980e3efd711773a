//! Generic adapters for sequence containers, fixed-size arrays and
//! string-keyed maps.
//!
//! Sequences keep one reusable element state and a depth counter, so
//! sequences-of-sequences work without per-element allocation: each element
//! is appended as its default when its first event arrives and completed in
//! place. The container is cleared on the opening `StartArray` so a reused
//! binding fully overwrites previous contents.

use alloc::{
    borrow::Cow,
    collections::{BTreeMap, VecDeque},
    format,
    string::String,
    vec::Vec,
};
use core::any::Any;

use crate::{
    bind::{Bind, ParseState},
    error::{Error, ErrorStack},
    event::{Event, EventSink},
    value::{Map, Value},
};

/// State for growable sequences ([`Vec`], [`VecDeque`]).
#[derive(Debug)]
pub struct SeqState<S: ParseState> {
    depth: u32,
    element_active: bool,
    elem: S,
    parsed: bool,
    error: Option<Error>,
}

impl<S: ParseState + Default> Default for SeqState<S> {
    fn default() -> Self {
        Self {
            depth: 0,
            element_active: false,
            elem: S::default(),
            parsed: false,
            error: None,
        }
    }
}

impl<S: ParseState + Default> ParseState for SeqState<S> {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.element_active = false;
        self.elem.reset();
        self.parsed = false;
        self.error = None;
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        match self.error.take() {
            Some(error) => {
                self.elem.collect_errors(stack);
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

/// The container operations the sequence driver needs.
trait Sequence {
    type Elem: Bind + Default;

    fn clear(&mut self);
    fn len(&self) -> usize;
    fn append_default(&mut self);
    fn last_elem(&mut self) -> Option<&mut Self::Elem>;
    fn seq_type_name() -> Cow<'static, str>;
}

impl<T: Bind + Default> Sequence for Vec<T> {
    type Elem = T;

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn append_default(&mut self) {
        self.push(T::default());
    }

    fn last_elem(&mut self) -> Option<&mut T> {
        self.last_mut()
    }

    fn seq_type_name() -> Cow<'static, str> {
        <Self as Bind>::type_name()
    }
}

impl<T: Bind + Default> Sequence for VecDeque<T> {
    type Elem = T;

    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn append_default(&mut self) {
        self.push_back(T::default());
    }

    fn last_elem(&mut self) -> Option<&mut T> {
        self.back_mut()
    }

    fn seq_type_name() -> Cow<'static, str> {
        <Self as Bind>::type_name()
    }
}

fn seq_forward<C: Sequence>(
    container: &mut C,
    state: &mut SeqState<<C::Elem as Bind>::State>,
    event: Event<'_>,
) -> bool {
    if !state.element_active {
        container.append_default();
        state.element_active = true;
    }
    let index = container.len().saturating_sub(1);
    let Some(elem) = container.last_elem() else {
        state.error = Some(Error::CorruptedStructure);
        return false;
    };
    if !C::Elem::receive(elem, &mut state.elem, event) {
        state.error = Some(Error::ArrayElement { index });
        return false;
    }
    if state.depth == 1 && state.elem.is_parsed() {
        state.element_active = false;
        state.elem.reset();
    }
    true
}

fn seq_receive<C: Sequence>(
    container: &mut C,
    state: &mut SeqState<<C::Elem as Bind>::State>,
    event: Event<'_>,
) -> bool {
    if state.error.is_some() {
        return false;
    }
    match event {
        Event::StartArray if state.depth == 0 => {
            container.clear();
            state.depth = 1;
            state.element_active = false;
            state.elem.reset();
            true
        }
        Event::EndArray(_) if state.depth == 1 => {
            state.depth = 0;
            state.parsed = true;
            true
        }
        other if state.depth == 0 => {
            state.error = Some(Error::TypeMismatch {
                expected: C::seq_type_name(),
                actual: other.kind_name(),
            });
            false
        }
        Event::StartArray => {
            state.depth += 1;
            seq_forward(container, state, event)
        }
        Event::EndArray(_) => {
            state.depth -= 1;
            seq_forward(container, state, event)
        }
        other => seq_forward(container, state, other),
    }
}

fn seq_emit<'e, I, T>(elements: I, len: usize, sink: &mut dyn EventSink) -> bool
where
    I: IntoIterator<Item = &'e T>,
    T: Bind + 'e,
{
    if !sink.event(Event::StartArray) {
        return false;
    }
    for element in elements {
        if !element.emit(sink) {
            return false;
        }
    }
    sink.event(Event::EndArray(len))
}

fn array_schema(items: Value) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::String("array".into()));
    map.insert("items".into(), items);
    Value::Object(map)
}

impl<T: Bind + Default> Bind for Vec<T> {
    type State = SeqState<T::State>;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        seq_receive(self, state, event)
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        seq_emit(self.iter(), self.len(), sink)
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("array of {}", T::type_name()))
    }

    fn schema(&self) -> Value {
        array_schema(
            self.first()
                .map_or_else(|| T::default().schema(), |elem| elem.schema()),
        )
    }
}

impl<T: Bind + Default> Bind for VecDeque<T> {
    type State = SeqState<T::State>;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        seq_receive(self, state, event)
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        seq_emit(self.iter(), self.len(), sink)
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("array of {}", T::type_name()))
    }

    fn schema(&self) -> Value {
        array_schema(
            self.front()
                .map_or_else(|| T::default().schema(), |elem| elem.schema()),
        )
    }
}

/// State for fixed-size arrays: elements parse in place by index, surplus
/// elements are counted (not stored) so the final
/// [`Error::ArrayLengthMismatch`] reports the full observed count.
#[derive(Debug)]
pub struct FixedState<S: ParseState> {
    depth: u32,
    index: usize,
    seen: usize,
    skip_depth: u32,
    elem: S,
    parsed: bool,
    error: Option<Error>,
}

impl<S: ParseState + Default> Default for FixedState<S> {
    fn default() -> Self {
        Self {
            depth: 0,
            index: 0,
            seen: 0,
            skip_depth: 0,
            elem: S::default(),
            parsed: false,
            error: None,
        }
    }
}

impl<S: ParseState + Default> ParseState for FixedState<S> {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.index = 0;
        self.seen = 0;
        self.skip_depth = 0;
        self.elem.reset();
        self.parsed = false;
        self.error = None;
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        match self.error.take() {
            Some(error) => {
                self.elem.collect_errors(stack);
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

fn fixed_close<S: ParseState + Default>(state: &mut FixedState<S>, expected: usize) -> bool {
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

impl<T: Bind + Default, const N: usize> Bind for [T; N] {
    type State = FixedState<T::State>;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        if state.error.is_some() {
            return false;
        }
        match event {
            Event::StartArray if state.depth == 0 => {
                state.depth = 1;
                state.index = 0;
                state.seen = 0;
                state.skip_depth = 0;
                state.elem.reset();
                true
            }
            other if state.depth == 0 => {
                state.error = Some(Error::TypeMismatch {
                    expected: Self::type_name(),
                    actual: other.kind_name(),
                });
                false
            }
            // Surplus elements: track nesting and count completions without
            // storing anything.
            other if state.index >= N => match other {
                Event::StartObject | Event::StartArray => {
                    state.skip_depth += 1;
                    true
                }
                Event::EndArray(_) if state.skip_depth == 0 => fixed_close(state, N),
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
            Event::EndArray(_) if state.depth == 1 => fixed_close(state, N),
            event => {
                match event {
                    Event::StartArray => state.depth += 1,
                    Event::EndArray(_) => state.depth -= 1,
                    _ => {}
                }
                let index = state.index;
                if !T::receive(&mut self[index], &mut state.elem, event) {
                    state.error = Some(Error::ArrayElement { index });
                    return false;
                }
                if state.depth == 1 && state.elem.is_parsed() {
                    state.index += 1;
                    state.seen += 1;
                    state.elem.reset();
                }
                true
            }
        }
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        seq_emit(self.iter(), N, sink)
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("array of {} with length {N}", T::type_name()))
    }

    fn schema(&self) -> Value {
        let items = self
            .first()
            .map_or_else(|| T::default().schema(), |elem| elem.schema());
        let mut map = Map::new();
        map.insert("type".into(), Value::String("array".into()));
        map.insert("items".into(), items);
        map.insert("minItems".into(), Value::Uint(N as u64));
        map.insert("maxItems".into(), Value::Uint(N as u64));
        Value::Object(map)
    }
}

/// State for string-keyed maps: an object with arbitrary keys sharing one
/// reusable value state. Duplicate keys follow map semantics (last wins).
#[derive(Debug)]
pub struct MapState<S: ParseState> {
    depth: u32,
    key: Option<String>,
    elem: S,
    parsed: bool,
    error: Option<Error>,
}

impl<S: ParseState + Default> Default for MapState<S> {
    fn default() -> Self {
        Self {
            depth: 0,
            key: None,
            elem: S::default(),
            parsed: false,
            error: None,
        }
    }
}

impl<S: ParseState + Default> ParseState for MapState<S> {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.key = None;
        self.elem.reset();
        self.parsed = false;
        self.error = None;
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        match self.error.take() {
            Some(error) => {
                self.elem.collect_errors(stack);
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

fn map_forward<T: Bind + Default>(
    map: &mut BTreeMap<String, T>,
    state: &mut MapState<T::State>,
    event: Event<'_>,
) -> bool {
    let MapState {
        key, elem, error, ..
    } = &mut *state;
    let Some(name) = key.as_deref() else {
        *error = Some(Error::CorruptedStructure);
        return false;
    };
    let Some(slot) = map.get_mut(name) else {
        *error = Some(Error::CorruptedStructure);
        return false;
    };
    if !T::receive(slot, elem, event) {
        *error = Some(Error::ObjectMember {
            name: String::from(name),
        });
        return false;
    }
    if state.depth == 1 && state.elem.is_parsed() {
        state.key = None;
        state.elem.reset();
    }
    true
}

impl<T: Bind + Default> Bind for BTreeMap<String, T> {
    type State = MapState<T::State>;

    fn receive(&mut self, state: &mut Self::State, event: Event<'_>) -> bool {
        if state.error.is_some() {
            return false;
        }
        match event {
            Event::StartObject if state.depth == 0 => {
                self.clear();
                state.depth = 1;
                state.key = None;
                state.elem.reset();
                true
            }
            Event::EndObject(_) if state.depth == 1 => {
                state.depth = 0;
                state.parsed = true;
                true
            }
            other if state.depth == 0 => {
                state.error = Some(Error::TypeMismatch {
                    expected: Self::type_name(),
                    actual: other.kind_name(),
                });
                false
            }
            Event::Key(name) if state.depth == 1 => {
                self.insert(String::from(name), T::default());
                state.key = Some(String::from(name));
                state.elem.reset();
                true
            }
            Event::StartObject => {
                state.depth += 1;
                map_forward(self, state, event)
            }
            Event::EndObject(_) => {
                state.depth -= 1;
                map_forward(self, state, event)
            }
            other => map_forward(self, state, other),
        }
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        if !sink.event(Event::StartObject) {
            return false;
        }
        for (key, value) in self {
            if !sink.event(Event::Key(key)) {
                return false;
            }
            if !value.emit(sink) {
                return false;
            }
        }
        sink.event(Event::EndObject(self.len()))
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("map of {}", T::type_name()))
    }

    fn schema(&self) -> Value {
        let items = self
            .values()
            .next()
            .map_or_else(|| T::default().schema(), |elem| elem.schema());
        let mut map = Map::new();
        map.insert("type".into(), Value::String("object".into()));
        map.insert("additionalProperties".into(), items);
        Value::Object(map)
    }
}
