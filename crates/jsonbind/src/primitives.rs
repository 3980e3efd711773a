//! Adapters for the scalar leaves: integers of every width and signedness,
//! floats, booleans and strings.
//!
//! Integer targets accept any of the four integer events with a
//! `TryFrom`-checked narrowing. Float targets accept integer events behind a
//! precision guard: magnitudes at or above 2^53 (f64) or 2^24 (f32) would
//! silently lose integer precision and are rejected as out of range.

use alloc::{borrow::Cow, string::String};

use crate::{
    bind::{Bind, ScalarState},
    event::{Event, EventSink},
    value::{Map, Value},
};

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integer_schema(minimum: i128, maximum: u128) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::String("integer".into()));
    let min = if minimum < 0 {
        Value::Int(minimum as i64)
    } else {
        Value::Uint(minimum as u64)
    };
    map.insert("minimum".into(), min);
    map.insert("maximum".into(), Value::Uint(maximum as u64));
    Value::Object(map)
}

fn simple_schema(kind: &str) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), Value::String(kind.into()));
    Value::Object(map)
}

macro_rules! impl_integer {
    ($($ty:ident => $variant:ident as $ev:ty),+ $(,)?) => {$(
        impl Bind for $ty {
            type State = ScalarState;

            fn receive(&mut self, state: &mut ScalarState, event: Event<'_>) -> bool {
                if state.blocked() {
                    return false;
                }
                let converted: Result<$ty, ()> = match event {
                    Event::Int(v) => $ty::try_from(v).map_err(|_| ()),
                    Event::Uint(v) => $ty::try_from(v).map_err(|_| ()),
                    Event::Int64(v) => $ty::try_from(v).map_err(|_| ()),
                    Event::Uint64(v) => $ty::try_from(v).map_err(|_| ()),
                    other => return state.mismatch(Self::type_name(), other.kind_name()),
                };
                match converted {
                    Ok(v) => {
                        *self = v;
                        state.parsed = true;
                        true
                    }
                    Err(()) => state.out_of_range(Self::type_name(), event.kind_name()),
                }
            }

            fn emit(&self, sink: &mut dyn EventSink) -> bool {
                sink.event(Event::$variant(<$ev>::from(*self)))
            }

            fn type_name() -> Cow<'static, str> {
                Cow::Borrowed(stringify!($ty))
            }

            fn schema(&self) -> Value {
                integer_schema(i128::from($ty::MIN), u128::from($ty::MAX as u128))
            }
        }
    )+};
}

impl_integer!(
    i8 => Int as i32,
    i16 => Int as i32,
    i32 => Int as i32,
    i64 => Int64 as i64,
    u8 => Uint as u32,
    u16 => Uint as u32,
    u32 => Uint as u32,
    u64 => Uint64 as u64,
);

/// Integer magnitudes from this bound upward are not exactly representable
/// in the target float width.
const F64_EXACT_BOUND: u64 = 1 << 53;
const F32_EXACT_BOUND: u64 = 1 << 24;

impl Bind for f64 {
    type State = ScalarState;

    #[allow(clippy::cast_precision_loss)]
    fn receive(&mut self, state: &mut ScalarState, event: Event<'_>) -> bool {
        if state.blocked() {
            return false;
        }
        let value = match event {
            Event::Int(v) => f64::from(v),
            Event::Uint(v) => f64::from(v),
            Event::Int64(v) => {
                if v.unsigned_abs() >= F64_EXACT_BOUND {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f64
            }
            Event::Uint64(v) => {
                if v >= F64_EXACT_BOUND {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f64
            }
            Event::Double(v) => v,
            other => return state.mismatch(Self::type_name(), other.kind_name()),
        };
        *self = value;
        state.parsed = true;
        true
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        sink.event(Event::Double(*self))
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("f64")
    }

    fn schema(&self) -> Value {
        simple_schema("number")
    }
}

impl Bind for f32 {
    type State = ScalarState;

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn receive(&mut self, state: &mut ScalarState, event: Event<'_>) -> bool {
        if state.blocked() {
            return false;
        }
        let value = match event {
            Event::Int(v) => {
                if u64::from(v.unsigned_abs()) >= F32_EXACT_BOUND {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f32
            }
            Event::Uint(v) => {
                if u64::from(v) >= F32_EXACT_BOUND {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f32
            }
            Event::Int64(v) => {
                if v.unsigned_abs() >= F32_EXACT_BOUND {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f32
            }
            Event::Uint64(v) => {
                if v >= F32_EXACT_BOUND {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f32
            }
            Event::Double(v) => {
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return state.out_of_range(Self::type_name(), event.kind_name());
                }
                v as f32
            }
            other => return state.mismatch(Self::type_name(), other.kind_name()),
        };
        *self = value;
        state.parsed = true;
        true
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        sink.event(Event::Double(f64::from(*self)))
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("f32")
    }

    fn schema(&self) -> Value {
        simple_schema("number")
    }
}

impl Bind for bool {
    type State = ScalarState;

    fn receive(&mut self, state: &mut ScalarState, event: Event<'_>) -> bool {
        if state.blocked() {
            return false;
        }
        match event {
            Event::Bool(v) => {
                *self = v;
                state.parsed = true;
                true
            }
            other => state.mismatch(Self::type_name(), other.kind_name()),
        }
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        sink.event(Event::Bool(*self))
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("bool")
    }

    fn schema(&self) -> Value {
        simple_schema("boolean")
    }
}

impl Bind for String {
    type State = ScalarState;

    fn receive(&mut self, state: &mut ScalarState, event: Event<'_>) -> bool {
        if state.blocked() {
            return false;
        }
        match event {
            Event::String(s) => {
                self.clear();
                self.push_str(s);
                state.parsed = true;
                true
            }
            other => state.mismatch(Self::type_name(), other.kind_name()),
        }
    }

    fn emit(&self, sink: &mut dyn EventSink) -> bool {
        sink.event(Event::String(self))
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("string")
    }

    fn schema(&self) -> Value {
        simple_schema("string")
    }
}
