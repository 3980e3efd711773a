//! Enum adapters: a string value matched against a static ordered name
//! table.
//!
//! Writing a runtime value with no authored name is reported as a failure
//! (surfacing as [`WriteError::Unrepresentable`](crate::WriteError) from the
//! drivers), never a panic.

use alloc::{borrow::Cow, string::String, vec::Vec};

use crate::{
    bind::ScalarState,
    error::Error,
    event::{Event, EventSink},
    value::{Map, Value},
};

/// The static description an enum type supplies: its display name and the
/// ordered `(name, value)` table.
pub trait EnumBind: Copy + PartialEq + 'static {
    /// Type name used in error records and schemas.
    const NAME: &'static str;

    /// The authored mapping, in schema order.
    const VARIANTS: &'static [(&'static str, Self)];
}

/// Drive one event into an enum binding. Forward [`Bind::receive`](crate::Bind::receive) here.
pub fn receive_enum<T: EnumBind>(value: &mut T, state: &mut ScalarState, event: Event<'_>) -> bool {
    if state.blocked() {
        return false;
    }
    match event {
        Event::String(s) => {
            for (name, variant) in T::VARIANTS {
                if *name == s {
                    *value = *variant;
                    state.parsed = true;
                    return true;
                }
            }
            state.fail(Error::InvalidEnum {
                value: String::from(s),
            })
        }
        other => state.mismatch(Cow::Borrowed(T::NAME), other.kind_name()),
    }
}

/// Emit an enum binding, or fail if the value has no authored name. Forward
/// [`Bind::emit`](crate::Bind::emit) here.
pub fn emit_enum<T: EnumBind>(value: &T, sink: &mut dyn EventSink) -> bool {
    for (name, variant) in T::VARIANTS {
        if variant == value {
            return sink.event(Event::String(name));
        }
    }
    false
}

/// Build the JSON-Schema description of an enum binding. Forward
/// [`Bind::schema`](crate::Bind::schema) here.
pub fn enum_schema<T: EnumBind>() -> Value {
    let names: Vec<Value> = T::VARIANTS
        .iter()
        .map(|(name, _)| Value::String(String::from(*name)))
        .collect();
    let mut map = Map::new();
    map.insert("type".into(), Value::String("string".into()));
    map.insert("enum".into(), Value::Array(names));
    Value::Object(map)
}

/// Implements [`EnumBind`] and [`Bind`](crate::Bind) for a C-like enum from
/// one variant list.
///
/// ```
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Priority {
///     #[default]
///     Low,
///     Mid,
///     High,
/// }
///
/// jsonbind::bind_enum!(Priority as "priority" {
///     Low => "low",
///     Mid => "mid",
///     High => "high",
/// });
///
/// let mut p = Priority::Low;
/// jsonbind::from_str(r#""high""#, &mut p).unwrap();
/// assert_eq!(p, Priority::High);
/// ```
#[macro_export]
macro_rules! bind_enum {
    ($ty:ident as $name:literal { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $crate::EnumBind for $ty {
            const NAME: &'static str = $name;
            const VARIANTS: &'static [(&'static str, Self)] = &[
                $(($s, Self::$variant)),+
            ];
        }

        impl $crate::Bind for $ty {
            type State = $crate::ScalarState;

            fn receive(&mut self, state: &mut Self::State, event: $crate::Event<'_>) -> bool {
                $crate::enums::receive_enum(self, state, event)
            }

            fn emit(&self, sink: &mut dyn $crate::EventSink) -> bool {
                $crate::enums::emit_enum(self, sink)
            }

            fn type_name() -> $crate::__private::Cow<'static, str> {
                $crate::__private::Cow::Borrowed($name)
            }

            fn schema(&self) -> $crate::Value {
                $crate::enums::enum_schema::<Self>()
            }
        }
    };
}
