//! The keyed dispatcher at the heart of the crate: routes events to named
//! member bindings, enforces the required/optional/duplicate/unknown-key
//! policy and aggregates nested errors.
//!
//! User types implement [`ObjectBind`] — a static member table plus
//! index-based projections to the member storage — and forward [`Bind`] to
//! the generic drivers in this module. The [`bind_object!`](crate::bind_object)
//! macro writes both impls from one field list.

use alloc::{borrow::Cow, boxed::Box, string::String, vec::Vec};
use core::any::Any;

use bitflags::bitflags;

use crate::{
    bind::{Bind, DynBind, ParseState},
    error::{Error, ErrorStack},
    event::{Event, EventSink},
    value::{Map, Value},
};

bitflags! {
    /// Per-member and object-level policy flags.
    ///
    /// `OPTIONAL`, `IGNORE_READ` and `IGNORE_WRITE` govern individual
    /// members; `ALLOW_DUPLICATE_KEY` and `DISALLOW_UNKNOWN_KEY` govern the
    /// whole object and are returned from [`ObjectBind::object_flags`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u32 {
        /// Tolerate the same key binding an already-parsed member; the last
        /// occurrence wins.
        const ALLOW_DUPLICATE_KEY = 0x1;
        /// The member may be absent at `EndObject` time.
        const OPTIONAL = 0x2;
        /// Never populate the member from input; its key is skipped.
        const IGNORE_READ = 0x4;
        /// Never write the member out.
        const IGNORE_WRITE = 0x8;
        /// Reject keys that are not in the member table.
        const DISALLOW_UNKNOWN_KEY = 0x10;
    }
}

/// One entry of an object's static member table.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    /// The JSON key.
    pub name: &'static str,
    /// Member-level flags.
    pub flags: Flags,
}

impl Member {
    /// A required member with default flags.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            flags: Flags::empty(),
        }
    }

    /// A member with explicit flags.
    #[must_use]
    pub const fn with_flags(name: &'static str, flags: Flags) -> Self {
        Self { name, flags }
    }

    fn exempt_from_required(&self) -> bool {
        self.flags
            .intersects(Flags::OPTIONAL.union(Flags::IGNORE_READ))
    }
}

/// The declarative description an object type supplies: the member table and
/// projections from the struct to each member's storage.
///
/// Member order in [`ObjectBind::members`] is the declaration order; it
/// drives write order, schema order and the order of names inside
/// [`Error::MissingRequired`].
pub trait ObjectBind {
    /// The static member table.
    fn members() -> &'static [Member];

    /// Object-level flags (`ALLOW_DUPLICATE_KEY`, `DISALLOW_UNKNOWN_KEY`).
    fn object_flags() -> Flags {
        Flags::empty()
    }

    /// Mutable access to the member at `index` in table order.
    fn member_mut(&mut self, index: usize) -> &mut dyn DynBind;

    /// Shared access to the member at `index` in table order.
    fn member_ref(&self, index: usize) -> &dyn DynBind;
}

/// State for one object binding: the member states in table order plus the
/// dispatch bookkeeping.
#[derive(Default)]
pub struct ObjectState {
    members: Vec<Box<dyn ParseState>>,
    depth: u32,
    current: Option<usize>,
    current_name: String,
    parsed: bool,
    error: Option<Error>,
}

impl core::fmt::Debug for ObjectState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectState")
            .field("depth", &self.depth)
            .field("current", &self.current)
            .field("current_name", &self.current_name)
            .field("parsed", &self.parsed)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl ParseState for ObjectState {
    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn reset(&mut self) {
        for member in &mut self.members {
            member.reset();
        }
        self.depth = 0;
        self.current = None;
        self.current_name.clear();
        self.parsed = false;
        self.error = None;
    }

    fn collect_errors(&mut self, stack: &mut ErrorStack) -> bool {
        match self.error.take() {
            Some(error) => {
                if let Some(index) = self.current {
                    if let Some(member) = self.members.get_mut(index) {
                        member.collect_errors(stack);
                    }
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

fn ensure_states<T: ObjectBind>(value: &mut T, state: &mut ObjectState) {
    let count = T::members().len();
    if state.members.len() != count {
        state.members = (0..count).map(|i| value.member_mut(i).new_state()).collect();
    }
}

fn forward<T: ObjectBind>(value: &mut T, state: &mut ObjectState, event: Event<'_>) -> bool {
    let Some(index) = state.current else {
        // Unknown or ignored member: the value is silently discarded.
        return true;
    };
    if !value
        .member_mut(index)
        .receive_dyn(state.members[index].as_mut(), event)
    {
        state.error = Some(Error::ObjectMember {
            name: state.current_name.clone(),
        });
        return false;
    }
    true
}

fn dispatch_key<T: ObjectBind>(state: &mut ObjectState, name: &str) -> bool {
    state.current_name.clear();
    state.current_name.push_str(name);
    let Some(index) = T::members().iter().position(|m| m.name == name) else {
        state.current = None;
        if T::object_flags().contains(Flags::DISALLOW_UNKNOWN_KEY) {
            state.error = Some(Error::UnknownField {
                name: String::from(name),
            });
            return false;
        }
        return true;
    };
    if T::members()[index].flags.contains(Flags::IGNORE_READ) {
        state.current = None;
        return true;
    }
    if !T::object_flags().contains(Flags::ALLOW_DUPLICATE_KEY) && state.members[index].is_parsed() {
        state.error = Some(Error::DuplicateKey {
            name: String::from(name),
        });
        return false;
    }
    state.current = Some(index);
    true
}

/// Drive one event into an object binding. Forward [`Bind::receive`] here.
pub fn receive_object<T: ObjectBind>(
    value: &mut T,
    state: &mut ObjectState,
    event: Event<'_>,
) -> bool {
    if state.error.is_some() {
        return false;
    }
    ensure_states(value, state);
    match event {
        Event::StartObject => {
            if state.depth == 0 {
                state.depth = 1;
                state.current = None;
                true
            } else {
                state.depth += 1;
                forward(value, state, event)
            }
        }
        Event::Key(name) => match state.depth {
            0 => {
                state.error = Some(Error::CorruptedStructure);
                false
            }
            1 => dispatch_key::<T>(state, name),
            _ => forward(value, state, event),
        },
        Event::EndObject(_) => {
            if state.depth == 0 {
                state.error = Some(Error::TypeMismatch {
                    expected: Cow::Borrowed("object"),
                    actual: event.kind_name(),
                });
                false
            } else if state.depth == 1 {
                state.depth = 0;
                state.parsed = true;
                let missing: Vec<&'static str> = T::members()
                    .iter()
                    .enumerate()
                    .filter(|(i, m)| !m.exempt_from_required() && !state.members[*i].is_parsed())
                    .map(|(_, m)| m.name)
                    .collect();
                if missing.is_empty() {
                    true
                } else {
                    state.error = Some(Error::MissingRequired { names: missing });
                    false
                }
            } else {
                state.depth -= 1;
                forward(value, state, event)
            }
        }
        other if state.depth == 0 => {
            state.error = Some(Error::TypeMismatch {
                expected: Cow::Borrowed("object"),
                actual: other.kind_name(),
            });
            false
        }
        other => forward(value, state, other),
    }
}

/// Emit an object binding as events, skipping `IGNORE_WRITE` members, in
/// member-table order. Forward [`Bind::emit`] here.
pub fn emit_object<T: ObjectBind>(value: &T, sink: &mut dyn EventSink) -> bool {
    if !sink.event(Event::StartObject) {
        return false;
    }
    let mut count = 0;
    for (index, member) in T::members().iter().enumerate() {
        if member.flags.contains(Flags::IGNORE_WRITE) {
            continue;
        }
        if !sink.event(Event::Key(member.name)) {
            return false;
        }
        if !value.member_ref(index).emit_dyn(sink) {
            return false;
        }
        count += 1;
    }
    sink.event(Event::EndObject(count))
}

/// Build the JSON-Schema description of an object binding. Forward
/// [`Bind::schema`] here.
pub fn object_schema<T: ObjectBind>(value: &T) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (index, member) in T::members().iter().enumerate() {
        properties.insert(String::from(member.name), value.member_ref(index).schema_dyn());
        if !member.exempt_from_required() {
            required.push(Value::String(String::from(member.name)));
        }
    }
    let mut map = Map::new();
    map.insert("type".into(), Value::String("object".into()));
    map.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        map.insert("required".into(), Value::Array(required));
    }
    if T::object_flags().contains(Flags::DISALLOW_UNKNOWN_KEY) {
        map.insert("additionalProperties".into(), Value::Bool(false));
    }
    Value::Object(map)
}

/// Implements [`ObjectBind`] and [`Bind`] for a struct from one field list.
///
/// Each entry maps a JSON key to a field, optionally with member flags.
/// Object-level flags go in brackets after the type.
///
/// ```
/// #[derive(Default, Debug, PartialEq)]
/// struct Server {
///     host: String,
///     port: u16,
///     banner: Option<String>,
/// }
///
/// jsonbind::bind_object!(Server {
///     "host" => host,
///     "port" => port,
///     "banner" => banner: OPTIONAL,
/// });
///
/// let mut server = Server::default();
/// jsonbind::from_str(r#"{"host":"db1","port":5432}"#, &mut server).unwrap();
/// assert_eq!(server.port, 5432);
/// ```
#[macro_export]
macro_rules! bind_object {
    ($ty:ty { $($name:literal => $field:ident $(: $($flag:ident)|+)?),+ $(,)? }) => {
        $crate::bind_object!(@imp $ty, [], { $($name => $field $(: $($flag)|+)?),+ });
    };
    ($ty:ty [$($oflag:ident)|+] { $($name:literal => $field:ident $(: $($flag:ident)|+)?),+ $(,)? }) => {
        $crate::bind_object!(@imp $ty, [$($oflag)|+], { $($name => $field $(: $($flag)|+)?),+ });
    };
    (@flags) => { $crate::Flags::empty() };
    (@flags $($flag:ident)|+) => { $crate::Flags::empty()$(.union($crate::Flags::$flag))+ };
    (@imp $ty:ty, [$($oflag:ident)|*], { $($name:literal => $field:ident $(: $($flag:ident)|+)?),+ }) => {
        impl $crate::ObjectBind for $ty {
            fn members() -> &'static [$crate::Member] {
                const MEMBERS: &[$crate::Member] = &[
                    $($crate::Member::with_flags(
                        $name,
                        $crate::bind_object!(@flags $($($flag)|+)?),
                    )),+
                ];
                MEMBERS
            }

            fn object_flags() -> $crate::Flags {
                $crate::bind_object!(@flags $($oflag)|*)
            }

            fn member_mut(&mut self, index: usize) -> &mut dyn $crate::DynBind {
                let mut at = 0usize;
                $(
                    if index == at {
                        return &mut self.$field;
                    }
                    #[allow(unused_assignments)]
                    {
                        at += 1;
                    }
                )+
                panic!("member index out of range");
            }

            fn member_ref(&self, index: usize) -> &dyn $crate::DynBind {
                let mut at = 0usize;
                $(
                    if index == at {
                        return &self.$field;
                    }
                    #[allow(unused_assignments)]
                    {
                        at += 1;
                    }
                )+
                panic!("member index out of range");
            }
        }

        impl $crate::Bind for $ty {
            type State = $crate::ObjectState;

            fn receive(&mut self, state: &mut Self::State, event: $crate::Event<'_>) -> bool {
                $crate::object::receive_object(self, state, event)
            }

            fn emit(&self, sink: &mut dyn $crate::EventSink) -> bool {
                $crate::object::emit_object(self, sink)
            }

            fn type_name() -> $crate::__private::Cow<'static, str> {
                $crate::__private::Cow::Borrowed("object")
            }

            fn schema(&self) -> $crate::Value {
                $crate::object::object_schema(self)
            }
        }
    };
}
