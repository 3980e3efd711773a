//! Per-read resource limits on nesting depth and scalar leaf count.
//!
//! The limits are plain data carried in
//! [`ReadOptions`](crate::ReadOptions) and threaded through each read call;
//! there is no process-wide mutable configuration, so concurrent parses with
//! different limits are fully independent. Enforcement happens on the event
//! stream itself, upstream of the root adapter.

use crate::{
    error::Error,
    event::{Event, EventSink},
};

/// Optional caps on recursion depth and total scalar leaves, defaulting to
/// unbounded. Guards against adversarial input causing unbounded stack or
/// memory growth during a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum container nesting depth, `None` for unbounded.
    pub max_depth: Option<u32>,
    /// Maximum number of scalar leaves, `None` for unbounded.
    pub max_leaves: Option<u64>,
}

impl Limits {
    /// No caps.
    pub const UNBOUNDED: Limits = Limits {
        max_depth: None,
        max_leaves: None,
    };

    /// Cap the nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Cap the scalar leaf count.
    #[must_use]
    pub fn with_max_leaves(mut self, leaves: u64) -> Self {
        self.max_leaves = Some(leaves);
        self
    }
}

/// Event-stream wrapper enforcing [`Limits`] before events reach the inner
/// sink.
pub(crate) struct LimitSink<'s> {
    inner: &'s mut dyn EventSink,
    limits: Limits,
    depth: u32,
    leaves: u64,
    error: Option<Error>,
}

impl<'s> LimitSink<'s> {
    pub(crate) fn new(inner: &'s mut dyn EventSink, limits: Limits) -> Self {
        Self {
            inner,
            limits,
            depth: 0,
            leaves: 0,
            error: None,
        }
    }

    pub(crate) fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl EventSink for LimitSink<'_> {
    fn event(&mut self, event: Event<'_>) -> bool {
        if self.error.is_some() {
            return false;
        }
        match event {
            Event::StartObject | Event::StartArray => {
                self.depth += 1;
                if let Some(limit) = self.limits.max_depth {
                    if self.depth > limit {
                        self.error = Some(Error::RecursionTooDeep { limit });
                        return false;
                    }
                }
            }
            Event::EndObject(_) | Event::EndArray(_) => {
                self.depth = self.depth.saturating_sub(1);
            }
            event if event.is_scalar() => {
                self.leaves += 1;
                if let Some(limit) = self.limits.max_leaves {
                    if self.leaves > limit {
                        self.error = Some(Error::TooManyLeaves { limit });
                        return false;
                    }
                }
            }
            Event::Key(_) => {}
            _ => {}
        }
        self.inner.event(event)
    }
}
