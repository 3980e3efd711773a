//! Configuration for the top-level read drivers.

use crate::limits::Limits;

/// Options threaded through one read call.
///
/// # Examples
///
/// ```
/// use jsonbind::{Limits, ReadOptions};
///
/// let options = ReadOptions {
///     limits: Limits::default().with_max_depth(64),
/// };
/// let mut doc = jsonbind::Value::Null;
/// jsonbind::from_str_with("[1,2,3]", &mut doc, &options).unwrap();
/// ```
///
/// # Default
///
/// Unbounded limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Resource caps applied to the event stream.
    pub limits: Limits,
}
