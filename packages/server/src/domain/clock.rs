//! Clock capability.

use super::value_object::Timestamp;

/// Source of the current time for recorded messages.
///
/// The chat service never reads the system time directly; the server wires
/// in a wall clock and tests wire in fixed ones.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
