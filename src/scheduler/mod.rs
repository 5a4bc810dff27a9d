//! Caller-owned timing.
//!
//! The engine only produces delays; something else has to wait them out.
//! [`Scheduler`] is that capability. [`VirtualClock`] implements it over
//! virtual time so whole games can be driven deterministically.

mod clock;

pub use clock::VirtualClock;

use std::time::Duration;

/// Handle for cancelling a scheduled payload.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CancelToken(pub(crate) u64);

/// Delayed delivery of payloads.
///
/// Payloads are delivered in due-time order; payloads due at the same time
/// come out in the order they were scheduled.
pub trait Scheduler<T> {
    /// Deliver `payload` once `delay` has passed from now.
    fn schedule(&mut self, delay: Duration, payload: T) -> CancelToken;

    /// Drop a pending payload. Returns `false` if it already fired or was
    /// cancelled.
    fn cancel(&mut self, token: CancelToken) -> bool;

    /// Time elapsed since the scheduler was created.
    fn now(&self) -> Duration;

    /// Due time of the earliest pending payload.
    fn next_deadline(&self) -> Option<Duration>;

    /// Pop the earliest payload due at or before `deadline`, moving the
    /// current time to its due time.
    fn next_due(&mut self, deadline: Duration) -> Option<T>;

    /// Move the current time forward to `deadline` (never backwards).
    fn advance_to(&mut self, deadline: Duration);

    /// Let `elapsed` pass and collect everything that fired, in order.
    fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        let deadline = self.now().saturating_add(elapsed);
        let mut fired = Vec::new();
        while let Some(payload) = self.next_due(deadline) {
            fired.push(payload);
        }
        self.advance_to(deadline);
        fired
    }
}
