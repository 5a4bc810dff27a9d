//! Deterministic scheduler over virtual time.

use super::{CancelToken, Scheduler};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Virtual clock holding pending payloads until time is advanced.
///
/// # Example
///
/// ```rust
/// use recall::scheduler::{Scheduler, VirtualClock};
/// use std::time::Duration;
///
/// let mut clock = VirtualClock::new();
/// clock.schedule(Duration::from_millis(200), "second");
/// clock.schedule(Duration::from_millis(100), "first");
/// let dropped = clock.schedule(Duration::from_millis(150), "dropped");
/// clock.cancel(dropped);
///
/// assert_eq!(clock.advance(Duration::from_millis(250)), vec!["first", "second"]);
/// assert_eq!(clock.now(), Duration::from_millis(250));
/// ```
pub struct VirtualClock<T> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), T>,
}

impl<T> VirtualClock<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Number of payloads waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for VirtualClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> for VirtualClock<T> {
    fn schedule(&mut self, delay: Duration, payload: T) -> CancelToken {
        let id = self.next_id;
        self.next_id += 1;
        self.pending
            .insert((self.now.saturating_add(delay), id), payload);
        CancelToken(id)
    }

    fn cancel(&mut self, token: CancelToken) -> bool {
        let key = self
            .pending
            .keys()
            .find(|(_, id)| *id == token.0)
            .copied();
        key.and_then(|key| self.pending.remove(&key)).is_some()
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    fn next_due(&mut self, deadline: Duration) -> Option<T> {
        let (&(due, id), _) = self.pending.iter().next()?;
        if due > deadline {
            return None;
        }
        self.now = self.now.max(due);
        self.pending.remove(&(due, id))
    }

    fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl<T> fmt::Debug for VirtualClock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualClock")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn payloads_fire_in_due_order() {
        let mut clock = VirtualClock::new();
        clock.schedule(ms(300), 3);
        clock.schedule(ms(100), 1);
        clock.schedule(ms(200), 2);

        assert_eq!(clock.advance(ms(1000)), vec![1, 2, 3]);
        assert!(clock.is_idle());
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut clock = VirtualClock::new();
        clock.schedule(ms(100), "show");
        clock.schedule(ms(100), "ready");

        assert_eq!(clock.advance(ms(100)), vec!["show", "ready"]);
    }

    #[test]
    fn nothing_fires_before_its_delay() {
        let mut clock = VirtualClock::new();
        clock.schedule(ms(100), ());

        assert!(clock.advance(ms(99)).is_empty());
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.advance(ms(1)).len(), 1);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut clock = VirtualClock::new();
        clock.advance(ms(500));
        clock.schedule(ms(100), ());

        assert_eq!(clock.next_deadline(), Some(ms(600)));
    }

    #[test]
    fn cancel_removes_pending_payload_once() {
        let mut clock = VirtualClock::new();
        let token = clock.schedule(ms(100), "a");
        clock.schedule(ms(100), "b");

        assert!(clock.cancel(token));
        assert!(!clock.cancel(token));
        assert_eq!(clock.advance(ms(100)), vec!["b"]);
    }

    #[test]
    fn next_due_moves_time_to_each_payload() {
        let mut clock = VirtualClock::new();
        clock.schedule(ms(100), 'a');
        clock.schedule(ms(250), 'b');

        assert_eq!(clock.next_due(ms(1000)), Some('a'));
        assert_eq!(clock.now(), ms(100));
        assert_eq!(clock.next_due(ms(1000)), Some('b'));
        assert_eq!(clock.now(), ms(250));
        assert_eq!(clock.next_due(ms(1000)), None);
    }

    #[test]
    fn callbacks_can_be_scheduled() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut clock: VirtualClock<Box<dyn FnOnce()>> = VirtualClock::new();

        for step in 0..3 {
            let log = Rc::clone(&log);
            clock.schedule(ms(100 * (step + 1)), Box::new(move || log.borrow_mut().push(step)));
        }

        for callback in clock.advance(ms(300)) {
            callback();
        }
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }
}
