//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions deciding whether an operation may run
//! from the current state. The engine evaluates one before each operation.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;

/// Pure predicate that determines if an operation can run.
///
/// # Example
///
/// ```rust
/// use recall::core::{Guard, RoundState};
///
/// let can_submit = Guard::new("submit", |s: &RoundState| s.accepts_input());
///
/// assert!(can_submit.check(&RoundState::AwaitingInput));
/// assert!(!can_submit.check(&RoundState::Revealing));
/// assert_eq!(can_submit.operation(), "submit");
/// ```
pub struct Guard<S: State> {
    operation: &'static str,
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard for a named operation from a pure predicate.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(operation: &'static str, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            operation,
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Check if the guard allows the operation from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }

    /// Name of the guarded operation, used in errors and logs.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}
