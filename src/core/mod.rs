//! Core state machine types.
//!
//! - The `State` trait and the game's `RoundState`
//! - Guard predicates for operation preconditions
//! - Immutable transition history
//!
//! Everything here is pure; no I/O, no clocks beyond timestamps.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{RoundState, State};
