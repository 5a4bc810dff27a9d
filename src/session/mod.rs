//! The imperative shell around the engine.
//!
//! A [`GameSession`] owns the clock and the collaborators; the engine stays
//! a pure state machine. Control flow:
//!
//! 1. `start()` asks the engine for a playback schedule and hands its cues
//!    to the scheduler
//! 2. `advance()` lets time pass; fired cues go back to the engine and on to
//!    the [`SignalDisplay`]
//! 3. `press()` forwards player input; a loss is recorded and the score
//!    history refreshed
//!
//! [`GameSession::open`] loads the stored history before the first game, and
//! [`GameSession::resume`] reschedules the cues of an engine restored from a
//! snapshot.

mod display;
mod error;
mod game;

pub use display::{DisplayEntry, DisplayLog, SignalDisplay};
pub use error::SessionError;
pub use game::{GameEvent, GameSession};
