//! The sequence engine and its building blocks.
//!
//! # Key Concepts
//!
//! - **Signals**: values of a configurable [`Alphabet`]
//! - **Engine**: [`SequenceEngine`] owns the sequence, the player's input and
//!   the [`RoundState`](crate::core::RoundState)
//! - **Schedules**: starting a round returns a [`PlaybackSchedule`] of
//!   [`Cue`]s for the caller's clock to fire back
//! - **Randomness**: injected through [`SignalSource`]

mod config;
mod error;
mod machine;
mod rng;
mod schedule;
mod score;
mod signal;

pub use config::{
    ConfigError, ConfigErrors, EngineConfig, EngineConfigBuilder, DEFAULT_UNIT_INTERVAL_MS,
    MAX_UNIT_INTERVAL_MS,
};
pub use error::EngineError;
pub use machine::{CueOutcome, SequenceEngine, SubmitOutcome};
pub use rng::{GameRng, ScriptedSource, SignalSource};
pub use schedule::{Cue, PlaybackSchedule, RoundToken, ScheduledCue};
pub use score::Score;
pub use signal::{Alphabet, Signal};
