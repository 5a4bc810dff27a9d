//! Snapshot error types.

use crate::core::RoundState;
use thiserror::Error;

/// Why a snapshot could not be written, read or resumed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapshotError {
    /// Encoding to `format` ("json" or "bincode") failed
    #[error("could not encode engine snapshot as {format}: {reason}")]
    Encode { format: &'static str, reason: String },

    /// The bytes or text are not a snapshot in `format`
    #[error("could not decode {format} engine snapshot: {reason}")]
    Decode { format: &'static str, reason: String },

    #[error("engine snapshot format v{found} cannot be read (this build reads v{supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A sequence signal the configured alphabet does not contain
    #[error("snapshot signal '{0}' is not in the configured alphabet")]
    UnknownSignal(String),

    #[error("snapshot input has {input} signals but its sequence only {sequence}")]
    InputTooLong { input: usize, sequence: usize },

    /// Any state but `Idle` needs a started round
    #[error("snapshot in state {0} has no round token")]
    MissingToken(RoundState),

    /// The state cannot be reached with this sequence and input
    #[error("snapshot state {state} does not fit a sequence of {sequence} and input of {input}")]
    InconsistentState {
        state: RoundState,
        sequence: usize,
        input: usize,
    },
}
